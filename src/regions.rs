// src/regions.rs - Static catalog of posterior lower-body regions

use serde::{Deserialize, Serialize};

/// Anatomical type of a catalog region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionType {
    GluteusMaximus,
    GluteusMedius,
    Hamstrings,
    Calves,
    KneeSide,
    Achilles,
    Ankle,
    Foot,
}

/// Thermal pattern that makes a region clinically interesting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorTag {
    HotSpot,
    ColdSpot,
    Asymmetry,
}

/// Camera view a region is defined for. Only the posterior view exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Posterior,
}

/// Immutable description of one anatomical region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionDefinition {
    pub key: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub region_type: RegionType,
    /// (min, max) in degrees C
    pub typical_temperature_range: (f64, f64),
    pub indicator_tags: &'static [IndicatorTag],
    pub view: View,
}

/// Regions in catalog order, top of the body to the bottom
pub static REGION_CATALOG: [RegionDefinition; 8] = [
    RegionDefinition {
        key: "gluteus_maximus",
        display_name: "Gluteus Maximus",
        description: "Main glute muscle (posterior)",
        region_type: RegionType::GluteusMaximus,
        typical_temperature_range: (32.0, 36.0),
        indicator_tags: &[IndicatorTag::Asymmetry, IndicatorTag::HotSpot],
        view: View::Posterior,
    },
    RegionDefinition {
        key: "gluteus_medius",
        display_name: "Gluteus Medius",
        description: "Side glute muscle (posterior)",
        region_type: RegionType::GluteusMedius,
        typical_temperature_range: (31.5, 35.5),
        indicator_tags: &[IndicatorTag::Asymmetry, IndicatorTag::ColdSpot],
        view: View::Posterior,
    },
    RegionDefinition {
        key: "hamstrings",
        display_name: "Hamstrings",
        description: "Back thigh muscles (posterior)",
        region_type: RegionType::Hamstrings,
        typical_temperature_range: (32.0, 36.0),
        indicator_tags: &[IndicatorTag::HotSpot, IndicatorTag::Asymmetry],
        view: View::Posterior,
    },
    RegionDefinition {
        key: "calves",
        display_name: "Calves",
        description: "Calf muscles (posterior)",
        region_type: RegionType::Calves,
        typical_temperature_range: (31.0, 35.0),
        indicator_tags: &[IndicatorTag::HotSpot, IndicatorTag::Asymmetry],
        view: View::Posterior,
    },
    RegionDefinition {
        key: "back_knee",
        display_name: "Back of Knee",
        description: "Back of knee joint (posterior)",
        region_type: RegionType::KneeSide,
        typical_temperature_range: (30.0, 34.0),
        indicator_tags: &[IndicatorTag::HotSpot, IndicatorTag::Asymmetry],
        view: View::Posterior,
    },
    RegionDefinition {
        key: "achilles",
        display_name: "Achilles Tendon",
        description: "Achilles tendon area (posterior)",
        region_type: RegionType::Achilles,
        typical_temperature_range: (30.0, 34.0),
        indicator_tags: &[IndicatorTag::HotSpot, IndicatorTag::Asymmetry],
        view: View::Posterior,
    },
    RegionDefinition {
        key: "back_ankle",
        display_name: "Back of Ankle",
        description: "Back ankle area (posterior)",
        region_type: RegionType::Ankle,
        typical_temperature_range: (29.5, 33.5),
        indicator_tags: &[IndicatorTag::HotSpot, IndicatorTag::Asymmetry],
        view: View::Posterior,
    },
    RegionDefinition {
        key: "back_foot",
        display_name: "Back of Foot",
        description: "Back of foot (posterior)",
        region_type: RegionType::Foot,
        typical_temperature_range: (29.0, 33.0),
        indicator_tags: &[IndicatorTag::ColdSpot, IndicatorTag::Asymmetry],
        view: View::Posterior,
    },
];

/// Public listing entry for one detectable region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionInfo {
    pub key: &'static str,
    pub name: &'static str,
    pub region_type: RegionType,
    pub description: &'static str,
    pub typical_temp_range: (f64, f64),
    pub injury_indicators: Vec<IndicatorTag>,
}

/// List every region the analyzer can report on, in catalog order
pub fn detectable_regions() -> Vec<RegionInfo> {
    REGION_CATALOG
        .iter()
        .map(|def| RegionInfo {
            key: def.key,
            name: def.display_name,
            region_type: def.region_type,
            description: def.description,
            typical_temp_range: def.typical_temperature_range,
            injury_indicators: def.indicator_tags.to_vec(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_are_unique() {
        let keys: HashSet<_> = REGION_CATALOG.iter().map(|def| def.key).collect();
        assert_eq!(keys.len(), REGION_CATALOG.len());
    }

    #[test]
    fn typical_ranges_are_ordered() {
        for def in REGION_CATALOG.iter() {
            let (low, high) = def.typical_temperature_range;
            assert!(low < high, "{} has inverted range", def.key);
            assert_eq!(def.view, View::Posterior);
        }
    }

    #[test]
    fn listing_matches_catalog_order() {
        let listing = detectable_regions();
        assert_eq!(listing.len(), 8);
        assert_eq!(listing[0].key, "gluteus_maximus");
        assert_eq!(listing[7].name, "Back of Foot");
    }
}
