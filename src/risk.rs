// src/risk.rs - Per-region injury risk classification

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Thresholds;
use crate::segmentation::RegionObservation;

/// Injury risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Moderate,
        RiskLevel::High,
        RiskLevel::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Normal temperature variation",
            RiskLevel::Moderate => "Slight inflammation or overuse",
            RiskLevel::High => "Significant inflammation or strain",
            RiskLevel::Critical => "Severe inflammation or injury risk",
        }
    }

    /// High and critical regions both need escalation
    pub fn is_elevated(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }

    /// Fixed guidance for this tier
    pub fn recommendations(&self) -> &'static [&'static str] {
        match self {
            RiskLevel::Critical => &[
                "Immediate medical attention required",
                "Avoid high-intensity activities",
                "Apply ice therapy",
                "Consider imaging studies",
            ],
            RiskLevel::High => &[
                "Reduce training intensity",
                "Focus on recovery protocols",
                "Monitor closely for changes",
                "Consider physiotherapy",
            ],
            RiskLevel::Moderate => &[
                "Moderate training load",
                "Increase recovery time",
                "Monitor for progression",
                "Consider preventive measures",
            ],
            RiskLevel::Low => &[
                "Continue normal training",
                "Maintain current protocols",
                "Regular monitoring recommended",
            ],
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk assessment attached to one region observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjuryRiskAssessment {
    pub level: RiskLevel,
    /// Region average minus baseline, degrees C
    pub temperature_difference: f64,
    pub confidence: f64,
    pub description: String,
    pub recommendations: Vec<String>,
}

/// Region-specific advice, triggered by keywords in the display name.
/// Every matching keyword contributes its line.
const REGION_KEYWORD_ADVICE: [(&str, &str); 6] = [
    ("knee", "Focus on posterior knee stability exercises"),
    ("hamstring", "Include hamstring flexibility and strengthening work"),
    ("calf", "Monitor calf muscle tightness and Achilles tendon health"),
    ("glute", "Focus on glute activation and hip stability"),
    ("achilles", "Monitor Achilles tendon for signs of strain"),
    ("ankle", "Check ankle mobility and stability"),
];

/// Confidence attached to every risk assessment. A fixed placeholder,
/// no statistic is computed behind it.
pub const RISK_CONFIDENCE: f64 = 0.8;

/// Classify a baseline difference. Thresholds are inclusive lower bounds.
pub fn classify_risk(temperature_difference: f64, thresholds: &Thresholds) -> RiskLevel {
    if temperature_difference >= thresholds.critical_risk_diff {
        RiskLevel::Critical
    } else if temperature_difference >= thresholds.high_risk_diff {
        RiskLevel::High
    } else if temperature_difference >= thresholds.moderate_risk_diff {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    }
}

/// Clamp the region average into the plausible body range.
///
/// Returns a corrected copy; min/max are widened where needed so that
/// min <= average <= max still holds.
pub fn normalize_observation(observation: &RegionObservation, thresholds: &Thresholds) -> RegionObservation {
    let average = observation
        .average_temperature
        .clamp(thresholds.min_body_temp, thresholds.max_body_temp);

    if average != observation.average_temperature {
        log::debug!(
            "Clamped {} average from {:.2}°C to {:.2}°C",
            observation.region_key,
            observation.average_temperature,
            average
        );
    }

    RegionObservation {
        average_temperature: average,
        max_temperature: observation.max_temperature.max(average),
        min_temperature: observation.min_temperature.min(average),
        ..observation.clone()
    }
}

/// Tier guidance followed by keyword-triggered region advice
pub fn region_recommendations(region_name: &str, level: RiskLevel) -> Vec<String> {
    let lowered = region_name.to_lowercase();
    level
        .recommendations()
        .iter()
        .map(|s| s.to_string())
        .chain(
            REGION_KEYWORD_ADVICE
                .iter()
                .filter(|(keyword, _)| lowered.contains(keyword))
                .map(|(_, advice)| advice.to_string()),
        )
        .collect()
}

/// Normalize one observation and assess its risk against the baseline
pub fn assess_region(
    observation: &RegionObservation,
    thresholds: &Thresholds,
) -> (RegionObservation, InjuryRiskAssessment) {
    let normalized = normalize_observation(observation, thresholds);
    let temperature_difference = normalized.average_temperature - thresholds.baseline_temp;
    let level = classify_risk(temperature_difference, thresholds);

    let assessment = InjuryRiskAssessment {
        level,
        temperature_difference,
        confidence: RISK_CONFIDENCE,
        description: level.description().to_string(),
        recommendations: region_recommendations(&normalized.name, level),
    };

    (normalized, assessment)
}

/// Bounds and description of one risk tier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskLevelDefinition {
    pub level: RiskLevel,
    pub min_temp_diff: f64,
    pub max_temp_diff: f64,
    pub description: &'static str,
}

/// Upper bound reported for the critical tier
pub const CRITICAL_MAX_DIFF: f64 = 100.0;

/// Tier table for the configured thresholds, lowest tier first
pub fn risk_level_definitions(thresholds: &Thresholds) -> Vec<RiskLevelDefinition> {
    let bounds = [
        (0.0, thresholds.moderate_risk_diff),
        (thresholds.moderate_risk_diff, thresholds.high_risk_diff),
        (thresholds.high_risk_diff, thresholds.critical_risk_diff),
        (thresholds.critical_risk_diff, CRITICAL_MAX_DIFF),
    ];

    RiskLevel::ALL
        .iter()
        .zip(bounds)
        .map(|(&level, (min_temp_diff, max_temp_diff))| RiskLevelDefinition {
            level,
            min_temp_diff,
            max_temp_diff,
            description: level.description(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::RegionType;
    use assert_approx_eq::assert_approx_eq;

    fn obs(name: &str, avg: f64) -> RegionObservation {
        RegionObservation {
            region_key: "test".to_string(),
            name: name.to_string(),
            region_type: RegionType::KneeSide,
            coordinates: vec![(0, 0), (1, 0), (1, 1), (0, 1)],
            pixel_count: 4,
            average_temperature: avg,
            max_temperature: avg + 0.5,
            min_temperature: avg - 0.5,
            temperature_stddev: 0.2,
        }
    }

    #[test]
    fn tier_bounds_are_inclusive() {
        let t = Thresholds::default();
        assert_eq!(classify_risk(1.4999, &t), RiskLevel::Low);
        assert_eq!(classify_risk(1.5, &t), RiskLevel::Moderate);
        assert_eq!(classify_risk(3.0, &t), RiskLevel::High);
        assert_eq!(classify_risk(4.999, &t), RiskLevel::High);
        assert_eq!(classify_risk(5.0, &t), RiskLevel::Critical);
        assert_eq!(classify_risk(-3.0, &t), RiskLevel::Low);
    }

    #[test]
    fn boundary_temperatures_classify_upward() {
        let t = Thresholds::default();
        let (_, moderate) = assess_region(&obs("Hamstrings", 34.5), &t);
        assert_eq!(moderate.level, RiskLevel::Moderate);

        let (_, critical) = assess_region(&obs("Hamstrings", 38.0), &t);
        assert_eq!(critical.level, RiskLevel::Critical);
    }

    #[test]
    fn out_of_range_average_is_clamped_before_difference() {
        let t = Thresholds::default();
        let (normalized, risk) = assess_region(&obs("Calves", 45.0), &t);
        assert_eq!(normalized.average_temperature, 40.0);
        assert_approx_eq!(risk.temperature_difference, 7.0);
        assert!(normalized.min_temperature <= normalized.average_temperature);
        assert!(normalized.average_temperature <= normalized.max_temperature);

        let (cold, risk) = assess_region(&obs("Calves", 25.0), &t);
        assert_eq!(cold.average_temperature, 30.0);
        assert_approx_eq!(risk.temperature_difference, -3.0);
        assert_eq!(risk.level, RiskLevel::Low);
    }

    #[test]
    fn confidence_is_fixed_placeholder() {
        let (_, risk) = assess_region(&obs("Calves", 33.3), &Thresholds::default());
        assert_eq!(risk.confidence, 0.8);
        assert_eq!(risk.description, "Normal temperature variation");
    }

    #[test]
    fn keyword_advice_follows_tier_list() {
        let recs = region_recommendations("Back of Knee", RiskLevel::High);
        assert_eq!(recs.len(), 5);
        assert_eq!(recs[0], "Reduce training intensity");
        assert_eq!(recs[4], "Focus on posterior knee stability exercises");
    }

    #[test]
    fn every_matching_keyword_contributes() {
        let recs = region_recommendations("Calf and Achilles", RiskLevel::Low);
        assert_eq!(recs.len(), 5);
        assert!(recs.contains(&"Monitor calf muscle tightness and Achilles tendon health".to_string()));
        assert!(recs.contains(&"Monitor Achilles tendon for signs of strain".to_string()));
    }

    #[test]
    fn regions_without_keywords_get_tier_list_only() {
        assert_eq!(region_recommendations("Back of Foot", RiskLevel::Moderate).len(), 4);
        // "Calves" does not contain "calf"
        assert_eq!(region_recommendations("Calves", RiskLevel::Low).len(), 3);
    }

    #[test]
    fn level_table_covers_all_tiers() {
        let table = risk_level_definitions(&Thresholds::default());
        assert_eq!(table.len(), 4);
        assert_eq!(table[1].min_temp_diff, 1.5);
        assert_eq!(table[3].max_temp_diff, 100.0);
        assert_eq!(table[2].description, "Significant inflammation or strain");
    }

    #[test]
    fn levels_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&RiskLevel::Critical).unwrap(), "\"critical\"");
    }
}
