// src/recommendations.rs - Report-level guidance from per-region risk

use crate::config::Thresholds;
use crate::metrics::ThermalMetrics;
use crate::report::RegionAnalysis;

/// Closing statements present in every report
const GENERAL_GUIDANCE: [&str; 3] = [
    "Regular thermal imaging recommended",
    "Maintain detailed training logs",
    "Monitor for any changes in symptoms",
];

/// Priority actions and overall guidance for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recommendations {
    pub priority: Vec<String>,
    pub overall: Vec<String>,
}

/// Synthesize whole-report recommendations.
///
/// Priority items escalate high/critical regions and side asymmetry; a
/// single "continue" item is used only when nothing escalated.
pub fn generate_recommendations(
    regions: &[RegionAnalysis],
    metrics: &ThermalMetrics,
    thresholds: &Thresholds,
) -> Recommendations {
    let mut priority = Vec::new();
    let mut overall = Vec::new();

    let elevated = regions
        .iter()
        .filter(|region| region.injury_risk.level.is_elevated())
        .count();
    if elevated > 0 {
        priority.push(format!(
            "Immediate attention required for {} high-risk regions",
            elevated
        ));
        overall.push("Consider reducing training intensity".to_string());
        overall.push("Implement enhanced recovery protocols".to_string());
    }

    if metrics.asymmetry_index > thresholds.asymmetry_threshold {
        priority.push("Significant asymmetry detected - investigate further".to_string());
        overall.push("Focus on bilateral training exercises".to_string());
    }

    if metrics.hot_spots_count > thresholds.many_hot_spots {
        overall.push("Multiple hot spots detected - monitor for inflammation".to_string());
    }

    if priority.is_empty() {
        priority.push("Continue current training with regular monitoring".to_string());
    }

    overall.extend(GENERAL_GUIDANCE.iter().map(|s| s.to_string()));

    Recommendations { priority, overall }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::RegionType;
    use crate::risk::{InjuryRiskAssessment, RiskLevel};
    use crate::segmentation::RegionObservation;

    fn region(level: RiskLevel) -> RegionAnalysis {
        RegionAnalysis {
            observation: RegionObservation {
                region_key: "calves".to_string(),
                name: "Calves".to_string(),
                region_type: RegionType::Calves,
                coordinates: vec![],
                pixel_count: 1,
                average_temperature: 33.0,
                max_temperature: 33.0,
                min_temperature: 33.0,
                temperature_stddev: 0.0,
            },
            injury_risk: InjuryRiskAssessment {
                level,
                temperature_difference: 0.0,
                confidence: 0.8,
                description: level.description().to_string(),
                recommendations: vec![],
            },
        }
    }

    fn metrics(asymmetry_index: f64, hot_spots_count: usize) -> ThermalMetrics {
        ThermalMetrics {
            overall_average_temp: 33.0,
            overall_max_temp: 33.0,
            overall_min_temp: 33.0,
            temperature_range: 0.0,
            asymmetry_index,
            hot_spots_count,
            cold_spots_count: 0,
        }
    }

    #[test]
    fn calm_run_gets_fallback_priority() {
        let recs = generate_recommendations(
            &[region(RiskLevel::Low), region(RiskLevel::Moderate)],
            &metrics(0.0, 0),
            &Thresholds::default(),
        );
        assert_eq!(recs.priority, vec!["Continue current training with regular monitoring"]);
        assert_eq!(recs.overall.len(), 3);
        assert_eq!(recs.overall[0], "Regular thermal imaging recommended");
    }

    #[test]
    fn elevated_regions_escalate() {
        let recs = generate_recommendations(
            &[region(RiskLevel::High), region(RiskLevel::Critical), region(RiskLevel::Low)],
            &metrics(0.0, 0),
            &Thresholds::default(),
        );
        assert_eq!(recs.priority, vec!["Immediate attention required for 2 high-risk regions"]);
        assert_eq!(recs.overall.len(), 5);
        assert_eq!(recs.overall[0], "Consider reducing training intensity");
    }

    #[test]
    fn asymmetry_and_hot_spots_add_guidance() {
        let recs = generate_recommendations(&[], &metrics(1.6, 4), &Thresholds::default());
        assert_eq!(recs.priority, vec!["Significant asymmetry detected - investigate further"]);
        assert_eq!(
            recs.overall,
            vec![
                "Focus on bilateral training exercises",
                "Multiple hot spots detected - monitor for inflammation",
                "Regular thermal imaging recommended",
                "Maintain detailed training logs",
                "Monitor for any changes in symptoms",
            ]
        );
    }

    #[test]
    fn thresholds_are_strict() {
        let recs = generate_recommendations(&[], &metrics(1.5, 3), &Thresholds::default());
        assert_eq!(recs.priority.len(), 1);
        assert_eq!(recs.overall.len(), 3);
    }
}
