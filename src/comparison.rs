// src/comparison.rs - Trend comparison between stored reports

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ThermalRiskError, Result};
use crate::report::AnalysisReport;

/// Temperature change (degrees C) beyond which an unchanged tier still
/// counts as improvement or concern
pub const SIGNIFICANT_CHANGE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub comparison_id: String,
    pub timestamp: DateTime<Utc>,
    pub compared_analyses: Vec<String>,
    pub comparison_type: String,
    /// Region key -> later average minus earlier average
    pub temperature_changes: BTreeMap<String, f64>,
    /// Region key -> "earlier->later" for regions whose tier moved
    pub risk_changes: BTreeMap<String, String>,
    pub improvement_areas: Vec<String>,
    pub concern_areas: Vec<String>,
    pub overall_trend: Trend,
    pub recommendations: Vec<String>,
}

/// Compare the first and last of a time-ordered series of reports.
/// Only regions present in both are compared.
pub fn compare_reports(reports: &[AnalysisReport], comparison_type: &str) -> Result<ComparisonResult> {
    let (first, last) = match (reports.first(), reports.last()) {
        (Some(first), Some(last)) if reports.len() >= 2 => (first, last),
        _ => {
            return Err(ThermalRiskError::Config(
                "at least two reports are required for a comparison".to_string(),
            ))
        }
    };

    let mut temperature_changes = BTreeMap::new();
    let mut risk_changes = BTreeMap::new();
    let mut improvement_areas = Vec::new();
    let mut concern_areas = Vec::new();

    for before in &first.regions {
        let key = &before.observation.region_key;
        let Some(after) = last.region(key) else {
            continue;
        };

        let delta = after.observation.average_temperature - before.observation.average_temperature;
        temperature_changes.insert(key.clone(), delta);

        let (old_level, new_level) = (before.injury_risk.level, after.injury_risk.level);
        if old_level != new_level {
            risk_changes.insert(key.clone(), format!("{}->{}", old_level, new_level));
        }

        let name = after.observation.name.clone();
        if new_level < old_level || (new_level == old_level && delta < -SIGNIFICANT_CHANGE) {
            improvement_areas.push(name);
        } else if new_level > old_level || (new_level == old_level && delta > SIGNIFICANT_CHANGE) {
            concern_areas.push(name);
        }
    }

    let overall_trend = if improvement_areas.len() > concern_areas.len() {
        Trend::Improving
    } else if concern_areas.len() > improvement_areas.len() {
        Trend::Declining
    } else {
        Trend::Stable
    };

    let mut recommendations = vec![match overall_trend {
        Trend::Improving => "Thermal profile improving - maintain current recovery plan".to_string(),
        Trend::Stable => "Thermal profile stable - continue regular monitoring".to_string(),
        Trend::Declining => "Thermal profile declining - review training load".to_string(),
    }];
    recommendations.extend(
        concern_areas
            .iter()
            .map(|name| format!("Re-assess {} at the next session", name)),
    );

    let timestamp = Utc::now();
    log::info!(
        "Compared {} reports: {} improving, {} of concern",
        reports.len(),
        improvement_areas.len(),
        concern_areas.len()
    );

    Ok(ComparisonResult {
        comparison_id: format!("comparison_{}", timestamp.timestamp()),
        timestamp,
        compared_analyses: reports.iter().map(|r| r.analysis_id.clone()).collect(),
        comparison_type: comparison_type.to_string(),
        temperature_changes,
        risk_changes,
        improvement_areas,
        concern_areas,
        overall_trend,
        recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ThermalAnalyzer;
    use image::{DynamicImage, GrayImage, Luma};

    fn report(level: u8, id: &str) -> AnalysisReport {
        let gray = GrayImage::from_pixel(64, 64, Luma([level]));
        let mut report = ThermalAnalyzer::default()
            .analyze(&DynamicImage::ImageLuma8(gray), "scan.png", "full")
            .unwrap();
        report.analysis_id = id.to_string();
        report
    }

    #[test]
    fn cooling_down_is_improvement() {
        let hot = report(255, "a");
        let cool = report(0, "b");
        let result = compare_reports(&[hot, cool], "temporal").unwrap();

        assert_eq!(result.overall_trend, Trend::Improving);
        assert_eq!(result.improvement_areas.len(), 8);
        assert!(result.concern_areas.is_empty());
        assert_eq!(result.risk_changes["hamstrings"], "critical->low");
        assert!(result.temperature_changes["calves"] < -9.0);
        assert_eq!(result.compared_analyses, vec!["a", "b"]);
    }

    #[test]
    fn identical_reports_are_stable() {
        let result = compare_reports(&[report(128, "a"), report(128, "b")], "temporal").unwrap();
        assert_eq!(result.overall_trend, Trend::Stable);
        assert!(result.risk_changes.is_empty());
        assert_eq!(result.recommendations.len(), 1);
    }

    #[test]
    fn single_report_is_rejected() {
        assert!(compare_reports(&[report(128, "a")], "temporal").is_err());
    }
}
