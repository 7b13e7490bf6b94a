// src/report.rs - Assembled analysis report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::metrics::ThermalMetrics;
use crate::risk::{InjuryRiskAssessment, RiskLevel};
use crate::segmentation::RegionObservation;

/// One detected region with its risk assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionAnalysis {
    #[serde(flatten)]
    pub observation: RegionObservation,
    pub injury_risk: InjuryRiskAssessment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Region counts by risk tier membership
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiskSummary {
    pub total_regions_detected: usize,
    /// High or critical
    pub high_risk_regions: usize,
    /// Critical only
    pub critical_risk_regions: usize,
}

impl RiskSummary {
    pub fn from_regions(regions: &[RegionAnalysis]) -> Self {
        let count = |pred: fn(RiskLevel) -> bool| {
            regions.iter().filter(|r| pred(r.injury_risk.level)).count()
        };
        Self {
            total_regions_detected: regions.len(),
            high_risk_regions: count(|level| level.is_elevated()),
            critical_risk_regions: count(|level| level == RiskLevel::Critical),
        }
    }
}

/// Complete result of one analysis run. Never mutated after assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis_id: String,
    pub timestamp: DateTime<Utc>,
    pub original_filename: String,
    pub image_dimensions: ImageDimensions,
    pub analysis_type: String,

    pub regions: Vec<RegionAnalysis>,
    pub thermal_metrics: ThermalMetrics,

    pub total_regions_detected: usize,
    pub high_risk_regions: usize,
    pub critical_risk_regions: usize,

    pub overall_recommendations: Vec<String>,
    pub priority_actions: Vec<String>,

    pub processing_time_seconds: f64,
    pub model_confidence: f64,
    pub image_quality_score: f64,
}

impl AnalysisReport {
    /// Nested key/value form handed to persistence and transport layers
    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn summary(&self) -> RiskSummary {
        RiskSummary {
            total_regions_detected: self.total_regions_detected,
            high_risk_regions: self.high_risk_regions,
            critical_risk_regions: self.critical_risk_regions,
        }
    }

    /// Look up a region by catalog key
    pub fn region(&self, key: &str) -> Option<&RegionAnalysis> {
        self.regions.iter().find(|r| r.observation.region_key == key)
    }
}
