// src/pipeline.rs - End-to-end thermal injury-risk analysis

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use image::DynamicImage;

use crate::config::{Config, Thresholds};
use crate::errors::{ThermalRiskError, Result};
use crate::image_io::{InputImage, save_debug_images};
use crate::metrics::calculate_thermal_metrics;
use crate::output::{write_regions_csv, write_report_json};
use crate::preprocess::preprocess_image;
use crate::quality::image_quality_score;
use crate::recommendations::generate_recommendations;
use crate::regions::{RegionDefinition, REGION_CATALOG};
use crate::report::{AnalysisReport, ImageDimensions, RegionAnalysis, RiskSummary};
use crate::risk::assess_region;
use crate::segmentation::segment_regions;

/// Model confidence recorded in every report. A fixed placeholder,
/// there is no trained model behind it.
pub const MODEL_CONFIDENCE: f64 = 0.85;

/// Runs the analysis pipeline over decoded images.
///
/// Holds only read-only tables, so one analyzer can serve concurrent
/// calls; every call allocates its own observations and report.
#[derive(Debug, Clone)]
pub struct ThermalAnalyzer {
    catalog: &'static [RegionDefinition],
    thresholds: Thresholds,
}

impl Default for ThermalAnalyzer {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}

impl ThermalAnalyzer {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            catalog: &REGION_CATALOG,
            thresholds,
        }
    }

    /// Analyze one decoded image.
    ///
    /// `analysis_type` is carried into the report unchanged. Fails only
    /// when the image holds no pixels.
    pub fn analyze(
        &self,
        image: &DynamicImage,
        original_filename: &str,
        analysis_type: &str,
    ) -> Result<AnalysisReport> {
        let start_time = Instant::now();
        let timestamp = Utc::now();

        let surface = preprocess_image(image)?;
        let observations = segment_regions(&surface, self.catalog);
        let thermal_metrics = calculate_thermal_metrics(&surface, &observations, &self.thresholds);

        let regions: Vec<RegionAnalysis> = observations
            .iter()
            .map(|observation| {
                let (observation, injury_risk) = assess_region(observation, &self.thresholds);
                RegionAnalysis { observation, injury_risk }
            })
            .collect();

        let recommendations = generate_recommendations(&regions, &thermal_metrics, &self.thresholds);
        let summary = RiskSummary::from_regions(&regions);
        let quality = image_quality_score(image);

        let report = AnalysisReport {
            analysis_id: analysis_id(original_filename, &timestamp),
            timestamp,
            original_filename: original_filename.to_string(),
            image_dimensions: ImageDimensions {
                width: image.width(),
                height: image.height(),
            },
            analysis_type: analysis_type.to_string(),
            regions,
            thermal_metrics,
            total_regions_detected: summary.total_regions_detected,
            high_risk_regions: summary.high_risk_regions,
            critical_risk_regions: summary.critical_risk_regions,
            overall_recommendations: recommendations.overall,
            priority_actions: recommendations.priority,
            processing_time_seconds: start_time.elapsed().as_secs_f64(),
            model_confidence: MODEL_CONFIDENCE,
            image_quality_score: quality,
        };

        log::info!(
            "Analyzed {}: {} regions, {} high-risk, {} critical, quality {:.2}",
            original_filename,
            report.total_regions_detected,
            report.high_risk_regions,
            report.critical_risk_regions,
            report.image_quality_score
        );

        Ok(report)
    }
}

/// Report id: file stem plus a millisecond timestamp, so reports from one
/// batch stay distinguishable
fn analysis_id(original_filename: &str, timestamp: &DateTime<Utc>) -> String {
    let stem = Path::new(original_filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(original_filename);
    format!("analysis_{}_{}", stem, timestamp.format("%Y%m%d%H%M%S%3f"))
}

/// Analyze a loaded input image and write the configured outputs
pub fn process_image(
    input_image: InputImage,
    analyzer: &ThermalAnalyzer,
    config: &Config,
) -> Result<AnalysisReport> {
    let InputImage { image, path, filename } = input_image;

    let original_filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ThermalRiskError::InvalidPath(path.clone()))?
        .to_string();

    let report = analyzer.analyze(&image, &original_filename, &config.analysis_type)?;

    let output_dir = PathBuf::from(&config.output_base_dir);
    let json_path = write_report_json(&report, &output_dir, &filename)?;
    log::info!("Report written to {}", json_path.display());

    if config.write_csv {
        write_regions_csv(&report, &output_dir, &filename)?;
    }

    if config.save_debug_images {
        save_debug_images(&image, &report, &output_dir.join("debug"), &filename)?;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::RiskLevel;
    use chrono::TimeZone;
    use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};

    #[test]
    fn summary_counts_follow_tier_membership() {
        // Rows darken toward the feet, so tiers differ between regions
        let gray: GrayImage = ImageBuffer::from_fn(64, 120, |_, y| Luma([(255 - y * 2) as u8]));
        let report = ThermalAnalyzer::default()
            .analyze(&DynamicImage::ImageLuma8(gray), "gradient.png", "full")
            .unwrap();

        let critical = report
            .regions
            .iter()
            .filter(|r| r.injury_risk.level == RiskLevel::Critical)
            .count();
        let elevated = report
            .regions
            .iter()
            .filter(|r| r.injury_risk.level.is_elevated())
            .count();

        assert_eq!(report.critical_risk_regions, critical);
        assert_eq!(report.high_risk_regions, elevated);
        assert_eq!(report.total_regions_detected, report.regions.len());
        assert_eq!(report.summary(), RiskSummary::from_regions(&report.regions));
    }

    #[test]
    fn analysis_type_is_passed_through() {
        let rgb: RgbImage = ImageBuffer::from_pixel(32, 32, Rgb([90, 90, 90]));
        let report = ThermalAnalyzer::default()
            .analyze(&DynamicImage::ImageRgb8(rgb), "scan.jpg", "quick")
            .unwrap();
        assert_eq!(report.analysis_type, "quick");
        assert_eq!(report.original_filename, "scan.jpg");
        assert_eq!(report.model_confidence, MODEL_CONFIDENCE);
        assert!(report.analysis_id.starts_with("analysis_scan_"));
    }

    #[test]
    fn analysis_ids_differ_per_file_within_one_instant() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 5).unwrap();
        let left = analysis_id("left_leg.png", &at);
        let right = analysis_id("right_leg.png", &at);
        assert_eq!(left, "analysis_left_leg_20240301093005000");
        assert_ne!(left, right);
    }

    #[test]
    fn critical_bound_is_inclusive_end_to_end() {
        // Intensity 204 maps to exactly baseline + 5.0
        let rgb: RgbImage = ImageBuffer::from_pixel(640, 480, Rgb([204, 204, 204]));
        let report = ThermalAnalyzer::default()
            .analyze(&DynamicImage::ImageRgb8(rgb), "edge.png", "full")
            .unwrap();

        assert_eq!(report.total_regions_detected, REGION_CATALOG.len());
        for region in &report.regions {
            assert_eq!(region.observation.average_temperature, 38.0);
            assert_eq!(region.injury_risk.level, RiskLevel::Critical);
        }
    }

    #[test]
    fn confidences_ignore_configured_thresholds() {
        let thresholds = Thresholds {
            baseline_temp: 31.0,
            ..Thresholds::default()
        };
        let rgb: RgbImage = ImageBuffer::from_pixel(64, 64, Rgb([120, 120, 120]));
        let report = ThermalAnalyzer::new(thresholds)
            .analyze(&DynamicImage::ImageRgb8(rgb), "scan.png", "full")
            .unwrap();

        assert_eq!(report.model_confidence, 0.85);
        assert!(report.regions.iter().all(|r| r.injury_risk.confidence == 0.8));
    }
}
