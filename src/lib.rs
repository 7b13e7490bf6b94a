// src/lib.rs - Library interface for thermal injury-risk analysis

pub mod color_analysis;
pub mod comparison;
pub mod config;
pub mod errors;
pub mod image_io;
pub mod metrics;
pub mod output;
pub mod pipeline;
pub mod preprocess;
pub mod quality;
pub mod recommendations;
pub mod regions;
pub mod report;
pub mod risk;
pub mod segmentation;
pub mod temperature;

// Re-export commonly used types and functions
pub use errors::{ThermalRiskError, Result};
pub use config::{Config, Thresholds};
pub use pipeline::{process_image, ThermalAnalyzer};
pub use image_io::{InputImage, decode_image_bytes, load_image};
pub use report::{AnalysisReport, ImageDimensions, RegionAnalysis, RiskSummary};

// Re-export analysis stages
pub use temperature::{temperature_of, MAX_TEMP, MIN_TEMP};
pub use regions::{detectable_regions, RegionDefinition, RegionInfo, REGION_CATALOG};
pub use preprocess::preprocess_image;
pub use segmentation::{region_polygon, segment_regions, RegionObservation, RegionPolygon};
pub use metrics::{calculate_thermal_metrics, ThermalMetrics};
pub use risk::{
    assess_region,
    classify_risk,
    risk_level_definitions,
    InjuryRiskAssessment,
    RiskLevel,
};
pub use recommendations::{generate_recommendations, Recommendations};
pub use quality::{assess_image_quality, image_quality_score, QualityBreakdown};
pub use comparison::{compare_reports, ComparisonResult, Trend};
