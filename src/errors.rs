use thiserror::Error;
use std::io;
use std::path::PathBuf;

/// Custom error types for thermal risk analysis
#[derive(Error, Debug)]
pub enum ThermalRiskError {
    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration from {path}: {source}")]
    ConfigLoad {
        source: toml::de::Error,
        path: PathBuf,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV output error: {0}")]
    CsvOutput(#[from] csv::Error),

    #[error("Invalid input path: {0}")]
    InvalidPath(PathBuf),
}

impl ThermalRiskError {
    /// True when the input image could not be decoded or processed.
    /// Every other variant comes from the surrounding I/O and config layer.
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, ThermalRiskError::Decode(_) | ThermalRiskError::EmptyImage { .. })
    }
}

/// Type alias for Result with our custom error type
pub type Result<T> = std::result::Result<T, ThermalRiskError>;
