// src/config.rs - Runtime configuration and analysis thresholds

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{ThermalRiskError, Result};

/// Configuration for the thermal risk CLI and batch runner
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_input_path")]
    pub input_path: String,

    #[serde(default = "default_output_base_dir")]
    pub output_base_dir: String,

    /// Label carried into every report; not branched on by the analysis
    #[serde(default = "default_analysis_type")]
    pub analysis_type: String,

    #[serde(default = "default_parallel")]
    pub use_parallel: bool,

    #[serde(default = "default_write_csv")]
    pub write_csv: bool,

    #[serde(default)]
    pub save_debug_images: bool,

    #[serde(default)]
    pub thresholds: Thresholds,
}

/// Temperature and risk thresholds shared by every analysis run.
///
/// All temperatures are in degrees Celsius. Defaults reproduce the
/// reference constants so reports stay comparable across runs.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Thresholds {
    /// Degrees above the run mean for a region to count as a hot spot
    pub hot_spot_threshold: f64,
    /// Degrees relative to the run mean (negative) for a cold spot
    pub cold_spot_threshold: f64,
    /// Left/right difference that triggers an asymmetry warning
    pub asymmetry_threshold: f64,
    pub baseline_temp: f64,
    pub min_body_temp: f64,
    pub max_body_temp: f64,

    // Risk tiers, inclusive lower bounds on the baseline difference
    pub moderate_risk_diff: f64,
    pub high_risk_diff: f64,
    pub critical_risk_diff: f64,

    /// Hot-spot count above which the report asks for inflammation monitoring
    pub many_hot_spots: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            hot_spot_threshold: 2.0,
            cold_spot_threshold: -2.0,
            asymmetry_threshold: 1.5,
            baseline_temp: 33.0,
            min_body_temp: 30.0,
            max_body_temp: 40.0,
            moderate_risk_diff: 1.5,
            high_risk_diff: 3.0,
            critical_risk_diff: 5.0,
            many_hot_spots: 3,
        }
    }
}

impl Thresholds {
    /// Validate threshold ordering and ranges
    pub fn validate(&self) -> Result<()> {
        if self.min_body_temp >= self.max_body_temp {
            return Err(ThermalRiskError::Config(
                "min_body_temp must be < max_body_temp".to_string(),
            ));
        }

        if !(self.moderate_risk_diff < self.high_risk_diff
            && self.high_risk_diff < self.critical_risk_diff)
        {
            return Err(ThermalRiskError::Config(
                "risk thresholds must be strictly increasing (moderate < high < critical)".to_string(),
            ));
        }

        if self.hot_spot_threshold <= 0.0 {
            return Err(ThermalRiskError::Config(
                "hot_spot_threshold must be > 0.0".to_string(),
            ));
        }

        if self.cold_spot_threshold >= 0.0 {
            return Err(ThermalRiskError::Config(
                "cold_spot_threshold must be < 0.0".to_string(),
            ));
        }

        Ok(())
    }
}

fn default_input_path() -> String {
    "./input".to_string()
}

fn default_output_base_dir() -> String {
    "./results".to_string()
}

fn default_analysis_type() -> String {
    "full".to_string()
}

fn default_parallel() -> bool {
    true
}

fn default_write_csv() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: default_input_path(),
            output_base_dir: default_output_base_dir(),
            analysis_type: default_analysis_type(),
            use_parallel: default_parallel(),
            write_csv: default_write_csv(),
            save_debug_images: false,
            thresholds: Thresholds::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ThermalRiskError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|source| ThermalRiskError::ConfigLoad {
            source,
            path: path.to_path_buf(),
        })
    }

    /// Load the config file if present, otherwise fall back to defaults
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration and create output directories
    pub fn validate(&self) -> Result<()> {
        let input_path = PathBuf::from(&self.input_path);
        if !input_path.exists() {
            return Err(ThermalRiskError::InvalidPath(input_path));
        }

        if self.analysis_type.trim().is_empty() {
            return Err(ThermalRiskError::Config(
                "analysis_type must not be empty".to_string(),
            ));
        }

        self.thresholds.validate()?;

        fs::create_dir_all(PathBuf::from(&self.output_base_dir).join("reports"))?;

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            ThermalRiskError::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            input_path = "scans"
            [thresholds]
            baseline_temp = 32.5
            "#,
        )
        .unwrap();

        assert_eq!(config.input_path, "scans");
        assert_eq!(config.analysis_type, "full");
        assert_eq!(config.thresholds.baseline_temp, 32.5);
        assert_eq!(config.thresholds.critical_risk_diff, 5.0);
    }

    #[test]
    fn confidence_keys_are_not_thresholds() {
        let config: Config = toml::from_str(
            r#"
            [thresholds]
            risk_confidence = 0.1
            model_confidence = 0.2
            "#,
        )
        .unwrap();

        assert_eq!(config.thresholds, Thresholds::default());
        let saved = toml::to_string_pretty(&config).unwrap();
        assert!(!saved.contains("confidence"));
    }

    #[test]
    fn rejects_unordered_risk_tiers() {
        let thresholds = Thresholds {
            high_risk_diff: 6.0,
            ..Thresholds::default()
        };
        assert!(thresholds.validate().is_err());
    }

    #[test]
    fn rejects_positive_cold_spot_threshold() {
        let thresholds = Thresholds {
            cold_spot_threshold: 1.0,
            ..Thresholds::default()
        };
        assert!(thresholds.validate().is_err());
    }

    #[test]
    fn default_thresholds_are_valid() {
        assert!(Thresholds::default().validate().is_ok());
    }
}
