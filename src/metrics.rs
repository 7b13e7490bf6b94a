// src/metrics.rs - Whole-run thermal aggregates

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::color_analysis::{analyze_thermal_colors, gray_to_rgb};
use crate::config::Thresholds;
use crate::segmentation::RegionObservation;

/// Aggregate temperature statistics for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalMetrics {
    pub overall_average_temp: f64,
    pub overall_max_temp: f64,
    pub overall_min_temp: f64,
    pub temperature_range: f64,
    pub asymmetry_index: f64,
    pub hot_spots_count: usize,
    pub cold_spots_count: usize,
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Absolute difference between the mean temperature of regions named
/// "left" and those named "right".
///
/// No catalog region carries a side in its name today, so this is 0.0 for
/// every shipped layout; it only activates once side-tagged regions exist.
pub fn asymmetry_index(observations: &[RegionObservation]) -> f64 {
    if observations.len() < 2 {
        return 0.0;
    }

    let side_temps = |side: &str| -> Vec<f64> {
        observations
            .iter()
            .filter(|obs| obs.name.to_lowercase().contains(side))
            .map(|obs| obs.average_temperature)
            .collect()
    };

    let left = side_temps("left");
    let right = side_temps("right");
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    (mean(&left) - mean(&right)).abs()
}

/// Compute run metrics from region observations.
///
/// With no observations, a single temperature sample is taken from a hue
/// analysis of the whole surface (baseline when even that finds nothing).
/// Hot and cold spots are relative to the run's own mean.
pub fn calculate_thermal_metrics(
    surface: &GrayImage,
    observations: &[RegionObservation],
    thresholds: &Thresholds,
) -> ThermalMetrics {
    let mut temps: Vec<f64> = observations.iter().map(|obs| obs.average_temperature).collect();

    if temps.is_empty() {
        let colors = analyze_thermal_colors(&gray_to_rgb(surface));
        let sample = colors.overall_avg.unwrap_or(thresholds.baseline_temp);
        log::warn!(
            "No regions detected, falling back to whole-image sample of {:.1}°C",
            sample
        );
        temps.push(sample);
    }

    let average = mean(&temps);
    let max = temps.iter().copied().fold(f64::MIN, f64::max);
    let min = temps.iter().copied().fold(f64::MAX, f64::min);

    let hot_spots_count = observations
        .iter()
        .filter(|obs| obs.average_temperature > average + thresholds.hot_spot_threshold)
        .count();
    let cold_spots_count = observations
        .iter()
        .filter(|obs| obs.average_temperature < average + thresholds.cold_spot_threshold)
        .count();

    ThermalMetrics {
        overall_average_temp: average,
        overall_max_temp: max,
        overall_min_temp: min,
        temperature_range: max - min,
        asymmetry_index: asymmetry_index(observations),
        hot_spots_count,
        cold_spots_count,
    }
}
