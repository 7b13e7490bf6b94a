// src/quality.rs - Input image quality diagnostic

use image::{DynamicImage, GrayImage, RgbImage};
use serde::{Deserialize, Serialize};

use crate::color_analysis::rgb_to_hsv;

/// Resolution at or above which the resolution score saturates
const REFERENCE_PIXELS: f64 = 640.0 * 480.0;
/// Intensity standard deviation at which the contrast score saturates
const REFERENCE_CONTRAST: f64 = 50.0;
const MID_GRAY: f64 = 128.0;
/// Maximum hue on the 8-bit scale
const HUE_SCALE: f64 = 180.0;

/// Sub-scores of the quality diagnostic, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityBreakdown {
    pub resolution: f64,
    pub contrast: f64,
    pub brightness: f64,
    pub color_diversity: f64,
}

impl QualityBreakdown {
    /// Equal-weight mean of the four sub-scores
    pub fn overall(&self) -> f64 {
        (self.resolution + self.contrast + self.brightness + self.color_diversity) / 4.0
    }
}

/// Population mean and standard deviation
fn mean_and_stddev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
    (mean, variance.sqrt())
}

fn channel_values(raw: &[u8]) -> Vec<f64> {
    raw.iter().map(|&v| v as f64).collect()
}

fn hue_stddev(rgb: &RgbImage) -> f64 {
    let hues: Vec<f64> = rgb.pixels().map(|p| rgb_to_hsv(p).0).collect();
    mean_and_stddev(&hues).1
}

/// Native channel layout of the raw image
enum NativeImage {
    Gray(GrayImage),
    Color(RgbImage),
}

fn native(image: &DynamicImage) -> NativeImage {
    if image.color().has_color() {
        NativeImage::Color(image.to_rgb8())
    } else {
        NativeImage::Gray(image.to_luma8())
    }
}

/// Score the raw (not preprocessed) image.
///
/// Colour images measure hue spread; single-channel images measure
/// intensity spread. Contrast and brightness use every channel value.
pub fn assess_image_quality(image: &DynamicImage) -> QualityBreakdown {
    let (width, height) = (image.width(), image.height());
    let resolution = ((width as f64 * height as f64) / REFERENCE_PIXELS).min(1.0);

    let (mean, stddev, color_diversity) = match native(image) {
        NativeImage::Color(rgb) => {
            let (mean, stddev) = mean_and_stddev(&channel_values(rgb.as_raw()));
            (mean, stddev, hue_stddev(&rgb) / HUE_SCALE)
        }
        NativeImage::Gray(gray) => {
            let (mean, stddev) = mean_and_stddev(&channel_values(gray.as_raw()));
            (mean, stddev, stddev / 255.0)
        }
    };

    QualityBreakdown {
        resolution,
        contrast: (stddev / REFERENCE_CONTRAST).min(1.0),
        brightness: 1.0 - (mean - MID_GRAY).abs() / MID_GRAY,
        color_diversity,
    }
}

/// Overall 0-1 quality score of the raw image
pub fn image_quality_score(image: &DynamicImage) -> f64 {
    assess_image_quality(image).overall()
}
