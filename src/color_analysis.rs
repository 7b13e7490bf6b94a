// src/color_analysis.rs - Whole-image hue band analysis

use image::{GrayImage, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::temperature::temperature_of;

const MIN_SATURATION: f64 = 50.0;
const MIN_VALUE: f64 = 30.0;

/// Convert an RGB pixel to HSV on the 8-bit scale:
/// hue in [0, 180), saturation and value in [0, 255].
pub fn rgb_to_hsv(pixel: &Rgb<u8>) -> (f64, f64, f64) {
    let r = pixel[0] as f64 / 255.0;
    let g = pixel[1] as f64 / 255.0;
    let b = pixel[2] as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue_degrees = if delta < 1e-9 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };
    let hue_degrees = if hue_degrees < 0.0 { hue_degrees + 360.0 } else { hue_degrees };

    let saturation = if max < 1e-9 { 0.0 } else { delta / max * 255.0 };

    (hue_degrees / 2.0, saturation, max * 255.0)
}

/// Temperatures derived from hue bands of a whole image.
/// Each field is `None` when no pixel falls into that band.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorTemperatureMap {
    pub cold_avg: Option<f64>,
    pub medium_avg: Option<f64>,
    pub hot_avg: Option<f64>,
    pub overall_avg: Option<f64>,
    pub overall_max: Option<f64>,
    pub overall_min: Option<f64>,
}

#[derive(Default)]
struct BandAccumulator {
    sum: f64,
    count: usize,
}

impl BandAccumulator {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn temperature(&self) -> Option<f64> {
        (self.count > 0).then(|| temperature_of(self.sum / self.count as f64))
    }
}

/// Partition pixels into cold, medium and hot hue bands and convert the
/// brightness of each band to a temperature. Dark pixels (v <= 30) are
/// treated as background.
pub fn analyze_thermal_colors(image: &RgbImage) -> ColorTemperatureMap {
    let mut cold = BandAccumulator::default();
    let mut medium = BandAccumulator::default();
    let mut hot = BandAccumulator::default();
    let mut overall = BandAccumulator::default();
    let mut max_value: Option<f64> = None;
    let mut min_value: Option<f64> = None;

    for pixel in image.pixels() {
        let (h, s, v) = rgb_to_hsv(pixel);
        if v <= MIN_VALUE {
            continue;
        }

        overall.add(v);
        max_value = Some(max_value.map_or(v, |m| m.max(v)));
        min_value = Some(min_value.map_or(v, |m| m.min(v)));

        if s <= MIN_SATURATION {
            continue;
        }
        if h < 120.0 {
            cold.add(v);
        }
        if (120.0..180.0).contains(&h) {
            medium.add(v);
        }
        // The 8-bit hue wheel stops at 180, so only the low wrap applies
        if h >= 180.0 || h < 20.0 {
            hot.add(v);
        }
    }

    ColorTemperatureMap {
        cold_avg: cold.temperature(),
        medium_avg: medium.temperature(),
        hot_avg: hot.temperature(),
        overall_avg: overall.temperature(),
        overall_max: max_value.map(temperature_of),
        overall_min: min_value.map(temperature_of),
    }
}

/// Expand a single-channel surface to RGB for hue analysis
pub fn gray_to_rgb(surface: &GrayImage) -> RgbImage {
    RgbImage::from_fn(surface.width(), surface.height(), |x, y| {
        let v = surface.get_pixel(x, y)[0];
        Rgb([v, v, v])
    })
}
