// src/segmentation.rs - Fixed-layout region polygons and per-region statistics

use image::{GrayImage, Luma};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;
use serde::{Deserialize, Serialize};

use crate::regions::{RegionDefinition, RegionType};
use crate::temperature::{temperature_of, temperature_of_u8};

/// Integer pixel coordinate (x, y)
pub type PolygonPoint = (i32, i32);

/// Region outline for one image size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionPolygon {
    pub region_key: String,
    pub points: Vec<PolygonPoint>,
}

/// Temperature statistics for one region of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionObservation {
    pub region_key: String,
    pub name: String,
    pub region_type: RegionType,
    pub coordinates: Vec<PolygonPoint>,
    pub pixel_count: usize,
    pub average_temperature: f64,
    pub max_temperature: f64,
    pub min_temperature: f64,
    pub temperature_stddev: f64,
}

/// Quadrilateral corners as fractions of (width, height), integer-divided
/// the same way for every image size. Regions stack top to bottom.
fn region_corners(key: &str, w: i32, h: i32) -> Option<[PolygonPoint; 4]> {
    let rect = |x0: i32, y0: i32, x1: i32, y1: i32| [(x0, y0), (x1, y0), (x1, y1), (x0, y1)];

    let corners = match key {
        "gluteus_maximus" => rect(w / 4, h / 12, 3 * w / 4, h / 4),
        "gluteus_medius" => rect(w / 6, h / 12, w / 3, h / 5),
        "hamstrings" => rect(w / 4, h / 4, 3 * w / 4, h / 2),
        "calves" => rect(w / 4, h / 2, 3 * w / 4, 3 * h / 4),
        "back_knee" => rect(w / 3, h / 2, 2 * w / 3, 3 * h / 5),
        "achilles" => rect(w / 3, 3 * h / 4, 2 * w / 3, 4 * h / 5),
        "back_ankle" => rect(w / 3, 4 * h / 5, 2 * w / 3, 5 * h / 6),
        "back_foot" => rect(w / 3, 5 * h / 6, 2 * w / 3, h),
        _ => return None,
    };
    Some(corners)
}

/// Compute the polygon for a catalog key at the given image size.
///
/// Points are clamped into the image so that 0 <= x < width and
/// 0 <= y < height. Returns `None` for unknown keys or empty images.
pub fn region_polygon(key: &str, width: u32, height: u32) -> Option<RegionPolygon> {
    if width == 0 || height == 0 {
        return None;
    }
    let (w, h) = (width as i32, height as i32);
    let corners = region_corners(key, w, h)?;

    let points = corners
        .iter()
        .map(|&(x, y)| (x.clamp(0, w - 1), y.clamp(0, h - 1)))
        .collect();

    Some(RegionPolygon {
        region_key: key.to_string(),
        points,
    })
}

/// Polygons for every catalog entry, indexed in catalog order
pub fn catalog_polygons(
    catalog: &[RegionDefinition],
    width: u32,
    height: u32,
) -> Vec<(&RegionDefinition, RegionPolygon)> {
    catalog
        .iter()
        .filter_map(|def| region_polygon(def.key, width, height).map(|poly| (def, poly)))
        .collect()
}

/// Twice the signed area (shoelace formula)
fn doubled_area(points: &[PolygonPoint]) -> i64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let (x0, y0) = points[i];
            let (x1, y1) = points[(i + 1) % n];
            x0 as i64 * y1 as i64 - x1 as i64 * y0 as i64
        })
        .sum()
}

/// Collect the intensities of every pixel inside the polygon.
///
/// Degenerate polygons (fewer than three points or zero area) select nothing.
pub fn extract_region_pixels(surface: &GrayImage, points: &[PolygonPoint]) -> Vec<u8> {
    // Accept explicitly closed rings; the fill closes the outline itself
    let points = match points {
        [first, .., last] if first == last => &points[..points.len() - 1],
        _ => points,
    };
    if points.len() < 3 || doubled_area(points) == 0 {
        return Vec::new();
    }

    let (width, height) = surface.dimensions();
    let mut mask = GrayImage::new(width, height);
    let poly: Vec<Point<i32>> = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
    draw_polygon_mut(&mut mask, &poly, Luma([255u8]));

    surface
        .pixels()
        .zip(mask.pixels())
        .filter(|(_, m)| m[0] > 0)
        .map(|(p, _)| p[0])
        .collect()
}

/// Build the observation for one region, or `None` when it selects no pixels.
///
/// Mean, max and min are taken on raw intensities and then converted; the
/// standard deviation is computed on the converted temperatures.
pub fn observe_region(
    surface: &GrayImage,
    def: &RegionDefinition,
    polygon: &RegionPolygon,
) -> Option<RegionObservation> {
    let pixels = extract_region_pixels(surface, &polygon.points);
    if pixels.is_empty() {
        log::debug!("Region {} selected no pixels, skipping", def.key);
        return None;
    }

    let count = pixels.len() as f64;
    let mean_intensity = pixels.iter().map(|&p| p as f64).sum::<f64>() / count;
    // Non-empty, so max/min exist
    let max_intensity = pixels.iter().copied().max().unwrap_or(0);
    let min_intensity = pixels.iter().copied().min().unwrap_or(0);

    let temperatures: Vec<f64> = pixels.iter().map(|&p| temperature_of_u8(p)).collect();
    let temp_mean = temperatures.iter().sum::<f64>() / count;
    let variance = temperatures
        .iter()
        .map(|t| (t - temp_mean).powi(2))
        .sum::<f64>()
        / count;

    let observation = RegionObservation {
        region_key: def.key.to_string(),
        name: def.display_name.to_string(),
        region_type: def.region_type,
        coordinates: polygon.points.clone(),
        pixel_count: pixels.len(),
        average_temperature: temperature_of(mean_intensity),
        max_temperature: temperature_of_u8(max_intensity),
        min_temperature: temperature_of_u8(min_intensity),
        temperature_stddev: variance.sqrt(),
    };

    log::debug!(
        "Region {}: avg={:.1}°C, max={:.1}°C, min={:.1}°C over {} px",
        def.key,
        observation.average_temperature,
        observation.max_temperature,
        observation.min_temperature,
        observation.pixel_count
    );

    Some(observation)
}

/// Segment the intensity surface into one observation per non-empty region,
/// in catalog order.
pub fn segment_regions(surface: &GrayImage, catalog: &[RegionDefinition]) -> Vec<RegionObservation> {
    let (width, height) = surface.dimensions();
    catalog_polygons(catalog, width, height)
        .iter()
        .filter_map(|(def, polygon)| observe_region(surface, def, polygon))
        .collect()
}
