use std::path::{Path, PathBuf};
use std::fs;
use std::io::{self, ErrorKind};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

use crate::errors::{ThermalRiskError, Result};
use crate::preprocess::preprocess_image;
use crate::report::AnalysisReport;
use crate::risk::RiskLevel;

/// File extensions accepted as thermal images
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

/// Represents a decoded input image with its metadata
pub struct InputImage {
    pub image: DynamicImage,
    pub path: PathBuf,
    /// File stem, used to name outputs
    pub filename: String,
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Get all supported image files from a directory (recursively), sorted
pub fn get_image_files_in_dir<P: AsRef<Path>>(dir_path: P) -> Result<Vec<PathBuf>> {
    let dir_path = dir_path.as_ref();

    if !dir_path.exists() {
        return Err(ThermalRiskError::InvalidPath(dir_path.to_path_buf()));
    }

    if !dir_path.is_dir() {
        return Err(ThermalRiskError::Config(format!(
            "{} is not a directory", dir_path.display()
        )));
    }

    let mut image_files = Vec::new();
    find_image_files_recursive(dir_path, &mut image_files)?;
    image_files.sort();

    Ok(image_files)
}

fn find_image_files_recursive(dir_path: &Path, result: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir_path)? {
        let path = entry?.path();

        if path.is_dir() {
            find_image_files_recursive(&path, result)?;
        } else if path.is_file() && is_supported_image(&path) {
            result.push(path);
        }
    }

    Ok(())
}

/// Decode an image file, keeping its native channel layout
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<InputImage> {
    let path = path.as_ref();

    let filename = path.file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ThermalRiskError::InvalidPath(path.to_path_buf()))?
        .to_string();

    let image = image::open(path)?;

    Ok(InputImage {
        image,
        path: path.to_path_buf(),
        filename,
    })
}

/// Decode an image from an in-memory buffer
pub fn decode_image_bytes(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Outline color for a risk tier
fn risk_color(level: RiskLevel) -> Rgb<u8> {
    match level {
        RiskLevel::Low => Rgb([0, 200, 0]),
        RiskLevel::Moderate => Rgb([255, 215, 0]),
        RiskLevel::High => Rgb([255, 140, 0]),
        RiskLevel::Critical => Rgb([255, 0, 0]),
    }
}

/// Draw every region outline over the image, colored by risk tier
pub fn create_region_overlay(image: &DynamicImage, report: &AnalysisReport) -> RgbImage {
    let mut overlay = image.to_rgb8();

    for region in &report.regions {
        let points = &region.observation.coordinates;
        let color = risk_color(region.injury_risk.level);
        for (i, &(x0, y0)) in points.iter().enumerate() {
            let (x1, y1) = points[(i + 1) % points.len()];
            draw_line_segment_mut(
                &mut overlay,
                (x0 as f32, y0 as f32),
                (x1 as f32, y1 as f32),
                color,
            );
        }
    }

    overlay
}

// Writing is not a decode failure, report it as I/O
fn encode_error(e: image::ImageError) -> ThermalRiskError {
    ThermalRiskError::Io(io::Error::new(ErrorKind::Other, e.to_string()))
}

/// Save the preprocessed surface and the region overlay as PNGs
pub fn save_debug_images(
    image: &DynamicImage,
    report: &AnalysisReport,
    debug_dir: &Path,
    filename: &str,
) -> Result<()> {
    fs::create_dir_all(debug_dir)?;

    let surface = preprocess_image(image)?;
    surface
        .save_with_format(debug_dir.join(format!("{}_preprocessed.png", filename)), ImageFormat::Png)
        .map_err(encode_error)?;

    let overlay = create_region_overlay(image, report);
    overlay
        .save_with_format(debug_dir.join(format!("{}_regions.png", filename)), ImageFormat::Png)
        .map_err(encode_error)?;

    log::debug!("Saved debug images for {} to {}", filename, debug_dir.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_supported_extensions() {
        assert!(is_supported_image(Path::new("scan.PNG")));
        assert!(is_supported_image(Path::new("a/b/scan.jpeg")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("no_extension")));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = decode_image_bytes(b"definitely not an image").unwrap_err();
        assert!(err.is_decode_failure());
    }
}
