// src/preprocess.rs - Grayscale conversion, denoising and contrast normalization

use image::{DynamicImage, GrayImage, Luma};
use imageproc::stats::histogram;

use crate::errors::{ThermalRiskError, Result};

/// Sigma equivalent to a 5x5 Gaussian kernel with automatic sigma
pub const BLUR_SIGMA: f32 = 1.1;
/// Half-width of the blur kernel (5 taps)
pub const BLUR_RADIUS: usize = 2;

/// Fail on buffers that decoded to zero pixels
pub fn ensure_non_empty(image: &DynamicImage) -> Result<()> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(ThermalRiskError::EmptyImage { width, height });
    }
    Ok(())
}

/// Reduce an image to single-channel luma
pub fn to_intensity(image: &DynamicImage) -> GrayImage {
    image.to_luma8()
}

/// Normalized 1-D Gaussian weights, `2 * radius + 1` taps
pub fn gaussian_kernel(sigma: f32, radius: usize) -> Vec<f32> {
    let r = radius as i32;
    let weights: Vec<f32> = (-r..=r)
        .map(|x| (-((x * x) as f32) / (2.0 * sigma * sigma)).exp())
        .collect();
    let total: f32 = weights.iter().sum();
    weights.iter().map(|w| w / total).collect()
}

// Mirror an out-of-range index back inside [0, len), edge pixel not repeated
fn reflect_index(index: i64, len: i64) -> usize {
    let reflected = if index < 0 {
        -index
    } else if index >= len {
        2 * (len - 1) - index
    } else {
        index
    };
    reflected.clamp(0, len - 1) as usize
}

// One 1-D pass; `horizontal` picks the axis
fn convolve_pass(src: &[f32], width: usize, height: usize, kernel: &[f32], horizontal: bool) -> Vec<f32> {
    let radius = (kernel.len() / 2) as i64;
    let mut out = vec![0.0f32; src.len()];

    for y in 0..height {
        for x in 0..width {
            out[y * width + x] = kernel
                .iter()
                .enumerate()
                .map(|(k, weight)| {
                    let offset = k as i64 - radius;
                    let (sx, sy) = if horizontal {
                        (reflect_index(x as i64 + offset, width as i64), y)
                    } else {
                        (x, reflect_index(y as i64 + offset, height as i64))
                    };
                    weight * src[sy * width + sx]
                })
                .sum();
        }
    }
    out
}

/// Suppress sensor noise with a separable 5x5 Gaussian blur.
///
/// Results are rounded to the nearest intensity, so a constant image
/// comes back unchanged.
pub fn smooth(gray: &GrayImage) -> GrayImage {
    let (width, height) = gray.dimensions();
    let (w, h) = (width as usize, height as usize);
    let kernel = gaussian_kernel(BLUR_SIGMA, BLUR_RADIUS);

    let values: Vec<f32> = gray.as_raw().iter().map(|&v| v as f32).collect();
    let rows = convolve_pass(&values, w, h, &kernel, true);
    let blurred = convolve_pass(&rows, w, h, &kernel, false);

    GrayImage::from_fn(width, height, |x, y| {
        let value = blurred[y as usize * w + x as usize];
        Luma([value.round().clamp(0.0, 255.0) as u8])
    })
}

/// Histogram equalization.
///
/// The lowest occupied intensity maps to 0 and the cumulative distribution
/// is stretched over [0, 255]. A surface with a single intensity is left
/// unchanged so uniform images keep their absolute level.
pub fn equalize_histogram(gray: &GrayImage) -> GrayImage {
    let hist = histogram(gray).channels[0];
    let total: u64 = hist.iter().map(|&count| count as u64).sum();

    let first = match hist.iter().position(|&count| count > 0) {
        Some(index) => index,
        None => return gray.clone(),
    };

    if hist[first] as u64 == total {
        return gray.clone();
    }

    let scale = 255.0 / (total - hist[first] as u64) as f64;
    let mut lut = [0u8; 256];
    let mut cumulative: u64 = 0;
    for intensity in (first + 1)..256 {
        cumulative += hist[intensity] as u64;
        lut[intensity] = (cumulative as f64 * scale).round().min(255.0) as u8;
    }

    let mut equalized = gray.clone();
    for pixel in equalized.pixels_mut() {
        let Luma([value]) = *pixel;
        *pixel = Luma([lut[value as usize]]);
    }
    equalized
}

/// Produce the normalized intensity surface consumed by segmentation.
/// Output dimensions always match the input.
pub fn preprocess_image(image: &DynamicImage) -> Result<GrayImage> {
    ensure_non_empty(image)?;

    let gray = to_intensity(image);
    let blurred = smooth(&gray);
    let equalized = equalize_histogram(&blurred);

    log::debug!(
        "Preprocessed {}x{} image ({} channel(s))",
        equalized.width(),
        equalized.height(),
        image.color().channel_count()
    );

    Ok(equalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, RgbImage};

    #[test]
    fn uniform_image_keeps_its_level() {
        for level in [0u8, 100, 204, 255] {
            let gray = GrayImage::from_pixel(16, 8, Luma([level]));
            let out = preprocess_image(&DynamicImage::ImageLuma8(gray)).unwrap();
            assert_eq!(out.dimensions(), (16, 8));
            assert!(out.pixels().all(|p| p[0] == level), "level {} drifted", level);
        }
    }

    #[test]
    fn kernel_has_five_normalized_symmetric_taps() {
        let kernel = gaussian_kernel(BLUR_SIGMA, BLUR_RADIUS);
        assert_eq!(kernel.len(), 5);
        assert!((kernel.iter().sum::<f32>() - 1.0).abs() < 1e-6);
        assert_eq!(kernel[0], kernel[4]);
        assert_eq!(kernel[1], kernel[3]);
        assert!(kernel[2] > kernel[1] && kernel[1] > kernel[0]);
    }

    #[test]
    fn blur_spreads_a_single_bright_pixel() {
        let mut gray = GrayImage::new(9, 9);
        gray.put_pixel(4, 4, Luma([255]));
        let out = smooth(&gray);
        assert!(out.get_pixel(4, 4)[0] < 255);
        assert!(out.get_pixel(5, 4)[0] > 0);
        assert_eq!(out.get_pixel(4, 7)[0], 0);
        assert_eq!(out.get_pixel(5, 4), out.get_pixel(3, 4));
    }

    #[test]
    fn tiny_images_blur_without_panicking() {
        for (w, h) in [(1, 1), (2, 1), (1, 3)] {
            let gray = GrayImage::from_pixel(w, h, Luma([77]));
            assert!(smooth(&gray).pixels().all(|p| p[0] == 77));
        }
    }

    #[test]
    fn equalization_stretches_two_levels() {
        let gray: GrayImage = ImageBuffer::from_fn(4, 2, |x, _| {
            if x < 2 { Luma([100]) } else { Luma([110]) }
        });
        let out = equalize_histogram(&gray);
        assert_eq!(out.get_pixel(0, 0)[0], 0);
        assert_eq!(out.get_pixel(3, 0)[0], 255);
    }

    #[test]
    fn color_input_yields_single_channel_of_same_size() {
        let rgb: RgbImage = ImageBuffer::from_pixel(20, 10, Rgb([200, 40, 90]));
        let out = preprocess_image(&DynamicImage::ImageRgb8(rgb)).unwrap();
        assert_eq!(out.dimensions(), (20, 10));
    }

    #[test]
    fn empty_image_is_rejected() {
        let empty = DynamicImage::ImageLuma8(GrayImage::new(0, 5));
        let err = preprocess_image(&empty).unwrap_err();
        assert!(err.is_decode_failure());
    }
}
