// src/temperature.rs - Pixel intensity to temperature mapping

/// Lowest temperature represented by intensity 0 (degrees C)
pub const MIN_TEMP: f64 = 30.0;
/// Highest temperature represented by intensity 255 (degrees C)
pub const MAX_TEMP: f64 = 40.0;

/// Convert a pixel intensity in [0, 255] to a temperature.
///
/// The source images are not radiometric, so intensity is a normalized
/// proxy: a linear map onto [MIN_TEMP, MAX_TEMP], clamped at both ends.
/// Non-integer intensities (region means) are accepted.
#[inline]
pub fn temperature_of(intensity: f64) -> f64 {
    let normalized = intensity / 255.0;
    let temperature = MIN_TEMP + (MAX_TEMP - MIN_TEMP) * normalized;
    temperature.clamp(MIN_TEMP, MAX_TEMP)
}

/// Convert an 8-bit intensity to a temperature
#[inline]
pub fn temperature_of_u8(intensity: u8) -> f64 {
    temperature_of(intensity as f64)
}
