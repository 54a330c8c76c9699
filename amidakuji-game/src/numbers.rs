//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Convert a count to f32, returning 0.0 if it cannot be represented.
#[must_use]
pub fn usize_to_f32(value: usize) -> f32 {
    cast::<usize, f32>(value).unwrap_or(0.0)
}

/// Ratio of two counts as f32, or 0.0 when the denominator is zero.
#[must_use]
pub fn ratio_f32(numerator: usize, denominator: usize) -> f32 {
    if denominator == 0 {
        return 0.0;
    }
    usize_to_f32(numerator) / usize_to_f32(denominator)
}

/// Floor a f32 into usize, returning 0 for negative or non-finite values.
#[must_use]
pub fn floor_f32_to_usize(value: f32) -> usize {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    cast::<f32, usize>(value.floor()).unwrap_or(usize::MAX)
}

/// Clamp into `[0, 1]`, mapping NaN to 0.
#[must_use]
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}
