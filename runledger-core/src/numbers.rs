//! Numeric helpers centralizing safe casts and guarded arithmetic.

use num_traits::cast::cast;

/// Convert u64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn u64_to_f64(value: u64) -> f64 {
    cast::<u64, f64>(value).unwrap_or(0.0)
}

/// Clamp a signed millisecond delta to the unsigned range, returning 0 for negatives.
#[must_use]
pub fn non_negative_ms(delta: i64) -> u64 {
    cast::<i64, u64>(delta.max(0)).unwrap_or(0)
}

/// Floor a f64 and clamp it to the i64 range, returning 0 for non-finite values.
#[must_use]
pub fn floor_f64_to_i64(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let min = cast::<i64, f64>(i64::MIN).unwrap_or(f64::MIN);
    let max = cast::<i64, f64>(i64::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).floor();
    cast::<f64, i64>(clamped).unwrap_or(0)
}

/// Replace NaN and infinities with 0.
#[must_use]
pub const fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Divide, yielding 0 when the denominator is not strictly positive or the
/// quotient is not finite.
#[must_use]
pub fn guarded_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        finite_or_zero(numerator / denominator)
    } else {
        0.0
    }
}

/// Convert a percentage to a fraction of one.
#[must_use]
pub fn percent(value: f64) -> f64 {
    finite_or_zero(value) / 100.0
}
