//! Numeric helpers centralizing the float handling of stabilization timers.

use num_traits::cast::cast;

/// Returns the value when it is a finite, strictly positive duration in seconds.
#[must_use]
pub fn positive_seconds(value: f32) -> Option<f32> {
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Fill ratio of `part` over `whole`, clamped to `0.0..=1.0`.
///
/// Returns 0.0 when `whole` is not a positive finite number.
#[must_use]
pub fn fill_ratio(part: f32, whole: f32) -> f32 {
    match positive_seconds(whole) {
        Some(whole) if part.is_finite() => (part / whole).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Ratio of two counts as a float, returning 1.0 for an empty denominator.
#[must_use]
pub fn count_ratio(part: usize, whole: usize) -> f32 {
    if whole == 0 {
        return 1.0;
    }
    let part = cast::<usize, f32>(part.min(whole)).unwrap_or(0.0);
    let whole = cast::<usize, f32>(whole).unwrap_or(1.0);
    part / whole
}

/// Sum a sequence of second values in iteration order.
#[must_use]
pub fn sum_seconds<I>(values: I) -> f32
where
    I: IntoIterator<Item = f32>,
{
    values.into_iter().fold(0.0, |acc, value| acc + value)
}
