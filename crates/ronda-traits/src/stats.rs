//! Numeric helpers for window metrics and aggregation.
//!
//! Every ratio in the engine goes through these so that near-zero
//! denominators fall back to a neutral value instead of producing
//! NaN or infinity.

/// Smallest day-of move (in percent) treated as a real move when it is used
/// as a denominator.
pub const MIN_PRICE_MOVE_PCT: f64 = 0.01;

/// Denominators with a smaller magnitude are treated as zero.
pub const MIN_DENOMINATOR: f64 = 1e-10;

/// Percentage change from `start` to `end`.
///
/// Returns 0 when `start` is not a positive price.
///
/// # Examples
///
/// ```
/// use ronda_traits::stats::pct_change;
///
/// assert!((pct_change(100.0, 104.0) - 4.0).abs() < 1e-12);
/// assert_eq!(pct_change(0.0, 5.0), 0.0);
/// ```
#[must_use]
pub fn pct_change(start: f64, end: f64) -> f64 {
    if start > 0.0 && end.is_finite() {
        (end - start) / start * 100.0
    } else {
        0.0
    }
}

/// `numerator / denominator`, or `fallback` when the denominator is
/// effectively zero or the result is not finite.
#[must_use]
pub fn ratio_or(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    if denominator.abs() <= MIN_DENOMINATOR {
        return fallback;
    }
    let ratio = numerator / denominator;
    if ratio.is_finite() { ratio } else { fallback }
}

/// Arithmetic mean of the finite values, `None` when there are none.
#[must_use]
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Clamp a score into `[0, 1]`. NaN maps to 0.
#[must_use]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
