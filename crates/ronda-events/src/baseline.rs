//! Trailing average volume used as the denominator of every volume ratio.

use ronda_traits::Date;

use crate::calendar::{Direction, TradingCalendar};

/// Mean volume over the `window` most recent trading days with non-zero
/// volume before `reference` (exclusive), scanning at most `max_scan`
/// calendar days back.
///
/// Returns 0 when no qualifying day is found. Callers treat a zero baseline
/// as "ratio unavailable" and fall back to a neutral ratio of 1.0.
#[must_use]
pub fn baseline_volume(
    calendar: &TradingCalendar,
    reference: Date,
    window: usize,
    max_scan: u32,
) -> u64 {
    let (total, days) = calendar
        .walk(reference, Direction::Backward, max_scan)
        .filter(|bar| bar.volume > 0)
        .take(window)
        .fold((0u128, 0u128), |(total, days), bar| {
            (total + u128::from(bar.volume), days + 1)
        });

    if days == 0 {
        0
    } else {
        u64::try_from(total / days).unwrap_or(u64::MAX)
    }
}
