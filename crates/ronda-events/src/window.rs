//! Lead-in, day-of and lead-out measurements around an announcement.

use ronda_traits::stats::{pct_change, ratio_or};
use ronda_traits::{Date, PriceBar, Result, RondaError};
use serde::{Deserialize, Serialize};

use crate::baseline::baseline_volume;
use crate::calendar::{Direction, TradingCalendar};

/// Window lengths and scan limits.
///
/// Trading-day counts are how many sessions a window needs; scan limits are
/// how many calendar days may be walked to find them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Trading days before the event (default: 5).
    pub lead_in_days: usize,
    /// Calendar days scanned for the lead-in (default: 15).
    pub lead_in_max_scan: u32,
    /// Calendar days scanned forward when the event date is not a trading day (default: 5).
    pub day_of_forward_scan: u32,
    /// Calendar days scanned back for the pre-event close (default: 10).
    pub pre_event_scan: u32,
    /// Trading days after the event (default: 10).
    pub lead_out_days: usize,
    /// Calendar days scanned for the lead-out (default: 20).
    pub lead_out_max_scan: u32,
    /// Trading days averaged for the baseline volume (default: 30).
    pub baseline_days: usize,
    /// Calendar days scanned for the baseline (default: 45).
    pub baseline_max_scan: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            lead_in_days: 5,
            lead_in_max_scan: 15,
            day_of_forward_scan: 5,
            pre_event_scan: 10,
            lead_out_days: 10,
            lead_out_max_scan: 20,
            baseline_days: 30,
            baseline_max_scan: 45,
        }
    }
}

impl WindowConfig {
    /// Reject windows that can never be filled.
    pub fn validate(&self) -> Result<()> {
        let windows = [
            ("lead_in", self.lead_in_days, self.lead_in_max_scan),
            ("lead_out", self.lead_out_days, self.lead_out_max_scan),
            ("baseline", self.baseline_days, self.baseline_max_scan),
        ];
        for (name, days, scan) in windows {
            if days == 0 {
                return Err(RondaError::InvalidConfig(format!(
                    "{name} window needs at least one trading day"
                )));
            }
            if (scan as usize) < days {
                return Err(RondaError::InvalidConfig(format!(
                    "{name} scan of {scan} calendar days cannot cover {days} trading days"
                )));
            }
        }
        if self.pre_event_scan == 0 {
            return Err(RondaError::InvalidConfig(
                "pre_event_scan must be at least one day".to_string(),
            ));
        }
        Ok(())
    }
}

/// Price and volume behaviour over one window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowMetrics {
    /// Close-to-close change in percent.
    pub price_change_pct: f64,
    /// Window volume relative to the baseline (1.0 when no baseline exists).
    pub volume_ratio: f64,
    /// Trading sessions the window spans.
    pub trading_days_covered: usize,
    /// Reference price the change is measured from.
    pub start_price: f64,
    /// Price the change is measured to.
    pub end_price: f64,
}

/// The event session and its metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayOf {
    /// The trading session the event landed on.
    pub session: PriceBar,
    /// Change against the previous close and volume against the baseline.
    pub metrics: WindowMetrics,
}

/// Computes window metrics against one calendar.
#[derive(Debug, Clone, Copy)]
pub struct WindowCalculator<'a> {
    calendar: &'a TradingCalendar,
    config: &'a WindowConfig,
}

impl<'a> WindowCalculator<'a> {
    /// Create a calculator over `calendar`.
    #[must_use]
    pub const fn new(calendar: &'a TradingCalendar, config: &'a WindowConfig) -> Self {
        Self { calendar, config }
    }

    /// Baseline volume ahead of `date`.
    #[must_use]
    pub fn baseline_volume(&self, date: Date) -> u64 {
        baseline_volume(
            self.calendar,
            date,
            self.config.baseline_days,
            self.config.baseline_max_scan,
        )
    }

    /// The trading days before the event.
    ///
    /// `None` unless the full window is found inside the scan limit.
    #[must_use]
    pub fn lead_in(&self, event_date: Date) -> Option<WindowMetrics> {
        let window: Vec<&PriceBar> = self
            .calendar
            .walk(event_date, Direction::Backward, self.config.lead_in_max_scan)
            .take(self.config.lead_in_days)
            .collect();
        if window.len() < self.config.lead_in_days {
            return None;
        }

        // Walked backwards: first is T-1, last is T-N.
        let latest = window.first()?;
        let earliest = window.last()?;
        Some(WindowMetrics {
            price_change_pct: pct_change(earliest.close, latest.close),
            volume_ratio: self.volume_ratio(mean_volume(&window), event_date),
            trading_days_covered: window.len(),
            start_price: earliest.close,
            end_price: latest.close,
        })
    }

    /// The event session: the event date itself, or the next trading day.
    ///
    /// `None` when no session is found, which drops the event.
    #[must_use]
    pub fn day_of(&self, event_date: Date) -> Option<DayOf> {
        let session = *self.calendar.lookup(event_date).or_else(|| {
            self.calendar
                .nearest(event_date, Direction::Forward, self.config.day_of_forward_scan)
        })?;

        let start_price = self.pre_event_close(event_date).unwrap_or(session.close);
        Some(DayOf {
            session,
            metrics: WindowMetrics {
                price_change_pct: pct_change(start_price, session.close),
                volume_ratio: self.volume_ratio(session.volume as f64, event_date),
                trading_days_covered: 1,
                start_price,
                end_price: session.close,
            },
        })
    }

    /// The trading days after the event, measured from the pre-event close.
    ///
    /// `None` unless the full window is found inside the scan limit.
    #[must_use]
    pub fn lead_out(&self, event_date: Date) -> Option<WindowMetrics> {
        let window: Vec<&PriceBar> = self
            .calendar
            .walk(event_date, Direction::Forward, self.config.lead_out_max_scan)
            .take(self.config.lead_out_days)
            .collect();
        if window.len() < self.config.lead_out_days {
            return None;
        }

        let first = window.first()?;
        let last = window.last()?;
        let start_price = self.pre_event_close(event_date).unwrap_or(first.close);
        Some(WindowMetrics {
            price_change_pct: pct_change(start_price, last.close),
            volume_ratio: self.volume_ratio(mean_volume(&window), event_date),
            trading_days_covered: window.len(),
            start_price,
            end_price: last.close,
        })
    }

    fn pre_event_close(&self, event_date: Date) -> Option<f64> {
        self.calendar
            .nearest(event_date, Direction::Backward, self.config.pre_event_scan)
            .map(|bar| bar.close)
    }

    fn volume_ratio(&self, volume: f64, event_date: Date) -> f64 {
        ratio_or(volume, self.baseline_volume(event_date) as f64, 1.0)
    }
}

fn mean_volume(window: &[&PriceBar]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    window.iter().map(|bar| bar.volume as f64).sum::<f64>() / window.len() as f64
}
