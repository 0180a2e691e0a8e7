//! Date-keyed index over daily price bars.

use std::collections::BTreeMap;

use chrono::Days;
use ronda_traits::{Date, PriceBar};
use tracing::warn;

/// Direction of a calendar scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards earlier dates.
    Backward,
    /// Towards later dates.
    Forward,
}

/// Read-only lookup of trading days by date.
///
/// Dates without a bar (weekends, holidays, suspensions) are simply absent.
/// Scans step one calendar day at a time and never look at the start date
/// itself.
#[derive(Debug, Clone, Default)]
pub struct TradingCalendar {
    bars: BTreeMap<Date, PriceBar>,
}

impl TradingCalendar {
    /// Index the given bars. When two bars share a date the later one wins.
    pub fn new(bars: impl IntoIterator<Item = PriceBar>) -> Self {
        let mut index = BTreeMap::new();
        for bar in bars {
            if index.insert(bar.date, bar).is_some() {
                warn!(date = %bar.date, "duplicate price bar, keeping the later one");
            }
        }
        Self { bars: index }
    }

    /// Bar for exactly `date`.
    #[must_use]
    pub fn lookup(&self, date: Date) -> Option<&PriceBar> {
        self.bars.get(&date)
    }

    /// First trading day found within `max_days` calendar days of `date`,
    /// excluding `date` itself.
    #[must_use]
    pub fn nearest(&self, date: Date, direction: Direction, max_days: u32) -> Option<&PriceBar> {
        self.walk(date, direction, max_days).next()
    }

    /// Trading days within `max_days` calendar days of `date` (exclusive),
    /// in scan order.
    pub fn walk(
        &self,
        date: Date,
        direction: Direction,
        max_days: u32,
    ) -> impl Iterator<Item = &PriceBar> + '_ {
        (1..=u64::from(max_days))
            .map_while(move |offset| step(date, direction, offset))
            .filter_map(|day| self.bars.get(&day))
    }

    /// Number of trading days.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Whether the calendar has no trading days.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Earliest trading day.
    #[must_use]
    pub fn first_date(&self) -> Option<Date> {
        self.bars.keys().next().copied()
    }

    /// Latest trading day.
    #[must_use]
    pub fn last_date(&self) -> Option<Date> {
        self.bars.keys().next_back().copied()
    }

    /// All bars in ascending date order.
    pub fn bars(&self) -> impl Iterator<Item = &PriceBar> + '_ {
        self.bars.values()
    }
}

impl FromIterator<PriceBar> for TradingCalendar {
    fn from_iter<I: IntoIterator<Item = PriceBar>>(iter: I) -> Self {
        Self::new(iter)
    }
}

fn step(date: Date, direction: Direction, days: u64) -> Option<Date> {
    match direction {
        Direction::Backward => date.checked_sub_days(Days::new(days)),
        Direction::Forward => date.checked_add_days(Days::new(days)),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Datelike, Weekday};

    pub(crate) fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    pub(crate) fn bar(date: Date, close: f64, volume: u64) -> PriceBar {
        PriceBar {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume,
        }
    }

    /// Weekday bars from `start` to `end` inclusive, closing at `close`.
    pub(crate) fn weekday_bars(start: Date, end: Date, close: f64, volume: u64) -> Vec<PriceBar> {
        start
            .iter_days()
            .take_while(|d| *d <= end)
            .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
            .map(|d| bar(d, close, volume))
            .collect()
    }

    #[test]
    fn test_lookup_and_bounds() {
        let cal = TradingCalendar::new(weekday_bars(date(2024, 3, 4), date(2024, 3, 15), 1.0, 10));
        assert_eq!(cal.len(), 10);
        assert_eq!(cal.first_date(), Some(date(2024, 3, 4)));
        assert_eq!(cal.last_date(), Some(date(2024, 3, 15)));
        assert!(cal.lookup(date(2024, 3, 9)).is_none());
        assert!(cal.lookup(date(2024, 3, 8)).is_some());
    }

    #[test]
    fn test_nearest_skips_weekend() {
        let cal = TradingCalendar::new(weekday_bars(date(2024, 3, 4), date(2024, 3, 15), 1.0, 10));
        // Saturday 9 March
        let fwd = cal.nearest(date(2024, 3, 9), Direction::Forward, 5).unwrap();
        assert_eq!(fwd.date, date(2024, 3, 11));
        let back = cal.nearest(date(2024, 3, 11), Direction::Backward, 5).unwrap();
        assert_eq!(back.date, date(2024, 3, 8));
        assert!(cal.nearest(date(2024, 3, 9), Direction::Forward, 1).is_none());
    }

    #[test]
    fn test_walk_excludes_start() {
        let cal = TradingCalendar::new(weekday_bars(date(2024, 3, 4), date(2024, 3, 15), 1.0, 10));
        let days: Vec<Date> = cal
            .walk(date(2024, 3, 8), Direction::Backward, 4)
            .map(|b| b.date)
            .collect();
        assert_eq!(days, vec![date(2024, 3, 7), date(2024, 3, 6), date(2024, 3, 5), date(2024, 3, 4)]);
    }

    #[test]
    fn test_duplicate_dates_keep_last() {
        let d = date(2024, 3, 4);
        let cal: TradingCalendar = vec![bar(d, 1.0, 10), bar(d, 2.0, 20)].into_iter().collect();
        assert_eq!(cal.len(), 1);
        assert_eq!(cal.lookup(d).unwrap().volume, 20);
    }

    #[test]
    fn test_empty_calendar() {
        let cal = TradingCalendar::default();
        assert!(cal.is_empty());
        assert!(cal.first_date().is_none());
        assert!(cal.nearest(date(2024, 1, 1), Direction::Forward, 30).is_none());
    }
}
