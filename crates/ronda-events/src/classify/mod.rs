//! Per-event classification on the leakage, conviction and retention axes.
//!
//! Each axis is an independent pure function of window metrics and the
//! threshold table. [`EventClassifier`] wires them to the window calculator.

mod conviction;
mod leakage;
mod retention;

pub use conviction::{ConvictionAssessment, ConvictionClass, classify_conviction};
pub use leakage::{LeakageAssessment, LeakageClass, classify_leakage};
pub use retention::{RetentionAssessment, RetentionClass, classify_retention, retention_ratio};

use ronda_traits::{Date, Event, PriceBar};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::TradingCalendar;
use crate::thresholds::Thresholds;
use crate::window::{WindowCalculator, WindowConfig, WindowMetrics};

/// An announcement with its windows and axis verdicts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedEvent {
    /// The announcement.
    #[serde(flatten)]
    pub event: Event,
    /// Trading session the day-of metrics refer to.
    pub session: PriceBar,
    /// Lead-in window, when enough history precedes the event.
    pub lead_in: Option<WindowMetrics>,
    /// Day-of metrics.
    pub day_of: WindowMetrics,
    /// Lead-out window, when enough history follows the event.
    pub lead_out: Option<WindowMetrics>,
    /// Leakage verdict.
    pub leakage: LeakageAssessment,
    /// Conviction verdict.
    pub conviction: ConvictionAssessment,
    /// Retention verdict.
    pub retention: RetentionAssessment,
}

impl ClassifiedEvent {
    /// Announcement date.
    #[must_use]
    pub const fn date(&self) -> Date {
        self.event.date
    }

    /// Day-of price change in percent.
    #[must_use]
    pub const fn day_of_change(&self) -> f64 {
        self.day_of.price_change_pct
    }

    /// Lead-out price change in percent, 0 when the window is missing.
    #[must_use]
    pub fn lead_out_change(&self) -> f64 {
        self.lead_out.map_or(0.0, |w| w.price_change_pct)
    }
}

/// Classified events plus the count of events that could not be placed.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Classified events, newest first.
    pub events: Vec<ClassifiedEvent>,
    /// Events without a trading session near their date.
    pub dropped: usize,
}

/// Classifies announcements against a price calendar.
#[derive(Debug, Clone, Default)]
pub struct EventClassifier {
    windows: WindowConfig,
    thresholds: Thresholds,
}

impl EventClassifier {
    /// Create a classifier with the given windows and thresholds.
    #[must_use]
    pub const fn new(windows: WindowConfig, thresholds: Thresholds) -> Self {
        Self {
            windows,
            thresholds,
        }
    }

    /// Window configuration in use.
    #[must_use]
    pub const fn windows(&self) -> &WindowConfig {
        &self.windows
    }

    /// Threshold table in use.
    #[must_use]
    pub const fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Classify one event. `None` when no day-of session exists.
    #[must_use]
    pub fn classify(&self, calendar: &TradingCalendar, event: &Event) -> Option<ClassifiedEvent> {
        let calc = WindowCalculator::new(calendar, &self.windows);
        let day_of = calc.day_of(event.date)?;
        let lead_in = calc.lead_in(event.date);
        let lead_out = calc.lead_out(event.date);

        let day_of_pct = day_of.metrics.price_change_pct;
        let (pre_drift, pre_volume) =
            lead_in.map_or((0.0, 1.0), |w| (w.price_change_pct, w.volume_ratio));
        let lead_out_pct = lead_out.map_or(0.0, |w| w.price_change_pct);

        Some(ClassifiedEvent {
            event: event.clone(),
            session: day_of.session,
            lead_in,
            day_of: day_of.metrics,
            lead_out,
            leakage: classify_leakage(pre_drift, pre_volume, day_of_pct, &self.thresholds.leakage),
            conviction: classify_conviction(
                day_of_pct,
                day_of.metrics.volume_ratio,
                &self.thresholds.conviction,
            ),
            retention: classify_retention(day_of_pct, lead_out_pct, &self.thresholds.retention),
        })
    }

    /// Classify every event, newest first. Events on the same date keep their
    /// input order.
    #[must_use]
    pub fn classify_all(&self, calendar: &TradingCalendar, events: &[Event]) -> Classification {
        let mut classification = Classification::default();
        for event in events {
            match self.classify(calendar, event) {
                Some(classified) => classification.events.push(classified),
                None => {
                    debug!(date = %event.date, headline = %event.headline, "no trading session near event, dropping");
                    classification.dropped += 1;
                }
            }
        }
        classification
            .events
            .sort_by(|a, b| b.date().cmp(&a.date()));
        classification
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::tests::{bar, date, weekday_bars};
    use approx::assert_relative_eq;

    /// Flat tape at 10.00 on 1M shares, then a +4% session on 3x volume on
    /// Friday 1 March 2024 that holds at +3.8% ten sessions later.
    fn scenario_calendar() -> TradingCalendar {
        let mut bars = weekday_bars(date(2024, 1, 1), date(2024, 2, 29), 10.0, 1_000_000);
        bars.push(bar(date(2024, 3, 1), 10.4, 3_000_000));
        bars.extend(weekday_bars(date(2024, 3, 4), date(2024, 3, 14), 10.35, 1_000_000));
        bars.push(bar(date(2024, 3, 15), 10.38, 1_000_000));
        TradingCalendar::new(bars)
    }

    #[test]
    fn test_single_event_scenario() {
        let cal = scenario_calendar();
        let event = Event::new(date(2024, 3, 1), "Maiden resource at flagship project", true);
        let classified = EventClassifier::default().classify(&cal, &event).unwrap();

        assert_eq!(classified.leakage.class, LeakageClass::TightShip);
        assert_eq!(classified.conviction.class, ConvictionClass::Institutional);
        assert_eq!(classified.retention.class, RetentionClass::Positive);
        assert_relative_eq!(classified.day_of_change(), 4.0, epsilon = 1e-9);
        assert_relative_eq!(classified.lead_out_change(), 3.8, epsilon = 1e-9);
        assert_relative_eq!(classified.retention.retention_ratio, 0.95, epsilon = 1e-9);
        assert_eq!(classified.session.date, date(2024, 3, 1));
    }

    #[test]
    fn test_event_without_session_is_dropped() {
        let cal = scenario_calendar();
        let events = vec![
            Event::new(date(2024, 3, 1), "Results", true),
            Event::new(date(2025, 1, 10), "Far beyond the price history", true),
        ];
        let result = EventClassifier::default().classify_all(&cal, &events);
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.dropped, 1);
    }

    #[test]
    fn test_missing_windows_use_defaults() {
        // Only two sessions: no lead-in, no lead-out.
        let cal = TradingCalendar::new(vec![
            bar(date(2024, 3, 4), 10.0, 1_000),
            bar(date(2024, 3, 5), 10.5, 5_000),
        ]);
        let event = Event::new(date(2024, 3, 5), "Update", false);
        let classified = EventClassifier::default().classify(&cal, &event).unwrap();

        assert!(classified.lead_in.is_none());
        assert!(classified.lead_out.is_none());
        assert_eq!(classified.leakage.class, LeakageClass::TightShip);
        assert_relative_eq!(classified.leakage.pre_volume_ratio, 1.0);
        // +5% that cannot be confirmed counts as a fade
        assert_eq!(classified.retention.class, RetentionClass::Fade);
        assert_eq!(classified.lead_out_change(), 0.0);
    }

    #[test]
    fn test_classify_all_orders_newest_first() {
        let cal = scenario_calendar();
        let events = vec![
            Event::new(date(2024, 2, 5), "Older", false),
            Event::new(date(2024, 3, 1), "Newer", true),
            Event::new(date(2024, 2, 20), "Middle", false),
        ];
        let result = EventClassifier::default().classify_all(&cal, &events);
        let dates: Vec<Date> = result.events.iter().map(ClassifiedEvent::date).collect();
        assert_eq!(dates, vec![date(2024, 3, 1), date(2024, 2, 20), date(2024, 2, 5)]);
    }

    #[test]
    fn test_serialized_shape() {
        let cal = scenario_calendar();
        let event = Event::new(date(2024, 3, 1), "Results", true).with_category("Periodic Reports");
        let classified = EventClassifier::default().classify(&cal, &event).unwrap();
        let json = serde_json::to_value(&classified).unwrap();

        assert_eq!(json["headline"], "Results");
        assert_eq!(json["category"], "Periodic Reports");
        assert_eq!(json["leakage"]["class"], "TIGHT_SHIP");
        assert_eq!(json["retention"]["class"], "POSITIVE");
    }
}
