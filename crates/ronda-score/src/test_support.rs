//! Builders for classified events in unit tests.

use ronda_events::classify::{classify_conviction, classify_leakage, classify_retention};
use ronda_events::{ClassifiedEvent, Thresholds, WindowMetrics};
use ronda_traits::{Date, Event, PriceBar};

pub(crate) fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd_opt(y, m, d).unwrap()
}

fn metrics(change_pct: f64, volume_ratio: f64, days: usize) -> WindowMetrics {
    WindowMetrics {
        price_change_pct: change_pct,
        volume_ratio,
        trading_days_covered: days,
        start_price: 10.0,
        end_price: 10.0 * (1.0 + change_pct / 100.0),
    }
}

/// A price-sensitive event with no lead-in and the given day-of move,
/// lead-out move and day-of volume ratio.
pub(crate) fn classified(
    date: Date,
    day_of_pct: f64,
    lead_out_pct: f64,
    volume_ratio: f64,
) -> ClassifiedEvent {
    let t = Thresholds::default();
    let day_of = metrics(day_of_pct, volume_ratio, 1);
    ClassifiedEvent {
        event: Event::new(date, format!("Announcement {date}"), true),
        session: PriceBar {
            date,
            open: day_of.start_price,
            high: day_of.start_price.max(day_of.end_price),
            low: day_of.start_price.min(day_of.end_price),
            close: day_of.end_price,
            volume: 1_000_000,
        },
        lead_in: None,
        day_of,
        lead_out: Some(metrics(lead_out_pct, 1.0, 10)),
        leakage: classify_leakage(0.0, 1.0, day_of_pct, &t.leakage),
        conviction: classify_conviction(day_of_pct, volume_ratio, &t.conviction),
        retention: classify_retention(day_of_pct, lead_out_pct, &t.retention),
    }
}

/// Attach a lead-in window and reclassify leakage.
pub(crate) fn with_lead_in(
    mut event: ClassifiedEvent,
    pre_drift_pct: f64,
    pre_volume_ratio: f64,
) -> ClassifiedEvent {
    event.lead_in = Some(metrics(pre_drift_pct, pre_volume_ratio, 5));
    event.leakage = classify_leakage(
        pre_drift_pct,
        pre_volume_ratio,
        event.day_of_change(),
        &Thresholds::default().leakage,
    );
    event
}

/// Mark the event as not price sensitive.
pub(crate) fn routine(mut event: ClassifiedEvent) -> ClassifiedEvent {
    event.event.price_sensitive = false;
    event
}
