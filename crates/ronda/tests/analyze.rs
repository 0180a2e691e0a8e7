//! End-to-end analysis of synthetic entities.

use approx::assert_relative_eq;
use chrono::{Datelike, Months};
use ronda::events::{ConvictionClass, LeakageClass, RetentionClass};
use ronda::fundamentals::{MarketReview, ResultType};
use ronda::prelude::*;
use ronda::score::{ImpactRating, dedupe_by_date};
use ronda::traits::FundamentalPeriod;

fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd_opt(y, m, d).unwrap()
}

fn weekdays(start: Date, end: Date) -> impl Iterator<Item = Date> {
    start
        .iter_days()
        .take_while(move |d| *d <= end)
        .filter(|d| d.weekday().num_days_from_monday() < 5)
}

fn bar(date: Date, close: f64, volume: u64) -> PriceBar {
    PriceBar {
        date,
        open: close,
        high: close,
        low: close,
        close,
        volume,
    }
}

/// Flat tape at 10.00 on 1M shares, then +4% on 3x volume on Friday
/// 1 March 2024, holding at +3.8% ten sessions later.
fn scenario_prices() -> Vec<PriceBar> {
    let mut bars: Vec<PriceBar> = weekdays(date(2024, 1, 1), date(2024, 2, 29))
        .map(|d| bar(d, 10.0, 1_000_000))
        .collect();
    bars.push(bar(date(2024, 3, 1), 10.4, 3_000_000));
    bars.extend(weekdays(date(2024, 3, 4), date(2024, 3, 14)).map(|d| bar(d, 10.35, 1_000_000)));
    bars.push(bar(date(2024, 3, 15), 10.38, 1_000_000));
    bars
}

/// Deterministic random walk with an announcement every tenth session.
fn synthetic_entity() -> (EntityData, Date) {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };

    let headlines = [
        "Quarterly Activities Report",
        "Exceptional drilling results at Hilltop",
        "Half Year Accounts",
        "Guidance update",
        "Appendix 3Y",
    ];

    let mut close = 2.0;
    let mut prices = Vec::new();
    let mut events = Vec::new();
    for (i, d) in weekdays(date(2022, 7, 1), date(2024, 6, 28)).enumerate() {
        close *= 1.0 + (next() - 0.5) * 0.06;
        let volume = (1_000_000.0 * (0.4 + next() * 2.5)) as u64;
        prices.push(bar(d, close, volume));
        if i % 10 == 9 {
            let headline = headlines[(i / 10) % headlines.len()];
            events.push(Event::new(d, headline, i % 20 == 9).with_category(if i % 30 == 9 {
                "Drilling Results"
            } else {
                "Periodic Reports"
            }));
        }
    }
    // a same-day follow-up to exercise deduplication
    let last = events[events.len() - 1].clone();
    events.push(Event::new(last.date, "Response to ASX Price Query", true));

    (EntityData::new("SYN", events, prices), date(2024, 6, 28))
}

#[test]
fn test_single_event_scenario() {
    let data = EntityData::new(
        "XYZ",
        vec![Event::new(date(2024, 3, 1), "Maiden resource at flagship project", true)],
        scenario_prices(),
    );
    let report = Analyzer::default().analyze(&data, date(2024, 6, 30));

    assert_eq!(report.events.len(), 1);
    let event = &report.events[0];
    assert_eq!(event.leakage.class, LeakageClass::TightShip);
    assert_eq!(event.conviction.class, ConvictionClass::Institutional);
    assert_eq!(event.retention.class, RetentionClass::Positive);

    assert_eq!(report.high_impact.len(), 1);
    assert_eq!(report.high_impact[0].impact_rating, ImpactRating::HighSignal);
    assert_relative_eq!(report.high_impact[0].retention_ratio, 0.95, epsilon = 1e-9);

    assert_relative_eq!(report.score.composite, 1.0, epsilon = 1e-9);
    assert_eq!(report.score.tier, Tier::Operator);
    assert_eq!(report.score.confidence, Confidence::Low);
    assert_eq!(
        report.data_quality.gaps,
        vec!["Limited announcement history: only 1 announcements".to_string()]
    );
}

#[test]
fn test_no_price_data() {
    let data = EntityData::new(
        "XYZ",
        vec![
            Event::new(date(2024, 3, 1), "Results", true),
            Event::new(date(2024, 4, 1), "Quarterly Activities Report", true),
        ],
        Vec::new(),
    );
    let report = Analyzer::default().analyze(&data, date(2024, 6, 30));

    assert!(report.events.is_empty());
    assert_eq!(report.data_quality.events_dropped, 2);
    assert_eq!(report.data_quality.trading_days, 0);
    assert_relative_eq!(report.score.composite, 0.5, epsilon = 1e-12);
    assert_eq!(report.score.confidence, Confidence::Low);
    assert_eq!(report.score.tier, Tier::Promoter);
    assert!(
        report
            .data_quality
            .gaps
            .contains(&"Limited price data: only 0 trading days available".to_string())
    );
}

#[test]
fn test_empty_input() {
    let as_of = date(2024, 6, 30);
    let report = Analyzer::default().analyze(&EntityData::new("NIL", Vec::new(), Vec::new()), as_of);

    assert_eq!(report.entity, "NIL");
    assert_eq!(report.period_end, as_of);
    assert_eq!(report.period_start, as_of - Months::new(24));
    assert_eq!(report.summaries.leakage.total_analyzed, 0);
    assert_eq!(report.summaries.conviction.total_analyzed, 0);
    assert_eq!(report.summaries.retention.total_analyzed, 0);
    assert_relative_eq!(report.score.leakage_score, 0.5);
    assert_relative_eq!(report.score.conviction_score, 0.5);
    assert_relative_eq!(report.score.retention_score, 0.5);
    assert_eq!(report.score.confidence, Confidence::Low);
    assert!(report.patterns.concerns.is_empty());
    assert!(report.high_impact.is_empty());
    assert!(report.financial_results.is_empty());
    assert_eq!(report.data_quality.gaps.len(), 2);
}

#[test]
fn test_old_events_with_prices_are_classified() {
    let prices: Vec<PriceBar> = weekdays(date(2019, 1, 1), date(2024, 6, 28))
        .map(|d| bar(d, 10.0, 1_000_000))
        .collect();
    let data = EntityData::new(
        "OLD",
        vec![
            Event::new(date(2020, 3, 2), "Half Year Accounts", true),
            Event::new(date(2024, 3, 1), "Quarterly Activities Report", true),
        ],
        prices,
    );
    let report = Analyzer::default().analyze(&data, date(2024, 6, 28));

    assert_eq!(report.data_quality.events_supplied, 2);
    assert_eq!(report.data_quality.events_in_period, 2);
    assert_eq!(report.data_quality.events_classified, 2);
    assert_eq!(report.data_quality.events_dropped, 0);
    assert_eq!(report.period_start, date(2020, 3, 2));
    assert_eq!(report.period_end, date(2024, 3, 1));
}

#[test]
fn test_deterministic() {
    let (data, as_of) = synthetic_entity();
    let analyzer = Analyzer::default();
    let first = analyzer.analyze(&data, as_of);
    let second = analyzer.analyze(&data, as_of);
    assert_eq!(first, second);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn test_score_bounds_and_weights() {
    let (data, as_of) = synthetic_entity();
    let analyzer = Analyzer::default();
    let report = analyzer.analyze(&data, as_of);
    let score = &report.score;

    for s in [
        score.composite,
        score.leakage_score,
        score.conviction_score,
        score.retention_score,
    ] {
        assert!((0.0..=1.0).contains(&s), "score {s} out of range");
    }
    let w = &analyzer.config().score.weights;
    assert_relative_eq!(
        score.composite,
        w.leakage * score.leakage_score
            + w.conviction * score.conviction_score
            + w.retention * score.retention_score,
        epsilon = 1e-12
    );
    assert_eq!(score.confidence, Confidence::High);
    assert_eq!(report.data_quality.events_dropped, 0);
    assert!(report.data_quality.gaps.is_empty());
}

#[test]
fn test_report_ordering_and_dedupe() {
    let (data, as_of) = synthetic_entity();
    let report = Analyzer::default().analyze(&data, as_of);

    assert!(report.events.windows(2).all(|w| w[0].date() >= w[1].date()));
    assert!(report.high_impact.windows(2).all(|w| w[0].date >= w[1].date));
    let cutoff = as_of - Months::new(12);
    for event in &report.high_impact {
        assert!(event.date >= cutoff && event.date <= as_of);
        assert!(event.retention_ratio >= 0.5);
    }

    let once = dedupe_by_date(&report.events);
    assert_eq!(dedupe_by_date(&once), once);
    assert_eq!(once.len(), report.events.len() - 1);
}

#[test]
fn test_bars_after_as_of_ignored() {
    let data = EntityData::new(
        "XYZ",
        vec![Event::new(date(2024, 3, 1), "Maiden resource at flagship project", true)],
        scenario_prices(),
    );
    // the lead-out window would need bars past the analysis date
    let report = Analyzer::default().analyze(&data, date(2024, 3, 8));
    assert_eq!(report.events.len(), 1);
    assert!(report.events[0].lead_out.is_none());
    assert_eq!(report.events[0].retention.class, RetentionClass::Fade);
}

#[test]
fn test_news_and_fundamentals_enrichment() {
    let news = vec![NewsItem {
        date: date(2024, 3, 1),
        title: "XYZ unveils maiden resource at flagship".to_string(),
        link: "https://www.reuters.com/markets/xyz".to_string(),
        sentiment: Some(0.6),
    }];
    let fundamentals = Fundamentals {
        annual: vec![
            FundamentalPeriod {
                end_date: "2023-12-31".to_string(),
                revenue: Some(60.0),
                net_income: Some(6.0),
                ..Default::default()
            },
            FundamentalPeriod {
                end_date: "2022-12-31".to_string(),
                revenue: Some(50.0),
                net_income: Some(4.0),
                ..Default::default()
            },
        ],
        quarterly: Vec::new(),
    };
    let data = EntityData::new(
        "XYZ",
        vec![
            Event::new(date(2024, 3, 1), "Maiden resource at flagship project", true),
            Event::new(date(2024, 3, 1), "Appendix 4E Preliminary Final Report", true),
        ],
        scenario_prices(),
    )
    .with_news(news)
    .with_fundamentals(fundamentals);

    let report = Analyzer::default().analyze(&data, date(2024, 6, 30));

    let matched: Vec<_> = report
        .high_impact
        .iter()
        .filter_map(|e| e.news.as_ref())
        .collect();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].source, "Reuters");

    assert_eq!(report.financial_results.len(), 1);
    let result = &report.financial_results[0];
    assert_eq!(result.result_type, ResultType::Appendix4E);
    assert_eq!(result.market_review, MarketReview::Positive);
    let financials = result.financials.as_ref().unwrap();
    assert_eq!(financials.period_end, "2023-12-31");
    assert_relative_eq!(financials.revenue_yoy_pct.unwrap(), 20.0, epsilon = 1e-9);
    assert_relative_eq!(financials.net_income_yoy_pct.unwrap(), 50.0, epsilon = 1e-9);
}

#[test]
fn test_analyzer_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Analyzer>();
    assert_send_sync::<QualityReport>();
}
