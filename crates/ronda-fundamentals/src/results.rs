//! Market reaction to financial result announcements.

use std::collections::HashMap;

use ronda_events::ClassifiedEvent;
use ronda_traits::{Date, Fundamentals};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matcher::{Enrichment, match_period};
use crate::result_type::ResultType;

/// Cut-offs for reviewing result reactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultReviewConfig {
    /// Day-of move (absolute %) beyond which a reaction is not neutral (default: 1.0).
    pub review_move_pct: f64,
    /// Earliest gap in days to the same result a year before (default: 300).
    pub yoy_min_days: i64,
    /// Latest gap in days to the same result a year before (default: 400).
    pub yoy_max_days: i64,
    /// Change in reaction, in percentage points, that counts as a trend (default: 2.0).
    pub trend_pp: f64,
}

impl Default for ResultReviewConfig {
    fn default() -> Self {
        Self {
            review_move_pct: 1.0,
            yoy_min_days: 300,
            yoy_max_days: 400,
            trend_pp: 2.0,
        }
    }
}

/// How the market received a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketReview {
    /// Price rose.
    Positive,
    /// Price fell.
    Negative,
    /// No meaningful move.
    Neutral,
}

/// Reaction compared with the same result a year before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReactionTrend {
    /// Received better than last year.
    Improving,
    /// Received about the same.
    Stable,
    /// Received worse than last year.
    Declining,
}

/// A financial result announcement and how it was received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialResult {
    /// Announcement date.
    pub date: Date,
    /// Result kind.
    pub result_type: ResultType,
    /// Fiscal period label, e.g. `H1 FY25`.
    pub period: String,
    /// Headline.
    pub headline: String,
    /// Document reference, when supplied.
    pub document_reference: Option<String>,
    /// Day-of change in percent.
    pub day_of_change_pct: f64,
    /// Lead-out change in percent.
    pub lead_out_change_pct: f64,
    /// Day-of volume ratio.
    pub volume_ratio: f64,
    /// Market verdict.
    pub market_review: MarketReview,
    /// Matched statement figures.
    pub financials: Option<Enrichment>,
    /// Date of the same result a year before.
    pub prior_result_date: Option<Date>,
    /// Day-of change of that result.
    pub prior_day_of_change_pct: Option<f64>,
    /// Difference in day-of change, in percentage points.
    pub yoy_reaction_diff_pp: Option<f64>,
    /// Trend of the reaction.
    pub reaction_trend: Option<ReactionTrend>,
    /// Consecutive positive reviews ending at this result.
    pub consecutive_positive: u32,
    /// Consecutive negative reviews ending at this result.
    pub consecutive_negative: u32,
}

/// Reviews financial result announcements.
#[derive(Debug, Clone, Default)]
pub struct ResultReviewer {
    config: ResultReviewConfig,
}

impl ResultReviewer {
    /// Create a reviewer with the given configuration.
    #[must_use]
    pub const fn new(config: ResultReviewConfig) -> Self {
        Self { config }
    }

    /// Verdict for a day-of move.
    #[must_use]
    pub fn review(&self, day_of_change_pct: f64) -> MarketReview {
        if day_of_change_pct > self.config.review_move_pct {
            MarketReview::Positive
        } else if day_of_change_pct < -self.config.review_move_pct {
            MarketReview::Negative
        } else {
            MarketReview::Neutral
        }
    }

    /// Trend for a change in reaction.
    #[must_use]
    pub fn trend(&self, diff_pp: f64) -> ReactionTrend {
        if diff_pp > self.config.trend_pp {
            ReactionTrend::Improving
        } else if diff_pp < -self.config.trend_pp {
            ReactionTrend::Declining
        } else {
            ReactionTrend::Stable
        }
    }

    /// Financial results among the classified events, newest first.
    ///
    /// Events whose headline is not a result are skipped. Statement figures
    /// are attached when `fundamentals` has a matching period.
    #[must_use]
    pub fn results(
        &self,
        classified: &[ClassifiedEvent],
        fundamentals: Option<&Fundamentals>,
    ) -> Vec<FinancialResult> {
        let mut results: Vec<FinancialResult> = classified
            .iter()
            .filter_map(|event| {
                let (result_type, period) =
                    ResultType::from_headline(&event.event.headline, event.date())?;
                let financials = fundamentals
                    .and_then(|f| Enrichment::from_match(&match_period(f, result_type, event.date())));
                if fundamentals.is_some() && financials.is_none() {
                    debug!(date = %event.date(), %result_type, "no statement period matched");
                }
                Some(FinancialResult {
                    date: event.date(),
                    result_type,
                    period,
                    headline: event.event.headline.clone(),
                    document_reference: event.event.document_reference.clone(),
                    day_of_change_pct: event.day_of_change(),
                    lead_out_change_pct: event.lead_out_change(),
                    volume_ratio: event.day_of.volume_ratio,
                    market_review: self.review(event.day_of_change()),
                    financials,
                    prior_result_date: None,
                    prior_day_of_change_pct: None,
                    yoy_reaction_diff_pp: None,
                    reaction_trend: None,
                    consecutive_positive: 0,
                    consecutive_negative: 0,
                })
            })
            .collect();

        results.sort_by(|a, b| b.date.cmp(&a.date));
        self.compare_year_on_year(&mut results);
        count_streaks(&mut results);
        results
    }

    /// Link each result to the newest older result of the same type
    /// roughly a year before. Expects newest-first order.
    fn compare_year_on_year(&self, results: &mut [FinancialResult]) {
        let mut by_type: HashMap<ResultType, Vec<usize>> = HashMap::new();
        for (i, r) in results.iter().enumerate() {
            by_type.entry(r.result_type).or_default().push(i);
        }

        for i in 0..results.len() {
            let date = results[i].date;
            let prior = by_type[&results[i].result_type]
                .iter()
                .filter(|&&j| j > i)
                .map(|&j| &results[j])
                .find(|p| {
                    let gap = (date - p.date).num_days();
                    (self.config.yoy_min_days..=self.config.yoy_max_days).contains(&gap)
                })
                .map(|p| (p.date, p.day_of_change_pct));

            if let Some((prior_date, prior_change)) = prior {
                let diff = results[i].day_of_change_pct - prior_change;
                let current = &mut results[i];
                current.prior_result_date = Some(prior_date);
                current.prior_day_of_change_pct = Some(prior_change);
                current.yoy_reaction_diff_pp = Some(diff);
                current.reaction_trend = Some(self.trend(diff));
            }
        }
    }
}

/// Fill streak counters walking oldest to newest. Expects newest-first order.
fn count_streaks(results: &mut [FinancialResult]) {
    let mut positive = 0;
    let mut negative = 0;
    for result in results.iter_mut().rev() {
        match result.market_review {
            MarketReview::Positive => {
                positive += 1;
                negative = 0;
            }
            MarketReview::Negative => {
                negative += 1;
                positive = 0;
            }
            MarketReview::Neutral => {
                positive = 0;
                negative = 0;
            }
        }
        result.consecutive_positive = positive;
        result.consecutive_negative = negative;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ronda_events::classify::{classify_conviction, classify_leakage, classify_retention};
    use ronda_events::{Thresholds, WindowMetrics};
    use ronda_traits::{Event, FundamentalPeriod, PriceBar};

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    fn metrics(change: f64, volume_ratio: f64) -> WindowMetrics {
        WindowMetrics {
            price_change_pct: change,
            volume_ratio,
            trading_days_covered: 1,
            start_price: 1.0,
            end_price: 1.0 + change / 100.0,
        }
    }

    fn event(d: Date, headline: &str, change: f64) -> ClassifiedEvent {
        let t = Thresholds::default();
        ClassifiedEvent {
            event: Event::new(d, headline, true),
            session: PriceBar {
                date: d,
                open: 1.0,
                high: 1.1,
                low: 0.9,
                close: 1.0,
                volume: 1_000,
            },
            lead_in: None,
            day_of: metrics(change, 2.0),
            lead_out: Some(metrics(change / 2.0, 1.0)),
            leakage: classify_leakage(0.0, 1.0, change, &t.leakage),
            conviction: classify_conviction(change, 2.0, &t.conviction),
            retention: classify_retention(change, change / 2.0, &t.retention),
        }
    }

    #[test]
    fn test_review_cutoffs() {
        let r = ResultReviewer::default();
        assert_eq!(r.review(2.5), MarketReview::Positive);
        assert_eq!(r.review(1.2), MarketReview::Positive);
        assert_eq!(r.review(1.0), MarketReview::Neutral);
        assert_eq!(r.review(-1.5), MarketReview::Negative);
        assert_eq!(r.trend(2.5), ReactionTrend::Improving);
        assert_eq!(r.trend(-2.5), ReactionTrend::Declining);
        assert_eq!(r.trend(1.0), ReactionTrend::Stable);
    }

    #[test]
    fn test_results_skip_non_results() {
        let events = vec![
            event(date(2024, 8, 20), "FY24 Results Presentation", 3.0),
            event(date(2024, 3, 1), "Trading Halt", -4.0),
        ];
        let results = ResultReviewer::default().results(&events, None);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].result_type, ResultType::FullYear);
        assert_eq!(results[0].period, "FY25");
        assert!(results[0].financials.is_none());
        assert_relative_eq!(results[0].lead_out_change_pct, 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_year_on_year_and_streaks() {
        let events = vec![
            event(date(2022, 8, 22), "FY22 Results", -3.0),
            event(date(2023, 8, 21), "FY23 Results", 1.5),
            event(date(2024, 2, 20), "Half Year Results", 2.0),
            event(date(2024, 8, 19), "FY24 Results", 5.0),
        ];
        let results = ResultReviewer::default().results(&events, None);
        let dates: Vec<Date> = results.iter().map(|r| r.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 8, 19), date(2024, 2, 20), date(2023, 8, 21), date(2022, 8, 22)]
        );

        let latest = &results[0];
        assert_eq!(latest.prior_result_date, Some(date(2023, 8, 21)));
        assert_relative_eq!(latest.yoy_reaction_diff_pp.unwrap(), 3.5, epsilon = 1e-12);
        assert_eq!(latest.reaction_trend, Some(ReactionTrend::Improving));
        assert_eq!(latest.consecutive_positive, 3);
        assert_eq!(latest.consecutive_negative, 0);

        // half-year result has no half-year a year before
        assert_eq!(results[1].reaction_trend, None);

        let fy23 = &results[2];
        assert_eq!(fy23.reaction_trend, Some(ReactionTrend::Improving));
        assert_eq!(fy23.consecutive_positive, 1);

        let oldest = &results[3];
        assert_eq!(oldest.prior_result_date, None);
        assert_eq!(oldest.consecutive_negative, 1);
    }

    #[test]
    fn test_neutral_breaks_streak() {
        let events = vec![
            event(date(2024, 2, 20), "Half Year Results", 2.0),
            event(date(2024, 4, 28), "Quarterly Activities Report", 0.5),
            event(date(2024, 8, 19), "FY24 Results", 3.0),
        ];
        let results = ResultReviewer::default().results(&events, None);
        assert_eq!(results[0].consecutive_positive, 1);
        assert_eq!(results[1].market_review, MarketReview::Neutral);
        assert_eq!(results[1].consecutive_positive, 0);
        assert_eq!(results[2].consecutive_positive, 1);
    }

    #[test]
    fn test_results_enriched_from_statements() {
        let fundamentals = Fundamentals {
            annual: vec![
                FundamentalPeriod {
                    end_date: "2024-06-30".to_string(),
                    revenue: Some(110.0),
                    ..Default::default()
                },
                FundamentalPeriod {
                    end_date: "2023-06-30".to_string(),
                    revenue: Some(100.0),
                    ..Default::default()
                },
            ],
            quarterly: vec![],
        };
        let events = vec![event(date(2024, 8, 19), "Appendix 4E", 3.0)];
        let results = ResultReviewer::default().results(&events, Some(&fundamentals));
        let financials = results[0].financials.as_ref().unwrap();
        assert_eq!(financials.period_end, "2024-06-30");
        assert_relative_eq!(financials.revenue_yoy_pct.unwrap(), 10.0, epsilon = 1e-9);
    }
}
