//! Per-axis aggregation.
//!
//! Leakage and retention are judged on what management chose to flag as
//! price sensitive, one reaction per trading date. Conviction looks at every
//! classified event: the market's response to routine releases says as much
//! about who holds the stock as its response to headline news.

use ronda_events::{ClassifiedEvent, ConvictionClass, LeakageClass, RetentionClass};
use ronda_traits::Date;
use ronda_traits::stats::{MIN_PRICE_MOVE_PCT, mean};
use serde::{Deserialize, Serialize};

use crate::dedupe::dedupe_by_date;

/// Which events feed the leakage and retention summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationPolicy {
    /// Only count price-sensitive announcements (default: true).
    pub price_sensitive_only: bool,
    /// Collapse same-date events to the strongest reaction (default: true).
    pub dedupe_by_date: bool,
    /// Maximum exemplars listed per axis (default: 5).
    pub exemplar_limit: usize,
}

impl Default for AggregationPolicy {
    fn default() -> Self {
        Self {
            price_sensitive_only: true,
            dedupe_by_date: true,
            exemplar_limit: 5,
        }
    }
}

impl AggregationPolicy {
    /// Events that feed the leakage and retention summaries.
    #[must_use]
    pub fn select(&self, events: &[ClassifiedEvent]) -> Vec<ClassifiedEvent> {
        let filtered: Vec<ClassifiedEvent> = events
            .iter()
            .filter(|e| !self.price_sensitive_only || e.event.price_sensitive)
            .cloned()
            .collect();
        if self.dedupe_by_date {
            dedupe_by_date(&filtered)
        } else {
            filtered
        }
    }
}

/// Direction of a lead-in drift relative to the day-of reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriftDirection {
    /// Drift anticipated the reaction.
    Aligned,
    /// Drift ran against the reaction.
    Opposing,
}

/// One of the worst leakage incidents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeakageIncident {
    /// Announcement date.
    pub date: Date,
    /// Headline.
    pub headline: String,
    /// Lead-in change in percent.
    pub pre_drift_pct: f64,
    /// Lead-in volume ratio.
    pub pre_volume_ratio: f64,
    /// Day-of change in percent.
    pub day_of_change_pct: f64,
    /// Drift relative to the reaction.
    pub direction: DriftDirection,
}

/// Leakage axis summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeakageSummary {
    /// Events aggregated.
    pub total_analyzed: usize,
    /// High-leakage events.
    pub high_leakage_count: usize,
    /// Neutral events.
    pub neutral_count: usize,
    /// Tight-ship events.
    pub tight_ship_count: usize,
    /// Mean absolute lead-in drift in percent.
    pub average_pre_drift_pct: f64,
    /// High-leakage share (0 when nothing was aggregated).
    pub leakage_ratio: f64,
    /// Worst high-leakage incidents by absolute drift.
    pub worst_incidents: Vec<LeakageIncident>,
}

impl LeakageSummary {
    /// Summarise the given events.
    #[must_use]
    pub fn from_events(events: &[ClassifiedEvent], exemplar_limit: usize) -> Self {
        let count = |class: LeakageClass| events.iter().filter(|e| e.leakage.class == class).count();
        let total = events.len();
        let high = count(LeakageClass::HighLeakage);

        let mut worst: Vec<LeakageIncident> = events
            .iter()
            .filter(|e| e.leakage.class == LeakageClass::HighLeakage)
            .map(|e| LeakageIncident {
                date: e.date(),
                headline: e.event.headline.clone(),
                pre_drift_pct: e.leakage.pre_drift_pct,
                pre_volume_ratio: e.leakage.pre_volume_ratio,
                day_of_change_pct: e.day_of_change(),
                direction: if e.leakage.aligned {
                    DriftDirection::Aligned
                } else {
                    DriftDirection::Opposing
                },
            })
            .collect();
        worst.sort_by(|a, b| b.pre_drift_pct.abs().total_cmp(&a.pre_drift_pct.abs()));
        worst.truncate(exemplar_limit);

        Self {
            total_analyzed: total,
            high_leakage_count: high,
            neutral_count: count(LeakageClass::Neutral),
            tight_ship_count: count(LeakageClass::TightShip),
            average_pre_drift_pct: mean(events.iter().map(|e| e.leakage.pre_drift_pct.abs()))
                .unwrap_or(0.0),
            leakage_ratio: if total == 0 { 0.0 } else { high as f64 / total as f64 },
            worst_incidents: worst,
        }
    }
}

/// One of the strongest institutional reactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvictionHighlight {
    /// Announcement date.
    pub date: Date,
    /// Headline.
    pub headline: String,
    /// Day-of change in percent.
    pub day_of_change_pct: f64,
    /// Day-of volume ratio.
    pub volume_ratio: f64,
}

/// Conviction axis summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvictionSummary {
    /// Events aggregated.
    pub total_analyzed: usize,
    /// Institutional-conviction events.
    pub institutional_count: usize,
    /// Retail-hype events.
    pub retail_hype_count: usize,
    /// Low-interest events.
    pub low_interest_count: usize,
    /// Mixed events.
    pub mixed_count: usize,
    /// Mean day-of volume ratio.
    pub average_volume_ratio: f64,
    /// Institutional share (0 when nothing was aggregated).
    pub institutional_ratio: f64,
    /// Institutional events with the largest absolute moves.
    pub top_institutional: Vec<ConvictionHighlight>,
}

impl ConvictionSummary {
    /// Summarise the given events.
    #[must_use]
    pub fn from_events(events: &[ClassifiedEvent], exemplar_limit: usize) -> Self {
        let count =
            |class: ConvictionClass| events.iter().filter(|e| e.conviction.class == class).count();
        let total = events.len();
        let institutional = count(ConvictionClass::Institutional);

        let mut top: Vec<ConvictionHighlight> = events
            .iter()
            .filter(|e| e.conviction.class == ConvictionClass::Institutional)
            .map(|e| ConvictionHighlight {
                date: e.date(),
                headline: e.event.headline.clone(),
                day_of_change_pct: e.day_of_change(),
                volume_ratio: e.conviction.volume_ratio,
            })
            .collect();
        top.sort_by(|a, b| b.day_of_change_pct.abs().total_cmp(&a.day_of_change_pct.abs()));
        top.truncate(exemplar_limit);

        Self {
            total_analyzed: total,
            institutional_count: institutional,
            retail_hype_count: count(ConvictionClass::RetailHype),
            low_interest_count: count(ConvictionClass::LowInterest),
            mixed_count: count(ConvictionClass::Mixed),
            average_volume_ratio: mean(events.iter().map(|e| e.conviction.volume_ratio))
                .unwrap_or(0.0),
            institutional_ratio: if total == 0 {
                0.0
            } else {
                institutional as f64 / total as f64
            },
            top_institutional: top,
        }
    }
}

/// One of the worst fades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FadeIncident {
    /// Announcement date.
    pub date: Date,
    /// Headline.
    pub headline: String,
    /// Day-of change in percent.
    pub day_of_change_pct: f64,
    /// Lead-out change in percent.
    pub lead_out_change_pct: f64,
    /// Lead-out over day-of change.
    pub retention_ratio: f64,
}

/// Retention axis summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionSummary {
    /// Events aggregated.
    pub total_analyzed: usize,
    /// Positive-retention events.
    pub positive_count: usize,
    /// Fades.
    pub fade_count: usize,
    /// Over-reaction recoveries.
    pub over_reaction_count: usize,
    /// Sustained drops.
    pub sustained_drop_count: usize,
    /// Moves too small to judge.
    pub neutral_count: usize,
    /// Sum of +1/-1 contributions.
    pub raw_score: i64,
    /// Events with a non-zero contribution.
    pub non_neutral: usize,
    /// Share of non-neutral events that retained (0 when there are none).
    pub retention_rate: f64,
    /// Mean retention ratio over non-neutral events with a measurable move.
    pub average_retention_ratio: f64,
    /// `(raw + n) / 2n`, the neutral midpoint when `n` is 0.
    pub retention_score: f64,
    /// Fades with the lowest retention ratios.
    pub worst_fades: Vec<FadeIncident>,
}

impl Default for RetentionSummary {
    fn default() -> Self {
        Self::from_events(&[], 0)
    }
}

impl RetentionSummary {
    /// Summarise the given events.
    #[must_use]
    pub fn from_events(events: &[ClassifiedEvent], exemplar_limit: usize) -> Self {
        let count =
            |class: RetentionClass| events.iter().filter(|e| e.retention.class == class).count();
        let raw_score: i64 = events.iter().map(|e| i64::from(e.retention.raw_score)).sum();
        let non_neutral: Vec<&ClassifiedEvent> = events
            .iter()
            .filter(|e| e.retention.class != RetentionClass::Neutral)
            .collect();
        let n = non_neutral.len();
        let retained = non_neutral.iter().filter(|e| e.retention.class.is_retained()).count();

        let mut worst: Vec<FadeIncident> = events
            .iter()
            .filter(|e| e.retention.class == RetentionClass::Fade)
            .map(|e| FadeIncident {
                date: e.date(),
                headline: e.event.headline.clone(),
                day_of_change_pct: e.day_of_change(),
                lead_out_change_pct: e.lead_out_change(),
                retention_ratio: e.retention.retention_ratio,
            })
            .collect();
        worst.sort_by(|a, b| a.retention_ratio.total_cmp(&b.retention_ratio));
        worst.truncate(exemplar_limit);

        Self {
            total_analyzed: events.len(),
            positive_count: count(RetentionClass::Positive),
            fade_count: count(RetentionClass::Fade),
            over_reaction_count: count(RetentionClass::OverReactionRecovery),
            sustained_drop_count: count(RetentionClass::SustainedDrop),
            neutral_count: count(RetentionClass::Neutral),
            raw_score,
            non_neutral: n,
            retention_rate: if n == 0 { 0.0 } else { retained as f64 / n as f64 },
            average_retention_ratio: mean(
                non_neutral
                    .iter()
                    .filter(|e| e.day_of_change().abs() > MIN_PRICE_MOVE_PCT)
                    .map(|e| e.retention.retention_ratio),
            )
            .unwrap_or(0.0),
            retention_score: if n == 0 {
                0.5
            } else {
                (raw_score as f64 + n as f64) / (2.0 * n as f64)
            },
            worst_fades: worst,
        }
    }
}

/// The three axis summaries of one analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisSummaries {
    /// Leakage summary.
    pub leakage: LeakageSummary,
    /// Conviction summary.
    pub conviction: ConvictionSummary,
    /// Retention summary.
    pub retention: RetentionSummary,
}

impl AxisSummaries {
    /// Aggregate classified events under `policy`.
    #[must_use]
    pub fn build(events: &[ClassifiedEvent], policy: &AggregationPolicy) -> Self {
        let selected = policy.select(events);
        Self {
            leakage: LeakageSummary::from_events(&selected, policy.exemplar_limit),
            conviction: ConvictionSummary::from_events(events, policy.exemplar_limit),
            retention: RetentionSummary::from_events(&selected, policy.exemplar_limit),
        }
    }
}
