#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![forbid(unsafe_code)]

//! Entity-level assessment built from classified events.
//!
//! # Example
//!
//! ```ignore
//! use ronda_score::{AggregationPolicy, AxisSummaries, CompositeScorer};
//!
//! let summaries = AxisSummaries::build(&classification.events, &AggregationPolicy::default());
//! let score = CompositeScorer::default().score(&summaries, summaries.leakage.total_analyzed);
//! println!("{:.2} {}", score.composite, score.tier);
//! ```

pub mod composite;
pub mod dedupe;
pub mod high_impact;
pub mod patterns;
pub mod summary;

#[cfg(test)]
mod test_support;

pub use composite::{
    CompositeScore, CompositeScorer, Confidence, ConfidenceThresholds, ScoreConfig, ScoreWeights,
    Tier, TierThresholds,
};
pub use dedupe::dedupe_by_date;
pub use high_impact::{
    HighImpactConfig, HighImpactEvent, HighImpactFilter, ImpactRating, NewsMatch, SourceRule,
};
pub use patterns::{CategoryLeakage, PatternConfig, PatternDetector, PatternSignals, dominant_tone};
pub use summary::{
    AggregationPolicy, AxisSummaries, ConvictionHighlight, ConvictionSummary, DriftDirection,
    FadeIncident, LeakageIncident, LeakageSummary, RetentionSummary,
};
