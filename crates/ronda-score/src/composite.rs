//! Weighted composite score, tier and confidence.

use std::fmt;

use ndarray::{Array1, arr1};
use ronda_traits::stats::clamp_unit;
use ronda_traits::{Result, RondaError};
use serde::{Deserialize, Serialize};

use crate::summary::AxisSummaries;

/// Weights of the three sub-scores. Must be non-negative and sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Leakage weight (default: 0.33).
    pub leakage: f64,
    /// Conviction weight (default: 0.33).
    pub conviction: f64,
    /// Retention weight (default: 0.34).
    pub retention: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            leakage: 0.33,
            conviction: 0.33,
            retention: 0.34,
        }
    }
}

impl ScoreWeights {
    /// Weights as a vector in leakage, conviction, retention order.
    #[must_use]
    pub fn to_array(&self) -> Array1<f64> {
        arr1(&[self.leakage, self.conviction, self.retention])
    }
}

/// Cut-offs for the qualitative tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    /// Minimum composite for an operator (default: 0.75).
    pub operator_composite: f64,
    /// Minimum leakage score for an operator (default: 0.70).
    pub operator_leakage: f64,
    /// Minimum retention score for an operator (default: 0.70).
    pub operator_retention: f64,
    /// Minimum composite for an honest struggler (default: 0.50).
    pub struggler_composite: f64,
    /// Minimum leakage score for an honest struggler (default: 0.60).
    pub struggler_leakage: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            operator_composite: 0.75,
            operator_leakage: 0.70,
            operator_retention: 0.70,
            struggler_composite: 0.50,
            struggler_leakage: 0.60,
        }
    }
}

/// Minimum classified-event counts for each confidence level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceThresholds {
    /// Events needed for medium confidence (default: 10).
    pub medium_min_events: usize,
    /// Events needed for high confidence (default: 20).
    pub high_min_events: usize,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            medium_min_events: 10,
            high_min_events: 20,
        }
    }
}

/// Scoring configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// Sub-score weights.
    pub weights: ScoreWeights,
    /// Tier cut-offs.
    pub tiers: TierThresholds,
    /// Confidence cut-offs.
    pub confidence: ConfidenceThresholds,
    /// Sub-score of an axis with nothing to aggregate (default: 0.5).
    pub neutral_score: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            tiers: TierThresholds::default(),
            confidence: ConfidenceThresholds::default(),
            neutral_score: 0.5,
        }
    }
}

impl ScoreConfig {
    /// Tolerance on the weight sum.
    pub const WEIGHT_TOLERANCE: f64 = 1e-9;

    /// Check weights, cut-offs and the neutral score.
    pub fn validate(&self) -> Result<()> {
        let weights = self.weights.to_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(RondaError::InvalidConfig(format!(
                "score weights must be non-negative, got {weights}"
            )));
        }
        let sum = weights.sum();
        if (sum - 1.0).abs() > Self::WEIGHT_TOLERANCE {
            return Err(RondaError::InvalidConfig(format!(
                "score weights must sum to 1, got {sum}"
            )));
        }

        let unit = [
            ("neutral_score", self.neutral_score),
            ("tiers.operator_composite", self.tiers.operator_composite),
            ("tiers.operator_leakage", self.tiers.operator_leakage),
            ("tiers.operator_retention", self.tiers.operator_retention),
            ("tiers.struggler_composite", self.tiers.struggler_composite),
            ("tiers.struggler_leakage", self.tiers.struggler_leakage),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(RondaError::InvalidConfig(format!(
                    "{name} must lie in [0, 1], got {value}"
                )));
            }
        }

        if self.confidence.medium_min_events > self.confidence.high_min_events {
            return Err(RondaError::InvalidConfig(
                "confidence.medium_min_events exceeds confidence.high_min_events".to_string(),
            ));
        }
        Ok(())
    }
}

/// Qualitative management tier, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    /// Weak information control or reactions that do not hold.
    Promoter,
    /// Clean disclosure without consistently strong outcomes.
    HonestStruggler,
    /// Tight disclosure and reactions that hold.
    Operator,
}

impl Tier {
    /// One-line description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Operator => "Disciplined disclosure; the market believes and keeps the news",
            Self::HonestStruggler => "Clean disclosure, but results rarely move or hold the price",
            Self::Promoter => "News leaks ahead or fades after; treat announcements with caution",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Operator => "Operator",
            Self::HonestStruggler => "Honest struggler",
            Self::Promoter => "Promoter",
        })
    }
}

/// How much history stands behind the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    /// Too few events to lean on.
    Low,
    /// Usable.
    Medium,
    /// Plenty of history.
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        })
    }
}

/// Composite assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    /// Weighted blend of the sub-scores, in `[0, 1]`.
    pub composite: f64,
    /// `1 - leakage ratio`.
    pub leakage_score: f64,
    /// Institutional share of conviction events.
    pub conviction_score: f64,
    /// Normalised raw retention score.
    pub retention_score: f64,
    /// Qualitative tier.
    pub tier: Tier,
    /// Confidence level.
    pub confidence: Confidence,
    /// Classified events behind the confidence level.
    pub events_scored: usize,
}

/// Turns axis summaries into a [`CompositeScore`].
#[derive(Debug, Clone, Default)]
pub struct CompositeScorer {
    config: ScoreConfig,
}

impl CompositeScorer {
    /// Create a scorer with the given configuration.
    #[must_use]
    pub const fn new(config: ScoreConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ScoreConfig {
        &self.config
    }

    /// Score the summaries of `events_scored` classified events.
    #[must_use]
    pub fn score(&self, summaries: &AxisSummaries, events_scored: usize) -> CompositeScore {
        let neutral = self.config.neutral_score;
        let leakage_score = if summaries.leakage.total_analyzed == 0 {
            neutral
        } else {
            1.0 - summaries.leakage.leakage_ratio
        };
        let conviction_score = if summaries.conviction.total_analyzed == 0 {
            neutral
        } else {
            summaries.conviction.institutional_ratio
        };
        let retention_score = if summaries.retention.non_neutral == 0 {
            neutral
        } else {
            summaries.retention.retention_score
        };

        let sub_scores: Array1<f64> = arr1(&[leakage_score, conviction_score, retention_score])
            .mapv(clamp_unit);
        let composite = clamp_unit(self.config.weights.to_array().dot(&sub_scores));

        CompositeScore {
            composite,
            leakage_score: sub_scores[0],
            conviction_score: sub_scores[1],
            retention_score: sub_scores[2],
            tier: self.tier(composite, sub_scores[0], sub_scores[2]),
            confidence: self.confidence(events_scored),
            events_scored,
        }
    }

    /// Tier for a composite, leakage and retention score.
    #[must_use]
    pub fn tier(&self, composite: f64, leakage: f64, retention: f64) -> Tier {
        let t = &self.config.tiers;
        if composite >= t.operator_composite
            && leakage >= t.operator_leakage
            && retention >= t.operator_retention
        {
            Tier::Operator
        } else if composite >= t.struggler_composite && leakage >= t.struggler_leakage {
            Tier::HonestStruggler
        } else {
            Tier::Promoter
        }
    }

    /// Confidence level for a classified-event count.
    #[must_use]
    pub const fn confidence(&self, events_scored: usize) -> Confidence {
        let c = &self.config.confidence;
        if events_scored >= c.high_min_events {
            Confidence::High
        } else if events_scored >= c.medium_min_events {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}
