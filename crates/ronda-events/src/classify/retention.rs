//! Did the reaction stick?

use ronda_traits::stats::{MIN_PRICE_MOVE_PCT, ratio_or};
use serde::{Deserialize, Serialize};

use crate::thresholds::RetentionThresholds;

/// Retention class of one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RetentionClass {
    /// Gain held through the lead-out.
    Positive,
    /// Gain gave back more than the hold fraction.
    Fade,
    /// Drop recovered at least part of the way.
    OverReactionRecovery,
    /// Drop kept going or stayed down.
    SustainedDrop,
    /// Day-of move too small to judge.
    Neutral,
}

impl RetentionClass {
    /// Every class in report order.
    pub const ALL: [Self; 5] = [
        Self::Positive,
        Self::Fade,
        Self::OverReactionRecovery,
        Self::SustainedDrop,
        Self::Neutral,
    ];

    /// Contribution to the raw retention score: +1, -1 or 0.
    #[must_use]
    pub const fn raw_score(&self) -> i32 {
        match self {
            Self::Positive | Self::OverReactionRecovery => 1,
            Self::Fade | Self::SustainedDrop => -1,
            Self::Neutral => 0,
        }
    }

    /// Whether the market kept the reaction (or fixed an over-reaction).
    #[must_use]
    pub const fn is_retained(&self) -> bool {
        matches!(self, Self::Positive | Self::OverReactionRecovery)
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Positive => "Positive retention",
            Self::Fade => "Fade",
            Self::OverReactionRecovery => "Over-reaction recovery",
            Self::SustainedDrop => "Sustained drop",
            Self::Neutral => "Neutral",
        }
    }
}

/// Retention verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetentionAssessment {
    /// Class.
    pub class: RetentionClass,
    /// +1, -1 or 0.
    pub raw_score: i32,
    /// Lead-out change over day-of change; 0 when the day-of move is negligible.
    pub retention_ratio: f64,
}

/// Classify retention from the day-of change and the lead-out change.
///
/// Both are measured from the pre-event close, so a lead-out change at or above
/// `hold_fraction` of the day-of change means the market kept that share of
/// the reaction.
#[must_use]
pub fn classify_retention(
    day_of_pct: f64,
    lead_out_pct: f64,
    t: &RetentionThresholds,
) -> RetentionAssessment {
    let held = lead_out_pct >= day_of_pct * t.hold_fraction;
    let class = if day_of_pct.abs() < t.materiality_pct {
        RetentionClass::Neutral
    } else if day_of_pct > 0.0 {
        if held { RetentionClass::Positive } else { RetentionClass::Fade }
    } else if held {
        RetentionClass::OverReactionRecovery
    } else {
        RetentionClass::SustainedDrop
    };

    RetentionAssessment {
        class,
        raw_score: class.raw_score(),
        retention_ratio: retention_ratio(day_of_pct, lead_out_pct),
    }
}

/// Lead-out change divided by day-of change, 0 when the day-of move is
/// below [`MIN_PRICE_MOVE_PCT`].
#[must_use]
pub fn retention_ratio(day_of_pct: f64, lead_out_pct: f64) -> f64 {
    if day_of_pct.abs() <= MIN_PRICE_MOVE_PCT {
        0.0
    } else {
        ratio_or(lead_out_pct, day_of_pct, 0.0)
    }
}
