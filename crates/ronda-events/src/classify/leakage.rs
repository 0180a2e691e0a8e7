//! Did the market know before the announcement?

use serde::{Deserialize, Serialize};

use crate::thresholds::LeakageThresholds;

/// Leakage class of one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeakageClass {
    /// Price and volume moved ahead of the news and the news itself added little.
    HighLeakage,
    /// Nothing conclusive.
    Neutral,
    /// Quiet tape into the announcement.
    TightShip,
}

impl LeakageClass {
    /// Every class in report order.
    pub const ALL: [Self; 3] = [Self::HighLeakage, Self::Neutral, Self::TightShip];

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::HighLeakage => "High leakage",
            Self::Neutral => "Neutral",
            Self::TightShip => "Tight ship",
        }
    }
}

/// Leakage verdict with the inputs it was based on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeakageAssessment {
    /// Class.
    pub class: LeakageClass,
    /// Severity score in `[0, 1]`; higher is better information control.
    pub score: f64,
    /// Lead-in price change in percent (0 when the window was unavailable).
    pub pre_drift_pct: f64,
    /// Lead-in volume ratio (1.0 when the window was unavailable).
    pub pre_volume_ratio: f64,
    /// Whether the lead-in moved in the same direction as the day-of reaction.
    pub aligned: bool,
}

/// Classify leakage from the lead-in drift, lead-in volume and day-of move.
#[must_use]
pub fn classify_leakage(
    pre_drift_pct: f64,
    pre_volume_ratio: f64,
    day_of_pct: f64,
    t: &LeakageThresholds,
) -> LeakageAssessment {
    let drift = pre_drift_pct.abs();
    let aligned = (pre_drift_pct > 0.0 && day_of_pct > 0.0) || (pre_drift_pct < 0.0 && day_of_pct < 0.0);
    let priced_in = day_of_pct.abs() < drift || !aligned;

    let (class, score) = if drift > t.high_drift_pct
        && pre_volume_ratio >= t.high_volume_ratio
        && priced_in
    {
        (
            LeakageClass::HighLeakage,
            (0.3 - (drift - t.high_drift_pct) * 0.05).max(0.0),
        )
    } else if drift < t.tight_drift_pct && pre_volume_ratio < t.tight_volume_ratio {
        (
            LeakageClass::TightShip,
            (0.7 + (1.0 - drift / t.tight_drift_pct) * 0.3).min(1.0),
        )
    } else {
        (LeakageClass::Neutral, (0.6 - drift * 0.05).clamp(0.4, 0.6))
    };

    LeakageAssessment {
        class,
        score,
        pre_drift_pct,
        pre_volume_ratio,
        aligned,
    }
}
