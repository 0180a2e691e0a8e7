//! Who traded the announcement, and how hard?

use serde::{Deserialize, Serialize};

use crate::thresholds::ConvictionThresholds;

/// Conviction class of one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConvictionClass {
    /// A real move on heavy volume.
    Institutional,
    /// A sharp rally without volume behind it.
    RetailHype,
    /// The market shrugged.
    LowInterest,
    /// Anything else.
    Mixed,
}

impl ConvictionClass {
    /// Every class in report order.
    pub const ALL: [Self; 4] = [
        Self::Institutional,
        Self::RetailHype,
        Self::LowInterest,
        Self::Mixed,
    ];

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Institutional => "Institutional conviction",
            Self::RetailHype => "Retail hype",
            Self::LowInterest => "Low interest",
            Self::Mixed => "Mixed",
        }
    }
}

/// Conviction verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvictionAssessment {
    /// Class.
    pub class: ConvictionClass,
    /// Strength score in `[0, 1]`.
    pub score: f64,
    /// Day-of volume ratio the verdict was based on.
    pub volume_ratio: f64,
}

/// Classify conviction from the day-of move and volume ratio.
///
/// Institutional conviction needs both cut-offs cleared together. Retail hype
/// is an upward move past the hype cut-off on thin volume.
#[must_use]
pub fn classify_conviction(
    day_of_pct: f64,
    volume_ratio: f64,
    t: &ConvictionThresholds,
) -> ConvictionAssessment {
    let magnitude = day_of_pct.abs();

    let (class, score) = if magnitude >= t.institutional_move_pct
        && volume_ratio >= t.institutional_volume_ratio
    {
        let bonus = ((volume_ratio - t.institutional_volume_ratio) * 0.04).min(0.2);
        (ConvictionClass::Institutional, (0.8 + bonus).min(1.0))
    } else if day_of_pct > t.hype_move_pct && volume_ratio < t.hype_volume_ratio {
        (ConvictionClass::RetailHype, (0.1 + volume_ratio * 0.1).min(0.3))
    } else if magnitude < t.quiet_move_pct && volume_ratio < t.quiet_volume_ratio {
        (ConvictionClass::LowInterest, 0.5)
    } else {
        (ConvictionClass::Mixed, 0.4 + (volume_ratio * 0.1).min(0.3))
    };

    ConvictionAssessment {
        class,
        score: score.clamp(0.0, 1.0),
        volume_ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn classify(day_of: f64, vol: f64) -> ConvictionAssessment {
        classify_conviction(day_of, vol, &ConvictionThresholds::default())
    }

    #[test]
    fn test_institutional_at_threshold() {
        let a = classify(4.0, 3.0);
        assert_eq!(a.class, ConvictionClass::Institutional);
        assert_relative_eq!(a.score, 0.8);
    }

    #[test]
    fn test_institutional_on_selloff() {
        let a = classify(-6.0, 8.0);
        assert_eq!(a.class, ConvictionClass::Institutional);
        assert_relative_eq!(a.score, 1.0);
    }

    #[test]
    fn test_retail_hype() {
        let a = classify(9.0, 1.5);
        assert_eq!(a.class, ConvictionClass::RetailHype);
        assert_relative_eq!(a.score, 0.25);
    }

    #[test]
    fn test_sharp_drop_on_thin_volume_is_mixed() {
        let a = classify(-9.0, 1.5);
        assert_eq!(a.class, ConvictionClass::Mixed);
    }

    #[test]
    fn test_low_interest() {
        let a = classify(0.3, 0.6);
        assert_eq!(a.class, ConvictionClass::LowInterest);
        assert_relative_eq!(a.score, 0.5);
    }

    #[test]
    fn test_mixed_score_capped() {
        let a = classify(1.5, 2.5);
        assert_eq!(a.class, ConvictionClass::Mixed);
        assert_relative_eq!(a.score, 0.65);
        let b = classify(1.5, 2.9);
        assert_relative_eq!(b.score, 0.69, epsilon = 1e-12);
        let c = classify(0.5, 12.0);
        assert_relative_eq!(c.score, 0.7);
    }
}
