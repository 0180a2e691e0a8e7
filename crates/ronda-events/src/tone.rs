//! Headline tone.
//!
//! A keyword screen, not sentiment analysis: it only tells promotional copy
//! apart from hedged copy and plain factual releases.

use serde::{Deserialize, Serialize};

/// Superlatives that mark promotional copy.
pub const OPTIMISTIC_TERMS: &[&str] = &[
    "WORLD-CLASS",
    "WORLD CLASS",
    "WORLD LEADING",
    "GAME-CHANGING",
    "GAME CHANGING",
    "TRANSFORMATIONAL",
    "EXCEPTIONAL",
    "OUTSTANDING",
    "REMARKABLE",
    "UNPRECEDENTED",
    "RECORD-BREAKING",
    "RECORD BREAKING",
    "STRONG GROWTH",
    "STELLAR",
    "EXTRAORDINARY",
    "BREAKTHROUGH",
    "MAJOR DISCOVERY",
    "EXCITING",
    "REVOLUTIONARY",
    "PHENOMENAL",
    "BEST-IN-CLASS",
];

/// Hedging language.
pub const CONSERVATIVE_TERMS: &[&str] = &[
    "SUBJECT TO",
    "MAY ",
    "EXPECTS ",
    "EXPECTED TO",
    "POTENTIAL",
    "APPROXIMATELY",
    "ESTIMATED",
    "TARGETING",
    "GUIDANCE",
    "FORECAST",
];

/// Communication style of a headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tone {
    /// Promotional superlatives.
    Optimistic,
    /// Hedged, forward-looking language.
    Conservative,
    /// Plain statement of fact.
    DataDry,
}

impl Tone {
    /// Every tone, in tie-break order.
    pub const ALL: [Self; 3] = [Self::Optimistic, Self::Conservative, Self::DataDry];
}

/// Classify a headline. Superlatives win over hedging; anything with neither
/// is treated as data-dry.
#[must_use]
pub fn detect_tone(headline: &str) -> Tone {
    let upper = headline.to_uppercase();
    if OPTIMISTIC_TERMS.iter().any(|term| upper.contains(term)) {
        Tone::Optimistic
    } else if CONSERVATIVE_TERMS.iter().any(|term| upper.contains(term)) {
        Tone::Conservative
    } else {
        Tone::DataDry
    }
}
