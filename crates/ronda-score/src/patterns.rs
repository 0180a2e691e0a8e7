//! Recurring behaviour across an entity's announcements.

use std::collections::BTreeMap;

use ronda_events::{ClassifiedEvent, LeakageClass, Tone, detect_tone};
use ronda_traits::Event;
use serde::{Deserialize, Serialize};

/// Pattern detection cut-offs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Events a category needs before its leakage rate is judged (default: 3).
    pub min_category_events: usize,
    /// High-leakage rate above which a category is flagged (default: 0.5).
    pub category_leakage_rate: f64,
    /// Share above which tight-ship or retained events count as a habit (default: 0.7).
    pub dominant_share: f64,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            min_category_events: 3,
            category_leakage_rate: 0.5,
            dominant_share: 0.7,
        }
    }
}

/// Leakage tally for one announcement category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryLeakage {
    /// Category tag.
    pub category: String,
    /// High-leakage events in the category.
    pub high_leakage: usize,
    /// Classified events in the category.
    pub total: usize,
}

impl CategoryLeakage {
    /// High-leakage share.
    #[must_use]
    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.high_leakage as f64 / self.total as f64
        }
    }
}

/// Concerns and strengths spotted across the history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternSignals {
    /// Behaviour that should worry an investor.
    pub concerns: Vec<String>,
    /// Behaviour that speaks for management.
    pub quality: Vec<String>,
    /// Most common headline tone, when there were headlines.
    pub dominant_tone: Option<Tone>,
    /// Categories flagged for leakage, sorted by name.
    pub leaky_categories: Vec<CategoryLeakage>,
}

/// Finds recurring behaviour.
#[derive(Debug, Clone, Default)]
pub struct PatternDetector {
    config: PatternConfig,
}

impl PatternDetector {
    /// Create a detector with the given configuration.
    #[must_use]
    pub const fn new(config: PatternConfig) -> Self {
        Self { config }
    }

    /// Detect patterns.
    ///
    /// Tone is read from every supplied headline, classified or not. Category
    /// leakage and habit shares are taken over every classified event,
    /// price-sensitive or not.
    #[must_use]
    pub fn detect(&self, events: &[Event], classified: &[ClassifiedEvent]) -> PatternSignals {
        let mut signals = PatternSignals {
            leaky_categories: self.leaky_categories(classified),
            ..Default::default()
        };

        for category in &signals.leaky_categories {
            signals.concerns.push(format!(
                "High leakage before {} announcements ({}/{})",
                category.category, category.high_leakage, category.total
            ));
        }

        signals.dominant_tone = dominant_tone(events);
        match signals.dominant_tone {
            Some(Tone::Optimistic) => signals
                .concerns
                .push("Predominantly promotional communication style".to_string()),
            Some(Tone::Conservative) => signals
                .quality
                .push("Conservative communication style".to_string()),
            Some(Tone::DataDry) => signals
                .quality
                .push("Factual, data-driven communication style".to_string()),
            None => {}
        }

        let tight_ship = classified
            .iter()
            .filter(|e| e.leakage.class == LeakageClass::TightShip)
            .count();
        if share(tight_ship, classified.len()) > self.config.dominant_share {
            signals
                .quality
                .push("Consistently tight information control".to_string());
        }

        let retained = classified
            .iter()
            .filter(|e| e.retention.class.is_retained())
            .count();
        if share(retained, classified.len()) > self.config.dominant_share {
            signals
                .quality
                .push("Strong price retention after announcements".to_string());
        }

        signals
    }

    fn leaky_categories(&self, classified: &[ClassifiedEvent]) -> Vec<CategoryLeakage> {
        let mut tally: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for event in classified {
            let category = event.event.category.trim();
            if category.is_empty() {
                continue;
            }
            let entry = tally.entry(category).or_default();
            entry.1 += 1;
            if event.leakage.class == LeakageClass::HighLeakage {
                entry.0 += 1;
            }
        }

        tally
            .into_iter()
            .map(|(category, (high_leakage, total))| CategoryLeakage {
                category: category.to_string(),
                high_leakage,
                total,
            })
            .filter(|c| {
                c.total >= self.config.min_category_events
                    && c.rate() > self.config.category_leakage_rate
            })
            .collect()
    }
}

/// Most frequent tone across the headlines; ties go to the earlier tone in
/// [`Tone::ALL`].
#[must_use]
pub fn dominant_tone(events: &[Event]) -> Option<Tone> {
    let mut counts = [0usize; Tone::ALL.len()];
    for event in events {
        let tone = detect_tone(&event.headline);
        if let Some(i) = Tone::ALL.iter().position(|t| *t == tone) {
            counts[i] += 1;
        }
    }

    let mut best: Option<(Tone, usize)> = None;
    for (tone, count) in Tone::ALL.into_iter().zip(counts) {
        if count > 0 && best.is_none_or(|(_, top)| count > top) {
            best = Some((tone, count));
        }
    }
    best.map(|(tone, _)| tone)
}

fn share(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}
