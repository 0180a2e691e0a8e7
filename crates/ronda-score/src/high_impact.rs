//! The last year's market-moving announcements that held, with matching news.

use chrono::Months;
use ronda_events::ClassifiedEvent;
use ronda_traits::{Date, NewsItem};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Maps a fragment of a news link to a publisher name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRule {
    /// Case-insensitive substring of the link.
    pub fragment: String,
    /// Publisher name.
    pub name: String,
}

impl SourceRule {
    /// Create a rule.
    pub fn new(fragment: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
            name: name.into(),
        }
    }
}

/// Selection and news-matching parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighImpactConfig {
    /// Trailing window before the analysis date (default: 12 months).
    pub lookback_months: u32,
    /// Day-of move (absolute %) for a high signal (default: 3.0).
    pub high_move_pct: f64,
    /// Day-of volume ratio for a high signal (default: 2.0).
    pub high_volume_ratio: f64,
    /// Day-of move (absolute %) for an upgraded moderate signal (default: 1.5).
    pub moderate_move_pct: f64,
    /// Day-of volume ratio for an upgraded moderate signal (default: 1.5).
    pub moderate_volume_ratio: f64,
    /// Retention ratio every selected event must reach (default: 0.5).
    pub min_retention_ratio: f64,
    /// News may be this many days either side of the event (default: 2).
    pub news_window_days: i64,
    /// Headline words that must appear in a news title (default: 2).
    pub min_shared_words: usize,
    /// Headline words shorter than this are ignored (default: 4).
    pub min_word_len: usize,
    /// Publisher rules, first match wins.
    pub sources: Vec<SourceRule>,
    /// Publisher name when no rule matches (default: "Newswire").
    pub default_source: String,
}

impl Default for HighImpactConfig {
    fn default() -> Self {
        Self {
            lookback_months: 12,
            high_move_pct: 3.0,
            high_volume_ratio: 2.0,
            moderate_move_pct: 1.5,
            moderate_volume_ratio: 1.5,
            min_retention_ratio: 0.5,
            news_window_days: 2,
            min_shared_words: 2,
            min_word_len: 4,
            sources: vec![
                SourceRule::new("reuters", "Reuters"),
                SourceRule::new("asx.com", "ASX"),
                SourceRule::new("afr.com", "AFR"),
            ],
            default_source: "Newswire".to_string(),
        }
    }
}

/// Which branch admitted an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImpactRating {
    /// Large move or heavy volume that held.
    HighSignal,
    /// Moderate move or volume that held, upgraded by its retention.
    UpgradedSignal,
}

/// News coverage matched to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsMatch {
    /// Publication date.
    pub date: Date,
    /// Article title.
    pub title: String,
    /// Article link.
    pub link: String,
    /// Provider sentiment, when available.
    pub sentiment: Option<f64>,
    /// Publisher inferred from the link.
    pub source: String,
}

/// A market-moving announcement whose reaction held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighImpactEvent {
    /// Announcement date.
    pub date: Date,
    /// Headline.
    pub headline: String,
    /// Category tag.
    pub category: String,
    /// Price-sensitive flag.
    pub price_sensitive: bool,
    /// Day-of change in percent.
    pub day_of_change_pct: f64,
    /// Day-of volume ratio.
    pub volume_ratio: f64,
    /// Lead-out change in percent.
    pub lead_out_change_pct: f64,
    /// Lead-out over day-of change.
    pub retention_ratio: f64,
    /// Selection branch.
    pub impact_rating: ImpactRating,
    /// Matched news coverage.
    pub news: Option<NewsMatch>,
}

/// Selects high-impact events and matches them to news.
#[derive(Debug, Clone, Default)]
pub struct HighImpactFilter {
    config: HighImpactConfig,
}

impl HighImpactFilter {
    /// Create a filter with the given configuration.
    #[must_use]
    pub const fn new(config: HighImpactConfig) -> Self {
        Self { config }
    }

    /// High-impact events dated within the lookback window ending `as_of`,
    /// newest first.
    #[must_use]
    pub fn select(
        &self,
        classified: &[ClassifiedEvent],
        news: &[NewsItem],
        as_of: Date,
    ) -> Vec<HighImpactEvent> {
        let start = as_of
            .checked_sub_months(Months::new(self.config.lookback_months))
            .unwrap_or(Date::MIN);

        let mut selected: Vec<HighImpactEvent> = classified
            .iter()
            .filter(|e| e.date() >= start && e.date() <= as_of)
            .filter_map(|e| {
                let impact_rating = self.rate(e)?;
                Some(HighImpactEvent {
                    date: e.date(),
                    headline: e.event.headline.clone(),
                    category: e.event.category.clone(),
                    price_sensitive: e.event.price_sensitive,
                    day_of_change_pct: e.day_of_change(),
                    volume_ratio: e.day_of.volume_ratio,
                    lead_out_change_pct: e.lead_out_change(),
                    retention_ratio: e.retention.retention_ratio,
                    impact_rating,
                    news: self.match_news(e, news),
                })
            })
            .collect();

        selected.sort_by(|a, b| b.date.cmp(&a.date));
        debug!(
            selected = selected.len(),
            matched = selected.iter().filter(|e| e.news.is_some()).count(),
            %start,
            %as_of,
            "high-impact selection"
        );
        selected
    }

    /// Rating of an event, `None` when it does not qualify.
    ///
    /// Both branches are gated by the same retention floor, so the moderate
    /// branch admits a superset of the high one; the rating records which
    /// cut-off the event cleared.
    #[must_use]
    pub fn rate(&self, event: &ClassifiedEvent) -> Option<ImpactRating> {
        let c = &self.config;
        if event.retention.retention_ratio < c.min_retention_ratio {
            return None;
        }
        let magnitude = event.day_of_change().abs();
        let volume = event.day_of.volume_ratio;

        if magnitude >= c.high_move_pct || volume >= c.high_volume_ratio {
            Some(ImpactRating::HighSignal)
        } else if magnitude >= c.moderate_move_pct || volume >= c.moderate_volume_ratio {
            Some(ImpactRating::UpgradedSignal)
        } else {
            None
        }
    }

    /// First news item, in supplied order, that covers the event.
    #[must_use]
    pub fn match_news(&self, event: &ClassifiedEvent, news: &[NewsItem]) -> Option<NewsMatch> {
        let headline = event.event.headline.to_lowercase();
        let words: Vec<&str> = headline
            .split_whitespace()
            .filter(|w| w.chars().count() >= self.config.min_word_len)
            .collect();

        news.iter()
            .filter(|item| {
                (item.date - event.date()).num_days().abs() <= self.config.news_window_days
            })
            .find(|item| {
                let title = item.title.to_lowercase();
                let shared = words.iter().filter(|w| title.contains(**w)).count();
                shared >= self.config.min_shared_words
                    || (!title.is_empty()
                        && !headline.is_empty()
                        && (title.contains(&headline) || headline.contains(&title)))
            })
            .map(|item| NewsMatch {
                date: item.date,
                title: item.title.clone(),
                link: item.link.clone(),
                sentiment: item.sentiment,
                source: self.source_for(&item.link),
            })
    }

    /// Publisher for a link.
    #[must_use]
    pub fn source_for(&self, link: &str) -> String {
        let link = link.to_lowercase();
        self.config
            .sources
            .iter()
            .find(|rule| link.contains(&rule.fragment.to_lowercase()))
            .map_or_else(|| self.config.default_source.clone(), |rule| rule.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{classified, date};
    use approx::assert_relative_eq;

    fn news(d: Date, title: &str, link: &str) -> NewsItem {
        NewsItem {
            date: d,
            title: title.to_string(),
            link: link.to_string(),
            sentiment: Some(0.4),
        }
    }

    #[test]
    fn test_scenario_event_is_high_signal() {
        let event = classified(date(2024, 3, 1), 4.0, 3.8, 3.0);
        let selected = HighImpactFilter::default().select(&[event], &[], date(2024, 6, 30));
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].impact_rating, ImpactRating::HighSignal);
        assert_relative_eq!(selected[0].retention_ratio, 0.95, epsilon = 1e-12);
        assert!(selected[0].news.is_none());
    }

    #[test]
    fn test_rating_branches() {
        let filter = HighImpactFilter::default();
        // moderate move, held
        let moderate = classified(date(2024, 3, 1), 1.8, 1.5, 1.0);
        assert_eq!(filter.rate(&moderate), Some(ImpactRating::UpgradedSignal));
        // volume alone, held
        let busy = classified(date(2024, 3, 1), 1.2, 1.0, 2.5);
        assert_eq!(filter.rate(&busy), Some(ImpactRating::HighSignal));
        // big move that faded
        let faded = classified(date(2024, 3, 1), 8.0, 2.0, 4.0);
        assert_eq!(filter.rate(&faded), None);
        // held but too small
        let small = classified(date(2024, 3, 1), 1.0, 1.0, 1.0);
        assert_eq!(filter.rate(&small), None);
    }

    #[test]
    fn test_volume_only_spike_without_move_is_excluded() {
        let flat = classified(date(2024, 3, 1), 0.0, 0.0, 5.0);
        assert_eq!(HighImpactFilter::default().rate(&flat), None);
    }

    #[test]
    fn test_lookback_window() {
        let events = vec![
            classified(date(2024, 6, 1), 4.0, 4.0, 3.0),
            classified(date(2023, 7, 1), 4.0, 4.0, 3.0),
            classified(date(2023, 6, 29), 4.0, 4.0, 3.0),
            classified(date(2024, 7, 2), 4.0, 4.0, 3.0),
        ];
        let selected = HighImpactFilter::default().select(&events, &[], date(2024, 6, 30));
        let dates: Vec<Date> = selected.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![date(2024, 6, 1), date(2023, 7, 1)]);
    }

    #[test]
    fn test_news_match_by_shared_words() {
        let mut event = classified(date(2024, 3, 1), 4.0, 4.0, 3.0);
        event.event.headline = "Maiden Resource Estimate for Hilltop Gold Project".to_string();
        let items = vec![
            news(date(2024, 2, 20), "Hilltop resource estimate lands", "https://www.reuters.com/a"),
            news(date(2024, 3, 2), "Explorer unveils maiden resource at Hilltop", "https://www.afr.com/b"),
            news(date(2024, 3, 1), "Hilltop gold project estimate", "https://www.reuters.com/c"),
        ];
        let matched = HighImpactFilter::default().match_news(&event, &items).unwrap();
        // the first item is outside the window; the second is first in order
        assert_eq!(matched.source, "AFR");
        assert_eq!(matched.date, date(2024, 3, 2));
        assert_eq!(matched.sentiment, Some(0.4));
    }

    #[test]
    fn test_news_match_by_containment() {
        let mut event = classified(date(2024, 3, 1), 4.0, 4.0, 3.0);
        event.event.headline = "Trading Halt".to_string();
        let items = vec![news(date(2024, 3, 3), "XYZ requests trading halt pending announcement", "https://www.asx.com.au/x")];
        let matched = HighImpactFilter::default().match_news(&event, &items).unwrap();
        assert_eq!(matched.source, "ASX");
    }

    #[test]
    fn test_news_without_overlap_is_ignored() {
        let mut event = classified(date(2024, 3, 1), 4.0, 4.0, 3.0);
        event.event.headline = "Quarterly Activities Report".to_string();
        let items = vec![
            news(date(2024, 3, 1), "Gold price hits record", "https://example.com/x"),
            news(date(2024, 3, 1), "", "https://example.com/y"),
        ];
        assert!(HighImpactFilter::default().match_news(&event, &items).is_none());
    }

    #[test]
    fn test_default_source() {
        let filter = HighImpactFilter::default();
        assert_eq!(filter.source_for("https://finance.example.com/story"), "Newswire");
        assert_eq!(filter.source_for("https://WWW.REUTERS.COM/x"), "Reuters");
    }
}
