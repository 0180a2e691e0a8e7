//! One-entity analysis pipeline.

use chrono::Months;
use ronda_events::{EventClassifier, TradingCalendar};
use ronda_fundamentals::ResultReviewer;
use ronda_score::{AxisSummaries, CompositeScorer, HighImpactFilter, PatternDetector};
use ronda_traits::{
    Date, EntityId, Event, EventSource, Fundamentals, FundamentalsSource, NewsItem, NewsSource,
    PriceBar, PriceSource, Result,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::report::{DataQuality, QualityReport};

/// Everything known about one entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityData {
    /// Entity identifier.
    pub entity: EntityId,
    /// Announcements, any order.
    pub events: Vec<Event>,
    /// Daily bars, any order.
    pub prices: Vec<PriceBar>,
    /// News coverage, in matching order.
    #[serde(default)]
    pub news: Vec<NewsItem>,
    /// Statement history, when known.
    #[serde(default)]
    pub fundamentals: Option<Fundamentals>,
}

impl EntityData {
    /// Entity with events and prices only.
    pub fn new(entity: impl Into<EntityId>, events: Vec<Event>, prices: Vec<PriceBar>) -> Self {
        Self {
            entity: entity.into(),
            events,
            prices,
            ..Default::default()
        }
    }

    /// Attach news coverage.
    #[must_use]
    pub fn with_news(mut self, news: Vec<NewsItem>) -> Self {
        self.news = news;
        self
    }

    /// Attach statement history.
    #[must_use]
    pub fn with_fundamentals(mut self, fundamentals: Fundamentals) -> Self {
        self.fundamentals = Some(fundamentals);
        self
    }

    /// Gather an entity's data from its sources.
    ///
    /// Event and price failures are returned. News and fundamentals are
    /// optional: a failing source is logged and treated as absent.
    pub fn collect(
        entity: impl Into<EntityId>,
        events: &dyn EventSource,
        prices: &dyn PriceSource,
        news: Option<&dyn NewsSource>,
        fundamentals: Option<&dyn FundamentalsSource>,
    ) -> Result<Self> {
        let entity = entity.into();
        let events = events.events(&entity)?;
        let prices = prices.prices(&entity)?;

        let news = match news.map(|source| source.news(&entity)) {
            Some(Ok(items)) => items,
            Some(Err(e)) => {
                warn!(%entity, error = %e, "news unavailable, continuing without");
                Vec::new()
            }
            None => Vec::new(),
        };
        let fundamentals = match fundamentals.map(|source| source.fundamentals(&entity)) {
            Some(Ok(found)) => found,
            Some(Err(e)) => {
                warn!(%entity, error = %e, "fundamentals unavailable, continuing without");
                None
            }
            None => None,
        };

        Ok(Self {
            entity,
            events,
            prices,
            news,
            fundamentals,
        })
    }
}

/// Runs the full assessment for one entity at a time.
///
/// Holds only configuration, so one analyzer can serve many threads.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
    classifier: EventClassifier,
    scorer: CompositeScorer,
    patterns: PatternDetector,
    high_impact: HighImpactFilter,
    results: ResultReviewer,
}

impl Analyzer {
    /// Length of the reported period when there are no announcements.
    pub const EMPTY_PERIOD_MONTHS: u32 = 24;

    /// Build an analyzer, rejecting invalid configuration.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(config))
    }

    fn assemble(config: AnalysisConfig) -> Self {
        Self {
            classifier: EventClassifier::new(config.windows.clone(), config.effective_thresholds()),
            scorer: CompositeScorer::new(config.score.clone()),
            patterns: PatternDetector::new(config.patterns.clone()),
            high_impact: HighImpactFilter::new(config.high_impact.clone()),
            results: ResultReviewer::new(config.results.clone()),
            config,
        }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Event classifier in use.
    #[must_use]
    pub const fn classifier(&self) -> &EventClassifier {
        &self.classifier
    }

    /// Earliest announcement date considered, when a lookback is configured.
    #[must_use]
    pub fn cutoff(&self, as_of: Date) -> Option<Date> {
        self.config.lookback_months.map(|months| {
            as_of
                .checked_sub_months(Months::new(months))
                .unwrap_or(Date::MIN)
        })
    }

    /// Analysis period covered by `events`, which must already be restricted
    /// to the considered window.
    ///
    /// With a lookback the period is the lookback window ending `as_of`.
    /// Otherwise it runs from the oldest to the newest announcement, or over
    /// the [`EMPTY_PERIOD_MONTHS`](Self::EMPTY_PERIOD_MONTHS) before `as_of`
    /// when there are none.
    #[must_use]
    pub fn period(&self, events: &[Event], as_of: Date) -> (Date, Date) {
        if let Some(cutoff) = self.cutoff(as_of) {
            return (cutoff, as_of);
        }
        let oldest = events.iter().map(|e| e.date).min();
        let newest = events.iter().map(|e| e.date).max();
        match (oldest, newest) {
            (Some(start), Some(end)) => (start, end),
            _ => (
                as_of
                    .checked_sub_months(Months::new(Self::EMPTY_PERIOD_MONTHS))
                    .unwrap_or(Date::MIN),
                as_of,
            ),
        }
    }

    /// Assess `data` as of `as_of`.
    ///
    /// Announcements and bars after `as_of` are ignored, as are announcements
    /// older than the lookback when one is configured. Never fails: thin or
    /// empty data yields a neutral, low confidence report whose data-quality
    /// note says what is missing.
    #[tracing::instrument(skip_all, fields(entity = %data.entity, %as_of))]
    pub fn analyze(&self, data: &EntityData, as_of: Date) -> QualityReport {
        let cutoff = self.cutoff(as_of);
        let events: Vec<Event> = data
            .events
            .iter()
            .filter(|e| e.date <= as_of && cutoff.is_none_or(|c| e.date >= c))
            .cloned()
            .collect();
        let (period_start, period_end) = self.period(&events, as_of);
        let calendar: TradingCalendar = data
            .prices
            .iter()
            .filter(|bar| bar.date <= as_of)
            .copied()
            .collect();

        let classification = self.classifier.classify_all(&calendar, &events);
        let classified = classification.events;

        let summaries = AxisSummaries::build(&classified, &self.config.aggregation);
        let score = self.scorer.score(&summaries, classified.len());
        let patterns = self.patterns.detect(&events, &classified);
        let high_impact = self.high_impact.select(&classified, &data.news, as_of);
        let financial_results = self
            .results
            .results(&classified, data.fundamentals.as_ref());
        let data_quality = DataQuality::assess(
            data.events.len(),
            events.len(),
            classified.len(),
            calendar.len(),
        );

        info!(
            composite = score.composite,
            tier = %score.tier,
            confidence = %score.confidence,
            classified = classified.len(),
            dropped = classification.dropped,
            high_impact = high_impact.len(),
            "analysis complete"
        );

        QualityReport {
            entity: data.entity.clone(),
            analysis_date: as_of,
            period_start,
            period_end,
            asset_class: self.config.asset_class,
            events: classified,
            summaries,
            score,
            patterns,
            high_impact,
            financial_results,
            data_quality,
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::assemble(AnalysisConfig::default())
    }
}
