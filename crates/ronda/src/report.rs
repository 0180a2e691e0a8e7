//! The assessment handed back to callers.

use ronda_events::ClassifiedEvent;
use ronda_fundamentals::FinancialResult;
use ronda_score::{AxisSummaries, CompositeScore, HighImpactEvent, PatternSignals};
use ronda_traits::{AssetClass, Date, EntityId};
use serde::{Deserialize, Serialize};

/// Counts and shortages in the data behind a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQuality {
    /// Announcements supplied.
    pub events_supplied: usize,
    /// Announcements dated inside the analysis period.
    pub events_in_period: usize,
    /// Announcements with day-of metrics.
    pub events_classified: usize,
    /// Announcements in the period with no trading session nearby.
    pub events_dropped: usize,
    /// Trading days up to the analysis date.
    pub trading_days: usize,
    /// Human-readable shortages.
    pub gaps: Vec<String>,
}

impl DataQuality {
    /// Fewer trading days than this is flagged.
    pub const MIN_TRADING_DAYS: usize = 30;
    /// Fewer announcements than this is flagged.
    pub const MIN_ANNOUNCEMENTS: usize = 10;

    /// Tally counts and describe shortages.
    #[must_use]
    pub fn assess(
        events_supplied: usize,
        events_in_period: usize,
        events_classified: usize,
        trading_days: usize,
    ) -> Self {
        let events_dropped = events_in_period.saturating_sub(events_classified);
        let mut gaps = Vec::new();
        if trading_days < Self::MIN_TRADING_DAYS {
            gaps.push(format!(
                "Limited price data: only {trading_days} trading days available"
            ));
        }
        if events_in_period < Self::MIN_ANNOUNCEMENTS {
            gaps.push(format!(
                "Limited announcement history: only {events_in_period} announcements"
            ));
        }
        if events_dropped > 0 {
            gaps.push(format!(
                "{events_dropped} announcements had no trading session nearby and were excluded"
            ));
        }
        Self {
            events_supplied,
            events_in_period,
            events_classified,
            events_dropped,
            trading_days,
            gaps,
        }
    }

    /// Whether any shortage was found.
    #[must_use]
    pub fn has_gaps(&self) -> bool {
        !self.gaps.is_empty()
    }
}

/// Management quality assessment for one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Entity analysed.
    pub entity: EntityId,
    /// Analysis date.
    pub analysis_date: Date,
    /// First day of the analysis period.
    pub period_start: Date,
    /// Last day of the analysis period.
    pub period_end: Date,
    /// Asset class the thresholds were chosen for.
    pub asset_class: AssetClass,
    /// Classified events, newest first.
    pub events: Vec<ClassifiedEvent>,
    /// Per-axis summaries.
    pub summaries: AxisSummaries,
    /// Composite score, tier and confidence.
    pub score: CompositeScore,
    /// Recurring behaviour.
    pub patterns: PatternSignals,
    /// Market-moving announcements of the last year that held, newest first.
    pub high_impact: Vec<HighImpactEvent>,
    /// Financial result announcements, newest first.
    pub financial_results: Vec<FinancialResult>,
    /// Data counts and shortages.
    pub data_quality: DataQuality,
}

impl QualityReport {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> ronda_traits::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ronda_traits::RondaError::Other(format!("cannot serialize report: {e}")))
    }
}
