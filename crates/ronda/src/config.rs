//! Analysis configuration.

use std::path::Path;

use ronda_events::{Thresholds, WindowConfig};
use ronda_fundamentals::ResultReviewConfig;
use ronda_score::{AggregationPolicy, HighImpactConfig, PatternConfig, ScoreConfig};
use ronda_traits::{AssetClass, Result, RondaError};
use serde::{Deserialize, Serialize};

/// Everything an [`Analyzer`](crate::Analyzer) needs to know.
///
/// Every section has defaults, so a JSON file only needs the fields it
/// changes:
///
/// ```json
/// { "asset_class": "mid_cap", "score": { "weights": { "leakage": 0.5, "conviction": 0.2, "retention": 0.3 } } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Market-cap bucket; picks the threshold table unless `thresholds` is set.
    pub asset_class: AssetClass,
    /// Explicit threshold table, overriding the asset-class table.
    pub thresholds: Option<Thresholds>,
    /// Event window lengths and scan limits.
    pub windows: WindowConfig,
    /// When set, events older than this many months before the analysis date
    /// are ignored (default: none, every event up to the analysis date counts).
    pub lookback_months: Option<u32>,
    /// Which events feed the leakage and retention summaries.
    pub aggregation: AggregationPolicy,
    /// Composite weights, tiers and confidence.
    pub score: ScoreConfig,
    /// Pattern detection cut-offs.
    pub patterns: PatternConfig,
    /// High-impact selection and news matching.
    pub high_impact: HighImpactConfig,
    /// Financial result review.
    pub results: ResultReviewConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            asset_class: AssetClass::default(),
            thresholds: None,
            windows: WindowConfig::default(),
            lookback_months: None,
            aggregation: AggregationPolicy::default(),
            score: ScoreConfig::default(),
            patterns: PatternConfig::default(),
            high_impact: HighImpactConfig::default(),
            results: ResultReviewConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Default configuration for an asset class.
    #[must_use]
    pub fn for_asset_class(asset_class: AssetClass) -> Self {
        Self {
            asset_class,
            ..Default::default()
        }
    }

    /// Parse a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| RondaError::InvalidConfig(format!("invalid configuration JSON: {e}")))
    }

    /// Read a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            RondaError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Threshold table in effect.
    #[must_use]
    pub fn effective_thresholds(&self) -> Thresholds {
        self.thresholds
            .clone()
            .unwrap_or_else(|| Thresholds::for_asset_class(self.asset_class))
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.windows.validate()?;
        self.effective_thresholds().validate()?;
        self.score.validate()?;

        if self.lookback_months == Some(0) {
            return Err(RondaError::InvalidConfig(
                "lookback_months must be positive".to_string(),
            ));
        }
        if self.high_impact.lookback_months == 0 {
            return Err(RondaError::InvalidConfig(
                "high_impact.lookback_months must be positive".to_string(),
            ));
        }

        let non_negative = [
            ("high_impact.high_move_pct", self.high_impact.high_move_pct),
            ("high_impact.high_volume_ratio", self.high_impact.high_volume_ratio),
            ("high_impact.moderate_move_pct", self.high_impact.moderate_move_pct),
            ("high_impact.moderate_volume_ratio", self.high_impact.moderate_volume_ratio),
            ("high_impact.min_retention_ratio", self.high_impact.min_retention_ratio),
            ("results.review_move_pct", self.results.review_move_pct),
            ("results.trend_pp", self.results.trend_pp),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(RondaError::InvalidConfig(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        if self.high_impact.news_window_days < 0 {
            return Err(RondaError::InvalidConfig(
                "high_impact.news_window_days must be non-negative".to_string(),
            ));
        }
        if self.results.yoy_min_days > self.results.yoy_max_days {
            return Err(RondaError::InvalidConfig(
                "results.yoy_min_days exceeds results.yoy_max_days".to_string(),
            ));
        }

        for (name, value) in [
            ("patterns.category_leakage_rate", self.patterns.category_leakage_rate),
            ("patterns.dominant_share", self.patterns.dominant_share),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(RondaError::InvalidConfig(format!(
                    "{name} must lie in [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}
