#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ronda/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! ## Crate Organization
//!
//! - [`traits`] - Domain types, collaborator traits and errors
//! - [`events`] - Trading calendar, event windows and per-event classification
//! - [`score`] - Aggregation, composite score, patterns and high-impact events
//! - [`fundamentals`] - Financial result detection and statement matching
//! - [`Analyzer`] - Runs the pipeline for one entity and returns a [`QualityReport`]
//!
//! ## Pipeline
//!
//! 1. **Calendar** indexes the daily bars by date
//! 2. **Windows** measure lead-in, day-of and lead-out moves against baseline volume
//! 3. **Classifier** places each announcement on the leakage, conviction and retention axes
//! 4. **Aggregator** summarises each axis and blends the composite score
//! 5. **Detectors** add patterns, high-impact announcements and financial results

pub mod analyzer;
pub mod config;
pub mod report;

/// Version information for the ronda crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Sub-crates
// ============================================================================

/// Domain types, collaborator traits and errors.
///
/// - [`EventSource`], [`PriceSource`], [`NewsSource`], [`FundamentalsSource`] -
///   where an entity's data comes from
/// - [`PriceFrame`](traits::PriceFrame) - polars price frame conversion
pub mod traits {
    pub use ronda_traits::*;
}

/// Per-event analysis.
///
/// ```ignore
/// use ronda::events::{EventClassifier, TradingCalendar};
///
/// let calendar = TradingCalendar::new(bars);
/// let classified = EventClassifier::default().classify_all(&calendar, &events);
/// ```
pub mod events {
    pub use ronda_events::*;
}

/// Entity-level scoring.
pub mod score {
    pub use ronda_score::*;
}

/// Financial results and statement matching.
pub mod fundamentals {
    pub use ronda_fundamentals::*;
}

pub use analyzer::{Analyzer, EntityData};
pub use config::AnalysisConfig;
pub use report::{DataQuality, QualityReport};

pub use ronda_traits::{
    AssetClass, Date, EntityId, Event, EventSource, Fundamentals, FundamentalsSource, NewsItem,
    NewsSource, PriceBar, PriceSource, Result, RondaError,
};

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```ignore
/// use ronda::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{AnalysisConfig, Analyzer, DataQuality, EntityData, QualityReport};
    pub use crate::{
        AssetClass, Date, Event, EventSource, Fundamentals, FundamentalsSource, NewsItem,
        NewsSource, PriceBar, PriceSource, Result, RondaError,
    };
    pub use ronda_score::{Confidence, Tier};
}
