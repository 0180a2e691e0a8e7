#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ronda/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and collaborator traits for the Ronda event-impact engine.
//!
//! Everything downstream of this crate works on the plain values defined here:
//! price bars, announcements, news items and statement periods. Data providers
//! plug in through the traits in [`source`].

/// The version of the ronda-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod source;
pub mod stats;
pub mod types;

pub use error::{Result, RondaError};
pub use source::{EventSource, FundamentalsSource, NewsSource, PriceSource};
pub use types::{
    AssetClass, Date, EntityId, Event, FundamentalPeriod, Fundamentals, NewsItem, PriceBar,
    PriceFrame,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }
}
