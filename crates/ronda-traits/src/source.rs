//! Collaborator interfaces.
//!
//! The engine never fetches anything itself. Callers hand it data gathered
//! through these traits, one entity at a time. Implementations decide where
//! the data lives (files, a database, a vendor API).

use crate::error::Result;
use crate::types::{Event, Fundamentals, NewsItem, PriceBar, PriceFrame};

/// Supplies announcements for an entity.
pub trait EventSource: Send + Sync {
    /// Announcements for `entity`, in any order.
    fn events(&self, entity: &str) -> Result<Vec<Event>>;
}

/// Supplies daily price bars for an entity.
pub trait PriceSource: Send + Sync {
    /// Daily bars for `entity`, in any order.
    fn prices(&self, entity: &str) -> Result<Vec<PriceBar>>;
}

/// Supplies statement history for an entity.
///
/// Optional collaborator: `Ok(None)` means no fundamentals are known.
pub trait FundamentalsSource: Send + Sync {
    /// Statement history for `entity`.
    fn fundamentals(&self, entity: &str) -> Result<Option<Fundamentals>>;
}

/// Supplies news coverage for an entity.
pub trait NewsSource: Send + Sync {
    /// News items for `entity`, in the order they should be matched.
    fn news(&self, entity: &str) -> Result<Vec<NewsItem>>;
}

/// A frame already holds exactly one entity's history.
impl PriceSource for PriceFrame {
    fn prices(&self, _entity: &str) -> Result<Vec<PriceBar>> {
        self.to_bars()
    }
}
