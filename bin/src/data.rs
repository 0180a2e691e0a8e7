//! Data loading utilities for the Ronda CLI.
//!
//! Each entity lives in its own directory:
//!
//! - `events.json`: array of announcements
//! - `prices.csv`: `date,open,high,low,close,volume`
//! - `news.json` (optional): array of news items
//! - `fundamentals.json` (optional): `{ "annual": [...], "quarterly": [...] }`

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use polars::prelude::*;
use ronda::traits::PriceFrame;
use ronda::{
    Event, EventSource, Fundamentals, FundamentalsSource, NewsItem, NewsSource, PriceBar,
    PriceSource, RondaError,
};
use serde::de::DeserializeOwned;

pub(crate) const EVENTS_FILE: &str = "events.json";
pub(crate) const PRICES_FILE: &str = "prices.csv";
pub(crate) const NEWS_FILE: &str = "news.json";
pub(crate) const FUNDAMENTALS_FILE: &str = "fundamentals.json";

/// One entity's data directory.
#[derive(Debug, Clone)]
pub(crate) struct EntityDirectory {
    root: PathBuf,
}

impl EntityDirectory {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Entity name: the directory's final component.
    pub(crate) fn entity(&self) -> String {
        self.root
            .file_name()
            .map_or_else(|| self.root.display().to_string(), |n| n.to_string_lossy().into_owned())
    }

    fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl EventSource for EntityDirectory {
    fn events(&self, _entity: &str) -> Result<Vec<Event>, RondaError> {
        read_json(&self.file(EVENTS_FILE))
    }
}

impl PriceSource for EntityDirectory {
    fn prices(&self, _entity: &str) -> Result<Vec<PriceBar>, RondaError> {
        load_price_frame(&self.file(PRICES_FILE))?.to_bars()
    }
}

impl NewsSource for EntityDirectory {
    fn news(&self, _entity: &str) -> Result<Vec<NewsItem>, RondaError> {
        let path = self.file(NEWS_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        read_json(&path)
    }
}

impl FundamentalsSource for EntityDirectory {
    fn fundamentals(&self, _entity: &str) -> Result<Option<Fundamentals>, RondaError> {
        let path = self.file(FUNDAMENTALS_FILE);
        if !path.exists() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }
}

/// Read and deserialize a JSON file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, RondaError> {
    let text = fs::read_to_string(path)
        .map_err(|e| RondaError::DataFetch(format!("cannot read {}: {}", path.display(), e)))?;
    serde_json::from_str(&text)
        .map_err(|e| RondaError::InvalidData(format!("{}: {}", path.display(), e)))
}

/// Load a price CSV into a frame.
pub(crate) fn load_price_frame(path: &Path) -> Result<PriceFrame, RondaError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(PriceFrame::new(df))
}

/// Parse a date string in YYYY-MM-DD format.
pub(crate) fn parse_date(date_str: &str) -> Result<NaiveDate, RondaError> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|e| RondaError::InvalidDate(format!("{date_str}: {e}")))
}
