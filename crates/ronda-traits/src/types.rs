//! Domain types shared across the Ronda crates.
//!
//! These are the immutable inputs of an analysis: daily price bars,
//! announcements, news items and statement periods, plus the
//! [`PriceFrame`] adapter that turns a Polars `DataFrame` into bars.

use std::fmt;
use std::str::FromStr;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RondaError};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// Identifier of the entity under analysis, typically an exchange ticker.
pub type EntityId = String;

/// Days between 0001-01-01 (CE) and 1970-01-01, the Polars date epoch.
pub const CE_TO_UNIX_EPOCH_DAYS: i32 = 719_163;

/// One trading day of prices and volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading date.
    pub date: Date,
    /// Opening price.
    pub open: f64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Shares traded.
    pub volume: u64,
}

/// A corporate or regulatory announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Announcement date.
    pub date: Date,
    /// Headline as published.
    pub headline: String,
    /// Free-form category tag (for example "Quarterly Activities Report").
    #[serde(default)]
    pub category: String,
    /// Whether the exchange flagged the announcement as price sensitive.
    #[serde(default)]
    pub price_sensitive: bool,
    /// Link or identifier of the underlying document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_reference: Option<String>,
}

impl Event {
    /// Create an announcement with an empty category and no document link.
    pub fn new(date: Date, headline: impl Into<String>, price_sensitive: bool) -> Self {
        Self {
            date,
            headline: headline.into(),
            category: String::new(),
            price_sensitive,
            document_reference: None,
        }
    }

    /// Set the category tag.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

/// A dated news article about the entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Publication date.
    pub date: Date,
    /// Article title.
    pub title: String,
    /// Article URL.
    #[serde(default)]
    pub link: String,
    /// Provider sentiment score, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<f64>,
}

/// One reporting period from a financial statement feed.
///
/// Amounts are optional: feeds frequently omit individual line items, and a
/// missing figure stays missing rather than turning into zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundamentalPeriod {
    /// Period end date as reported (`YYYY-MM-DD`).
    pub end_date: String,
    /// Total revenue.
    #[serde(default, alias = "totalRevenue", alias = "total_revenue")]
    pub revenue: Option<f64>,
    /// Gross profit.
    #[serde(default)]
    pub gross_profit: Option<f64>,
    /// Operating income.
    #[serde(default)]
    pub operating_income: Option<f64>,
    /// Net income.
    #[serde(default)]
    pub net_income: Option<f64>,
    /// EBITDA.
    #[serde(default)]
    pub ebitda: Option<f64>,
    /// Operating cash flow.
    #[serde(default)]
    pub operating_cash_flow: Option<f64>,
    /// Free cash flow.
    #[serde(default)]
    pub free_cash_flow: Option<f64>,
}

impl FundamentalPeriod {
    /// Parse the end date string into a `Date`.
    #[must_use]
    pub fn parsed_end_date(&self) -> Option<Date> {
        Date::parse_from_str(self.end_date.trim(), "%Y-%m-%d").ok()
    }

    /// Gross margin in percent, when revenue is positive.
    #[must_use]
    pub fn gross_margin(&self) -> Option<f64> {
        match (self.gross_profit, self.revenue) {
            (Some(gross), Some(revenue)) if revenue > 0.0 => Some(gross / revenue * 100.0),
            _ => None,
        }
    }

    /// Operating margin in percent, when revenue is positive.
    #[must_use]
    pub fn operating_margin(&self) -> Option<f64> {
        match (self.operating_income, self.revenue) {
            (Some(operating), Some(revenue)) if revenue > 0.0 => {
                Some(operating / revenue * 100.0)
            }
            _ => None,
        }
    }

    /// Net margin in percent, when revenue is positive.
    #[must_use]
    pub fn net_margin(&self) -> Option<f64> {
        match (self.net_income, self.revenue) {
            (Some(net), Some(revenue)) if revenue > 0.0 => Some(net / revenue * 100.0),
            _ => None,
        }
    }
}

/// Annual and quarterly statement history for one entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    /// Annual periods, any order.
    #[serde(default)]
    pub annual: Vec<FundamentalPeriod>,
    /// Quarterly periods, any order.
    #[serde(default)]
    pub quarterly: Vec<FundamentalPeriod>,
}

impl Fundamentals {
    /// Whether neither annual nor quarterly periods are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.annual.is_empty() && self.quarterly.is_empty()
    }
}

/// Market-capitalisation bucket used to pick a threshold table.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    /// Below $2B.
    #[default]
    SmallCap,
    /// $2B to $10B.
    MidCap,
    /// $10B and above.
    LargeCap,
}

impl AssetClass {
    /// Lower bound of the mid-cap bucket in dollars.
    pub const MID_CAP_FLOOR: f64 = 2_000_000_000.0;
    /// Lower bound of the large-cap bucket in dollars.
    pub const LARGE_CAP_FLOOR: f64 = 10_000_000_000.0;

    /// Bucket a market capitalisation.
    #[must_use]
    pub fn from_market_cap(market_cap: f64) -> Self {
        if market_cap >= Self::LARGE_CAP_FLOOR {
            Self::LargeCap
        } else if market_cap >= Self::MID_CAP_FLOOR {
            Self::MidCap
        } else {
            Self::SmallCap
        }
    }

    /// Short lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SmallCap => "small",
            Self::MidCap => "mid",
            Self::LargeCap => "large",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = RondaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "small" | "smallcap" => Ok(Self::SmallCap),
            "mid" | "midcap" => Ok(Self::MidCap),
            "large" | "largecap" => Ok(Self::LargeCap),
            other => Err(RondaError::InvalidData(format!(
                "unknown asset class '{other}' (expected small, mid or large)"
            ))),
        }
    }
}

/// Daily price history held as a Polars `DataFrame`.
///
/// # Expected Schema
///
/// - `date`: `Date` or `YYYY-MM-DD` string
/// - `open`, `high`, `low`, `close`: any numeric type
/// - `volume`: any numeric type
///
/// Rows with a missing date or price are skipped when converting to bars.
#[derive(Debug, Clone)]
pub struct PriceFrame {
    data: DataFrame,
}

impl PriceFrame {
    /// Columns that must be present.
    pub const REQUIRED_COLUMNS: [&'static str; 6] =
        ["date", "open", "high", "low", "close", "volume"];

    /// Wrap a DataFrame.
    pub const fn new(data: DataFrame) -> Self {
        Self { data }
    }

    /// Borrow the underlying DataFrame.
    pub const fn data(&self) -> &DataFrame {
        &self.data
    }

    /// Consume self and return the underlying DataFrame.
    pub fn into_inner(self) -> DataFrame {
        self.data
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.data.height()
    }

    /// Whether the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.data.height() == 0
    }

    /// Checks if a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.data
            .get_column_names()
            .iter()
            .any(|s| s.as_str() == name)
    }

    /// Convert the frame into price bars sorted by date.
    pub fn to_bars(&self) -> Result<Vec<PriceBar>> {
        for col in Self::REQUIRED_COLUMNS {
            if !self.has_column(col) {
                return Err(RondaError::MissingColumn(col.to_string()));
            }
        }

        let dates = self.dates()?;
        let open = self.float_column("open")?;
        let high = self.float_column("high")?;
        let low = self.float_column("low")?;
        let close = self.float_column("close")?;
        let volume = self.float_column("volume")?;

        let mut bars = Vec::with_capacity(dates.len());
        for (i, date) in dates.into_iter().enumerate() {
            let (Some(date), Some(open), Some(high), Some(low), Some(close)) =
                (date, open[i], high[i], low[i], close[i])
            else {
                continue;
            };
            let volume = volume[i].map_or(0, |v| if v > 0.0 { v.round() as u64 } else { 0 });
            bars.push(PriceBar {
                date,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        bars.sort_by_key(|bar| bar.date);
        Ok(bars)
    }

    fn dates(&self) -> Result<Vec<Option<Date>>> {
        let series = self.data.column("date")?.as_materialized_series();
        match series.dtype() {
            DataType::Date => Ok(series
                .date()?
                .into_iter()
                .map(|d: Option<i32>| {
                    d.and_then(|d| Date::from_num_days_from_ce_opt(d + CE_TO_UNIX_EPOCH_DAYS))
                })
                .collect()),
            DataType::String => Ok(series
                .str()?
                .into_iter()
                .map(|s: Option<&str>| {
                    s.and_then(|s| Date::parse_from_str(s.trim(), "%Y-%m-%d").ok())
                })
                .collect()),
            other => Err(RondaError::InvalidData(format!(
                "unsupported date column type: {other}"
            ))),
        }
    }

    fn float_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let series = self
            .data
            .column(name)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        Ok(series.f64()?.into_iter().collect())
    }
}

impl From<DataFrame> for PriceFrame {
    fn from(data: DataFrame) -> Self {
        Self::new(data)
    }
}

impl AsRef<DataFrame> for PriceFrame {
    fn as_ref(&self) -> &DataFrame {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_price_frame_string_dates() {
        let df = df! {
            "date" => &["2024-01-03", "2024-01-02"],
            "open" => &[10.0, 9.5],
            "high" => &[10.5, 10.0],
            "low" => &[9.8, 9.4],
            "close" => &[10.2, 9.9],
            "volume" => &[1_200_000i64, 1_000_000],
        }
        .unwrap();

        let bars = PriceFrame::new(df).to_bars().unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, date(2024, 1, 2));
        assert_eq!(bars[1].date, date(2024, 1, 3));
        assert_eq!(bars[0].volume, 1_000_000);
        assert_relative_eq!(bars[1].close, 10.2);
    }

    #[test]
    fn test_price_frame_date_dtype() {
        let mut df = df! {
            "date" => &[19_724i32, 19_725],
            "open" => &[1.0, 1.1],
            "high" => &[1.2, 1.3],
            "low" => &[0.9, 1.0],
            "close" => &[1.1, 1.2],
            "volume" => &[500.0, 700.0],
        }
        .unwrap();
        let dates = df
            .column("date")
            .unwrap()
            .as_materialized_series()
            .cast(&DataType::Date)
            .unwrap();
        df.with_column(dates).unwrap();

        let bars = PriceFrame::from(df).to_bars().unwrap();
        assert_eq!(bars[0].date, date(2024, 1, 2));
        assert_eq!(bars[1].volume, 700);
    }

    #[test]
    fn test_price_frame_skips_unparseable_rows() {
        let df = df! {
            "date" => &["2024-01-02", "not-a-date"],
            "open" => &[1.0, 1.0],
            "high" => &[1.0, 1.0],
            "low" => &[1.0, 1.0],
            "close" => &[1.0, 1.0],
            "volume" => &[10i64, 10],
        }
        .unwrap();

        let bars = PriceFrame::new(df).to_bars().unwrap();
        assert_eq!(bars.len(), 1);
    }

    #[test]
    fn test_price_frame_missing_column() {
        let df = df! {
            "date" => &["2024-01-02"],
            "close" => &[1.0],
        }
        .unwrap();

        let err = PriceFrame::new(df).to_bars().unwrap_err();
        assert!(matches!(err, RondaError::MissingColumn(ref c) if c == "open"));
    }

    #[test]
    fn test_fundamental_margins() {
        let period = FundamentalPeriod {
            end_date: "2024-06-30".to_string(),
            revenue: Some(200.0),
            gross_profit: Some(50.0),
            net_income: Some(-20.0),
            ..Default::default()
        };
        assert_eq!(period.parsed_end_date(), Some(date(2024, 6, 30)));
        assert_relative_eq!(period.gross_margin().unwrap(), 25.0);
        assert_relative_eq!(period.net_margin().unwrap(), -10.0);

        let empty = FundamentalPeriod {
            end_date: "30/06/2024".to_string(),
            ..Default::default()
        };
        assert!(empty.parsed_end_date().is_none());
        assert!(empty.gross_margin().is_none());
        assert!(empty.operating_margin().is_none());
    }

    #[test]
    fn test_fundamental_period_deserialize() {
        let period: FundamentalPeriod = serde_json::from_str(
            r#"{"endDate":"2024-06-30","totalRevenue":100.0,"operatingIncome":12.0}"#,
        )
        .unwrap();
        assert_eq!(period.revenue, Some(100.0));
        assert_eq!(period.operating_income, Some(12.0));
        assert_relative_eq!(period.operating_margin().unwrap(), 12.0);

        let json = serde_json::to_string(&period).unwrap();
        assert!(json.contains(r#""operatingIncome":12.0"#));

        let snake: FundamentalPeriod =
            serde_json::from_str(r#"{"endDate":"2024-06-30","total_revenue":80.0}"#).unwrap();
        assert_eq!(snake.revenue, Some(80.0));
    }

    #[test]
    fn test_asset_class() {
        assert_eq!(AssetClass::from_market_cap(15e9), AssetClass::LargeCap);
        assert_eq!(AssetClass::from_market_cap(2e9), AssetClass::MidCap);
        assert_eq!(AssetClass::from_market_cap(3e8), AssetClass::SmallCap);
        assert_eq!("Large-Cap".parse::<AssetClass>().unwrap(), AssetClass::LargeCap);
        assert_eq!("mid".parse::<AssetClass>().unwrap(), AssetClass::MidCap);
        assert!("tiny".parse::<AssetClass>().is_err());
    }

    #[test]
    fn test_event_deserialize_defaults() {
        let event: Event =
            serde_json::from_str(r#"{"date":"2024-03-01","headline":"Drilling update"}"#)
                .unwrap();
        assert_eq!(event.date, date(2024, 3, 1));
        assert!(!event.price_sensitive);
        assert!(event.category.is_empty());
        assert!(event.document_reference.is_none());
    }
}
