#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![forbid(unsafe_code)]

//! # Example
//!
//! ```ignore
//! use ronda_fundamentals::ResultReviewer;
//!
//! let results = ResultReviewer::default().results(&classification.events, fundamentals.as_ref());
//! for r in &results {
//!     println!("{} {} {:?}", r.date, r.period, r.market_review);
//! }
//! ```

pub mod matcher;
pub mod result_type;
pub mod results;

pub use matcher::{Enrichment, PeriodMatch, match_period};
pub use result_type::{PeriodKind, ResultType, fiscal_quarter, fiscal_year};
pub use results::{FinancialResult, MarketReview, ReactionTrend, ResultReviewConfig, ResultReviewer};
