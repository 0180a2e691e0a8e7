#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![forbid(unsafe_code)]

//! Per-event analysis: calendar lookups, window metrics and axis
//! classification.
//!
//! # Example
//!
//! ```ignore
//! use ronda_events::{EventClassifier, TradingCalendar};
//!
//! let calendar = TradingCalendar::new(bars);
//! let classification = EventClassifier::default().classify_all(&calendar, &events);
//! ```

pub mod baseline;
pub mod calendar;
pub mod classify;
pub mod thresholds;
pub mod tone;
pub mod window;

pub use calendar::{Direction, TradingCalendar};
pub use classify::{
    Classification, ClassifiedEvent, ConvictionAssessment, ConvictionClass, EventClassifier,
    LeakageAssessment, LeakageClass, RetentionAssessment, RetentionClass,
};
pub use thresholds::{ConvictionThresholds, LeakageThresholds, RetentionThresholds, Thresholds};
pub use tone::{Tone, detect_tone};
pub use window::{DayOf, WindowCalculator, WindowConfig, WindowMetrics};
