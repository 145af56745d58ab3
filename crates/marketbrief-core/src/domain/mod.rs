//! # Domain Models
//!
//! Canonical domain types for marketbrief snapshots.
//!
//! ## Overview
//!
//! This module provides strongly-typed domain models with built-in validation.
//! All models are designed to be:
//!
//! - **Type-safe**: Invalid states are unrepresentable
//! - **Validated**: Construction validates all invariants
//! - **Serializable**: Full serde support for JSON
//!
//! ## Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`OhlcPoint`] | One trading period (date + optional O/H/L/C) |
//! | [`OhlcSeries`] | Ascending, date-unique price history for one asset |
//! | [`NewsItem`] | Extracted news item with associated symbols |
//! | [`MarketSummary`] | Condensed per-asset summary with sentiment |
//! | [`Sentiment`] | Positive / Neutral / Negative / Mixed |
//! | [`AssetCategory`] | Category tag carried by asset descriptors |
//! | [`Symbol`] | Validated asset symbol |
//! | [`UtcDateTime`] | UTC timestamp |
//! | [`MarketDate`] | Date-granularity timestamp for price history |
//!
//! ## Validation
//!
//! All domain types enforce invariants at construction time:
//!
//! ```rust,ignore
//! use marketbrief_core::{MarketDate, OhlcPoint, ValidationError};
//!
//! let ts = MarketDate::parse("2024-01-02")?;
//! let point = OhlcPoint::new(ts, Some(100.0), Some(105.0), Some(95.0), Some(102.0))?;
//!
//! // close above high - returns ValidationError
//! let invalid = OhlcPoint::new(ts, Some(100.0), Some(105.0), Some(95.0), Some(106.0));
//! assert!(matches!(invalid, Err(ValidationError::OhlcBoundsViolated { .. })));
//! ```

mod models;
mod symbol;
mod timestamp;

pub use models::{
    AssetCategory, MarketSummary, NewsItem, OhlcPoint, OhlcSeries, Sentiment,
};
pub use symbol::Symbol;
pub use timestamp::{MarketDate, UtcDateTime};
