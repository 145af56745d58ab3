//! # Marketbrief Core
//!
//! Fetch-normalize-snapshot pipeline for daily market briefings.
//!
//! ## Overview
//!
//! This crate collects daily OHLC price history and related news for a
//! configured list of assets and writes one atomic, versioned JSON
//! snapshot per run:
//!
//! - **Validated configuration** into typed asset/source descriptors
//! - **Independent, failure-isolated fetches** per asset and per source
//! - **Provider-agnostic normalization** into one canonical schema
//! - **Atomic snapshot persistence** with a deterministic naming policy
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Configuration loading and validation |
//! | [`domain`] | Canonical domain models |
//! | [`error`] | Error taxonomy (config, fetch, write) |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`news`] | News sources and the optional summarizer |
//! | [`normalize`] | Raw payload to canonical record conversion |
//! | [`outcome`] | Success/failure wrapper for fetch units |
//! | [`pipeline`] | Run orchestration: fan-out, barrier, fold |
//! | [`provider`] | Market data providers |
//! | [`snapshot`] | Snapshot model and atomic writer |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use marketbrief_core::{Config, ReqwestHttpClient, RunContext};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.json".as_ref())?;
//!     let ctx = RunContext::new(config, Arc::new(ReqwestHttpClient::new()), "snapshots")
//!         .with_credential_from_env();
//!
//!     let report = marketbrief_core::pipeline::run(&ctx).await?;
//!     println!("snapshot at {}", report.snapshot_path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Two regimes, never mixed:
//!
//! - **Fatal** ([`ConfigError`], [`WriteError`]): the run aborts with no
//!   artifact.
//! - **Scoped** ([`FetchFailure`]): folded into the snapshot as a failure
//!   entry for exactly one asset or source, preserving what failed and
//!   why.
//!
//! ## Security
//!
//! - The bearer credential is read from the environment only and never
//!   logged.
//! - All outbound calls go through the [`HttpClient`] seam so tests run
//!   fully offline.

pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod news;
pub mod normalize;
pub mod outcome;
pub mod pipeline;
pub mod provider;
pub mod snapshot;

// Re-export commonly used types at crate root for convenience

// Configuration
pub use config::{AssetSpec, Config, SourceCoverage, SourceSpec};

// Domain models
pub use domain::{
    AssetCategory, MarketDate, MarketSummary, NewsItem, OhlcPoint, OhlcSeries, Sentiment, Symbol,
    UtcDateTime,
};

// Error types
pub use error::{
    ConfigError, FetchErrorKind, FetchFailure, PipelineError, ValidationError, WriteError,
};

// HTTP client types
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient,
};

// News fetching
pub use news::{NewsFetcher, RawNewsBatch, SourceKind, Summarizer};

// Normalization
pub use normalize::{canonicalize_points, normalize_news, normalize_series};

// Outcome wrapper
pub use outcome::FetchOutcome;

// Pipeline
pub use pipeline::{run, OutcomeLine, RunContext, RunReport, DEFAULT_FETCH_TIMEOUT};

// Providers
pub use provider::{MarketDataProvider, ProviderId, ProviderSet, RawSeries};

// Snapshot
pub use snapshot::{Snapshot, SnapshotWriter, SourceNews, SCHEMA_VERSION};
