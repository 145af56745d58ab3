use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors raised by domain type constructors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },
    #[error("date must be YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("epoch seconds out of range: {value}")]
    EpochOutOfRange { value: i64 },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
    #[error("ohlc point at {ts} violates low <= open,close <= high")]
    OhlcBoundsViolated { ts: String },
    #[error("series points must be ascending and unique by date; violation at index {index}")]
    UnorderedSeries { index: usize },

    #[error("headline cannot be empty")]
    EmptyHeadline,
    #[error("summary text cannot be empty")]
    EmptySummaryText,
    #[error("unknown sentiment '{value}', expected Positive, Neutral, Negative or Mixed")]
    InvalidSentiment { value: String },

    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
}

/// Configuration errors. Fatal: the run aborts before any fetch.
///
/// Every variant names the offending key path (`assets[2].symbol` style)
/// so a misconfigured document can be fixed without reading source code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("config is not valid JSON: {message}")]
    Parse { message: String },

    #[error("missing required field at '{path}'")]
    MissingField { path: String },

    #[error("field at '{path}' must not be empty")]
    EmptyField { path: String },

    #[error("invalid value at '{path}': {message}")]
    InvalidValue { path: String, message: String },

    #[error("duplicate asset symbol '{symbol}' at '{path}'")]
    DuplicateSymbol { path: String, symbol: String },

    #[error("source at '{path}' references unknown asset symbol '{symbol}'")]
    UnknownSymbolReference { path: String, symbol: String },
}

/// Classification of a scoped fetch failure.
///
/// Scoped failures degrade exactly one asset or source entry; none of them
/// aborts the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// Network or non-2xx transport problem.
    Transport,
    /// Response arrived but could not be decoded.
    Parse,
    /// Provider reported that the identifier does not exist.
    NotFound,
    /// The provider answered with zero usable records.
    Empty,
    /// The per-fetch time budget elapsed.
    Timeout,
    /// The bearer credential required by this call is not configured.
    MissingCredential,
    /// Coerced data violated a canonical invariant.
    Normalization,
    /// Unexpected internal condition (task abort, invariant bug).
    Internal,
}

impl FetchErrorKind {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Transport => "fetch.transport",
            Self::Parse => "fetch.parse",
            Self::NotFound => "fetch.not_found",
            Self::Empty => "fetch.empty",
            Self::Timeout => "fetch.timeout",
            Self::MissingCredential => "fetch.missing_credential",
            Self::Normalization => "normalization.invariant",
            Self::Internal => "fetch.internal",
        }
    }
}

/// Structured scoped failure folded into the snapshot.
///
/// The identity of what failed is carried by the snapshot entry (asset
/// symbol key or source name field), never inside the failure itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailure {
    pub reason: FetchErrorKind,
    pub message: String,
}

impl FetchFailure {
    pub fn new(reason: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Transport, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Parse, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::NotFound, message)
    }

    pub fn empty(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Empty, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Timeout, message)
    }

    pub fn missing_credential(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::MissingCredential, message)
    }

    pub fn normalization(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Normalization, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Internal, message)
    }

    pub const fn code(&self) -> &'static str {
        self.reason.code()
    }
}

impl Display for FetchFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for FetchFailure {}

/// Snapshot persistence errors. Fatal: without an artifact the run failed.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error(transparent)]
    Schema(#[from] ValidationError),

    #[error("cannot create output directory '{path}': {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },

    #[error("cannot serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("cannot stage snapshot in '{path}': {source}")]
    Stage {
        path: String,
        source: std::io::Error,
    },

    #[error("cannot move snapshot into place at '{path}': {source}")]
    Persist {
        path: String,
        source: std::io::Error,
    },
}

/// Top-level pipeline error. Scoped fetch failures never surface here;
/// only a failed snapshot write makes the run itself fail.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Write(#[from] WriteError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_codes_are_stable() {
        assert_eq!(FetchFailure::not_found("x").code(), "fetch.not_found");
        assert_eq!(
            FetchFailure::normalization("x").code(),
            "normalization.invariant"
        );
    }

    #[test]
    fn failure_serializes_with_snake_case_reason() {
        let failure = FetchFailure::timeout("budget elapsed");
        let value = serde_json::to_value(&failure).expect("must serialize");
        assert_eq!(value["reason"], "timeout");
        assert_eq!(value["message"], "budget elapsed");
    }
}
