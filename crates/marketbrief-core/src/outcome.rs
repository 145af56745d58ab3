//! Success/failure wrapper preserving the identity of what was fetched.

use serde::{Deserialize, Serialize};

use crate::FetchFailure;

/// Outcome of one isolated fetch unit.
///
/// Unlike `Result`, this type is part of the snapshot artifact: both arms
/// serialize under a `status` tag so downstream consumers can see exactly
/// what degraded and why instead of observing a silently smaller dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchOutcome<T> {
    Success { data: T },
    Failure { error: FetchFailure },
}

impl<T> FetchOutcome<T> {
    pub fn success(data: T) -> Self {
        Self::Success { data }
    }

    pub fn failure(error: FetchFailure) -> Self {
        Self::Failure { error }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&FetchFailure> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U> {
        match self {
            Self::Success { data } => FetchOutcome::Success { data: f(data) },
            Self::Failure { error } => FetchOutcome::Failure { error },
        }
    }

    /// Chain a fallible canonicalization step over a successful outcome.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Result<U, FetchFailure>) -> FetchOutcome<U> {
        match self {
            Self::Success { data } => FetchOutcome::from(f(data)),
            Self::Failure { error } => FetchOutcome::Failure { error },
        }
    }
}

impl<T> From<Result<T, FetchFailure>> for FetchOutcome<T> {
    fn from(value: Result<T, FetchFailure>) -> Self {
        match value {
            Ok(data) => Self::Success { data },
            Err(error) => Self::Failure { error },
        }
    }
}
