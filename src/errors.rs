//! Error types
//!
//! Only whole-operation failures surface as [`NuanceError`]. Per-sentence and
//! per-candidate problems are absorbed where they happen and reported through
//! [`BatchSummary`](crate::mining::BatchSummary) instead.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced to callers of the engine
#[derive(Debug, Error)]
pub enum NuanceError {
    #[error("tagging failed: {reason}")]
    TaggingFailure { reason: String },

    #[error("cannot compare \"{word}\": {reason}")]
    NotComparable { word: String, reason: String },

    #[error("unknown strategy \"{0}\" (expected PATTERN or LINEAR)")]
    UnknownStrategy(String),

    #[error("unknown sense \"{0}\"")]
    UnknownSense(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NuanceError>;

/// Stable codes attached to configuration diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    NonPositive,
    OutOfRange,
    UnknownField,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NonPositive => "non_positive",
            Self::OutOfRange => "out_of_range",
            Self::UnknownField => "unknown_field",
        }
    }
}

/// A single problem found in a [`MiningConfig`](crate::types::MiningConfig)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigIssue {
    pub code: IssueCode,
    /// JSON pointer to the offending field
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ConfigIssue {
    pub fn new(code: IssueCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.as_str(), self.path, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " ({hint})")?;
        }
        Ok(())
    }
}
