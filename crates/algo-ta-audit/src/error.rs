//! Harness error types for data loading, report I/O and configuration.
//!
//! Messages are meant to be actionable: each says what went wrong and, where
//! it helps, how to fix it.

use std::io;
use std::path::Path;

use thiserror::Error;

/// Every error the audit harness can raise.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Reading or writing a file failed.
    #[error("I/O error with '{path}': {source}. Check that the path exists and is accessible")]
    Io {
        /// The underlying I/O error.
        #[source]
        source: io::Error,
        /// Path that caused the error.
        path: String,
    },

    /// Historical data could not be parsed.
    #[error("CSV error{}: {message}", line_suffix(.line))]
    Csv {
        /// Description of the problem.
        message: String,
        /// 1-based line number, if known.
        line: Option<usize>,
    },

    /// A kernel call failed outside the guarded correctness/performance loops.
    #[error("indicator error: {0}")]
    Indicator(#[from] algo_ta::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value is unusable.
    #[error("invalid setting '{field}': {reason}{}", suggestion_suffix(.suggestion))]
    Config {
        /// Offending setting.
        field: String,
        /// Why it was rejected.
        reason: String,
        /// What would be accepted instead.
        suggestion: Option<String>,
    },
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(" on line {l}")).unwrap_or_default()
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    suggestion.as_ref().map(|s| format!(". {s}")).unwrap_or_default()
}

impl AuditError {
    /// Wraps an I/O error with the path it concerns.
    pub fn io(source: io::Error, path: impl AsRef<Path>) -> Self {
        Self::Io {
            source,
            path: path.as_ref().display().to_string(),
        }
    }

    /// A CSV error without a known line.
    pub fn csv(message: impl Into<String>) -> Self {
        Self::Csv {
            message: message.into(),
            line: None,
        }
    }

    /// A rejected configuration value.
    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            reason: reason.into(),
            suggestion: None,
        }
    }

    /// Attaches a suggestion to a [`AuditError::Config`]; other variants pass through.
    #[must_use]
    pub fn suggest(self, hint: impl Into<String>) -> Self {
        match self {
            Self::Config { field, reason, .. } => Self::Config {
                field,
                reason,
                suggestion: Some(hint.into()),
            },
            other => other,
        }
    }
}

impl From<csv::Error> for AuditError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().and_then(|p| usize::try_from(p.line()).ok());
        Self::Csv {
            message: err.to_string(),
            line,
        }
    }
}

/// Result alias for harness operations.
pub type Result<T> = std::result::Result<T, AuditError>;
