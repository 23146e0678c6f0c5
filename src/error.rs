//! Error types for the Sondeur plugin toolkit

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or running a check
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Threshold range specification could not be parsed
    #[error("invalid range '{spec}': {reason}")]
    InvalidRange { spec: String, reason: String },

    /// Timespan specification could not be parsed
    #[error("invalid timespan '{0}'")]
    InvalidTimespan(String),

    /// Performance data label contains forbidden characters
    #[error("invalid performance label '{0}': must not contain quotes or '='")]
    InvalidPerfLabel(String),

    /// A resource failed to produce metrics; fatal to the invocation
    #[error("probe '{resource}' failed: {source}")]
    ProbeFailed {
        resource: String,
        #[source]
        source: anyhow::Error,
    },

    /// A metric referenced a context that was never registered
    #[error("metric '{metric}' references unknown context '{context}'")]
    UnknownContext { metric: String, context: String },

    /// A context could not evaluate a metric
    #[error("evaluation of '{metric}' failed: {reason}")]
    EvaluationFailed { metric: String, reason: String },

    /// State file could not be read or committed
    #[error("state file {path}: {source}")]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// State file exists but does not hold the expected structure
    #[error("state file {path} is corrupt: {detail}")]
    StoreFormat { path: PathBuf, detail: String },

    /// Check run time exceeded the configured limit
    #[error("check timed out after {0:?}")]
    Timeout(Duration),
}

impl Error {
    pub(crate) fn invalid_range(spec: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidRange {
            spec: spec.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn store_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::StoreIo {
            path: path.into(),
            source,
        }
    }
}
