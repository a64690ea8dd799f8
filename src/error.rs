//! Error types for loading and reporting.
//!
//! `ReportError` is fatal and ends the run. `ReportWarning` is collected on the
//! report: the affected metric is left undefined and the rest of the run goes on.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The input file is missing, unreadable or not valid CSV.
    #[error("failed to load {}: {source}", path.display())]
    DataLoad {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A required header is absent from the input file.
    #[error("{} is missing required column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: String },

    /// The input parsed but contained no rows.
    #[error("{} contains no records", path.display())]
    EmptyDataset { path: PathBuf },

    #[error("failed to render chart {}: {message}", path.display())]
    Chart { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ReportError {
    pub(crate) fn chart(path: impl Into<PathBuf>, err: impl fmt::Display) -> Self {
        Self::Chart {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::DataLoad { .. } => 2,
            Self::MissingColumn { .. } => 3,
            Self::EmptyDataset { .. } => 4,
            Self::Chart { .. } => 5,
            Self::Io(_) => 1,
        }
    }
}

/// Non-fatal conditions met while computing a metric.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReportWarning {
    #[error("{metric} is undefined: needs at least 2 values, found {found}")]
    InsufficientData { metric: String, found: usize },

    #[error("{metric} is undefined: zero variance")]
    ZeroVariance { metric: String },

    #[error("percent difference of {high} over {low} is undefined: division by zero")]
    DivisionByZero { high: f64, low: f64 },
}
