use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::measurement::Metric;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every way a chart run can fail. None of them are recoverable mid-run.
#[derive(Error, Debug)]
pub enum Error {
    /// The data source does not exist.
    #[error("input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The rendering backend cannot produce figures on this system.
    #[error("rendering backend unavailable: {reason}\n{remediation}")]
    DependencyUnavailable { reason: String, remediation: String },

    /// A tabular row is missing a required field or holds a non-numeric value.
    #[error("malformed row at line {line}: column `{column}` {problem}")]
    MalformedRow {
        line: u64,
        column: String,
        problem: String,
    },

    /// A hardcoded table does not match the declared axes.
    #[error("malformed {metric} table: {problem}")]
    MalformedTable { metric: Metric, problem: String },

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration")]
    Config(#[from] figment::Error),
}

impl Error {
    pub fn malformed_row(line: u64, column: impl Into<String>, problem: impl Into<String>) -> Self {
        Self::MalformedRow {
            line,
            column: column.into(),
            problem: problem.into(),
        }
    }

    pub fn malformed_table(metric: Metric, problem: impl Into<String>) -> Self {
        Self::MalformedTable {
            metric,
            problem: problem.into(),
        }
    }

    /// Wraps a drawing failure so it surfaces as a write failure for `path`.
    pub fn render_failed(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source: std::io::Error::other(err.to_string()),
        }
    }
}
