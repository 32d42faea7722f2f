//! Error types for loading sources and reading configuration
//!
//! Nothing in the benchmark phase can fail, so the taxonomy only covers the edges of the
//! system: reading a CSV source and interpreting environment configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while reading one tabular source
#[derive(Error, Debug)]
pub enum LoadError {
    /// The source could not be opened or read
    #[error("cannot read {} source {}: {}", .table, .path.display(), .source)]
    Io {
        table: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV stream was malformed
    #[error("malformed {table} source at record {record}: {source}")]
    Csv {
        table: &'static str,
        record: usize,
        #[source]
        source: csv::Error,
    },

    /// A column required by the row factory is absent from the header
    #[error("{table} source has no column `{column}`")]
    MissingColumn { table: &'static str, column: &'static str },
}

impl LoadError {
    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            LoadError::Io { .. } => "io",
            LoadError::Csv { .. } => "csv",
            LoadError::MissingColumn { .. } => "missing_column",
        }
    }

    /// Table the failing source was meant to populate
    pub fn table(&self) -> &'static str {
        match self {
            LoadError::Io { table, .. }
            | LoadError::Csv { table, .. }
            | LoadError::MissingColumn { table, .. } => *table,
        }
    }
}

/// Invalid configuration value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The variable holds something that does not parse
    #[error("invalid value `{value}` for {variable}: expected {expected}")]
    InvalidValue { variable: &'static str, value: String, expected: &'static str },
}

impl ConfigError {
    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            ConfigError::InvalidValue { .. } => "configuration",
        }
    }
}
