//! Benchmark configuration
//!
//! The binary accepts a single positional argument, so everything else is read from
//! environment variables:
//!
//! - `QALINK_ITERATIONS`: passes over the answer set per workload (default 1000)
//! - `QALINK_REPORT_FORMAT`: `text` (default) or `json`

use crate::error::ConfigError;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

/// Passes over the answer set per workload when nothing else is configured
pub const DEFAULT_ITERATIONS: usize = 1000;

pub const ITERATIONS_VAR: &str = "QALINK_ITERATIONS";
pub const REPORT_FORMAT_VAR: &str = "QALINK_REPORT_FORMAT";

pub const QUESTIONS_FILE: &str = "questions.csv";
pub const ANSWERS_FILE: &str = "answers.csv";
pub const TAGS_FILE: &str = "tags.csv";
pub const TAG_QUESTIONS_FILE: &str = "tag_questions.csv";

/// How the final report is rendered on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// One line per timing and per aggregate
    #[default]
    Text,
    /// A single JSON document
    Json,
}

impl FromStr for ReportFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(ConfigError::InvalidValue {
                variable: REPORT_FORMAT_VAR,
                value: s.to_string(),
                expected: "`text` or `json`",
            }),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => f.write_str("text"),
            ReportFormat::Json => f.write_str("json"),
        }
    }
}

/// Parse an iteration count; zero is rejected because it would time an empty loop
pub fn parse_iterations(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidValue {
            variable: ITERATIONS_VAR,
            value: raw.to_string(),
            expected: "a positive integer",
        }),
    }
}

/// Locations of the four CSV sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub questions: PathBuf,
    pub answers: PathBuf,
    pub tags: PathBuf,
    pub tag_questions: PathBuf,
}

impl DataSources {
    /// Resolve the fixed file names under `prefix`, or relative to the working directory
    pub fn under(prefix: Option<&Path>) -> Self {
        let resolve = |name: &str| match prefix {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        };
        Self {
            questions: resolve(QUESTIONS_FILE),
            answers: resolve(ANSWERS_FILE),
            tags: resolve(TAGS_FILE),
            tag_questions: resolve(TAG_QUESTIONS_FILE),
        }
    }
}

/// Settings for one benchmark run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    /// Directory holding the CSV sources
    pub data_dir: Option<PathBuf>,
    /// Passes over the answer set per workload
    pub iterations: usize,
    pub report_format: ReportFormat,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self { data_dir: None, iterations: DEFAULT_ITERATIONS, report_format: ReportFormat::Text }
    }
}

impl BenchConfig {
    /// Create configuration from environment variables
    pub fn from_environment() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create configuration from an arbitrary variable source.
    ///
    /// Unparseable values are logged and replaced by their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(ITERATIONS_VAR) {
            match parse_iterations(&raw) {
                Ok(iterations) => config.iterations = iterations,
                Err(e) => warn!(error = %e, default = DEFAULT_ITERATIONS, "Ignoring iteration count"),
            }
        }

        if let Some(raw) = lookup(REPORT_FORMAT_VAR) {
            match raw.parse::<ReportFormat>() {
                Ok(format) => config.report_format = format,
                Err(e) => warn!(error = %e, "Ignoring report format, using text"),
            }
        }

        config
    }

    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        self.data_dir = data_dir;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    /// Paths of the four sources under the configured directory
    pub fn sources(&self) -> DataSources {
        DataSources::under(self.data_dir.as_deref())
    }
}
