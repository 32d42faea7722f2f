#![allow(missing_docs)]
//! Core functionality for the qalink benchmark.
//!
//! Loads a question/answer/tag export, indexes it, resolves the question/tag association
//! and the answer-to-question links, then times how long it takes to walk from every answer
//! to its question through an ordered index, a hash index and a cached handle.

use tracing::{debug, instrument};

/// Resolution of question/tag rows and answer back-references
pub mod association;
/// Environment-driven run configuration and source locations
pub mod config;
/// The assembled, read-only benchmark context
pub mod dataset;
/// Error taxonomy for loading and configuration
pub mod error;
/// Timed execution of the workloads
pub mod harness;
/// Ordered and hashed lookup structures
pub mod index;
/// CSV-to-record loader adapter
pub mod loader;
/// Result types and rendering
pub mod report;
/// Answer-to-question lookup strategies
pub mod strategy;
/// Workload shapes and aggregates
pub mod workload;

pub use config::{BenchConfig, DataSources, ReportFormat};
pub use dataset::{Dataset, DatasetStats};
pub use error::{ConfigError, LoadError};
pub use harness::Harness;
pub use index::Indexes;
pub use report::{BenchReport, WorkloadResult};
pub use strategy::{DirectReference, HashIndexLookup, OrderedIndexLookup, QuestionResolver, Strategy};
pub use workload::{Aggregate, CountTotals, Shape, Workload};

/// Load the configured sources and run every workload
#[instrument(skip_all, fields(iterations = config.iterations))]
pub fn run(config: &BenchConfig) -> BenchReport {
    let dataset = Dataset::load(&config.sources());
    debug!(stats = ?dataset.stats(), "Dataset ready");
    Harness::new(&dataset, config.iterations).run_all()
}
