//! Benchmark results and their rendering
//!
//! The text form prints, per workload, a timing line followed by its aggregate line. The
//! JSON form carries the same data plus dataset statistics.

use crate::config::ReportFormat;
use crate::dataset::DatasetStats;
use crate::strategy::Strategy;
use crate::workload::{Aggregate, Shape, Workload};
use serde::{Serialize, Serializer};
use std::io::{self, Write};
use std::time::Duration;

/// Timing and aggregate of one workload
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorkloadResult {
    pub label: &'static str,
    #[serde(flatten)]
    pub workload: Workload,
    #[serde(rename = "elapsed_ms", serialize_with = "duration_as_millis")]
    pub elapsed: Duration,
    pub aggregate: Aggregate,
}

impl WorkloadResult {
    pub fn new(workload: Workload, elapsed: Duration, aggregate: Aggregate) -> Self {
        Self { label: workload.label(), workload, elapsed, aggregate }
    }

    /// Timing line in the form `<label> traversal time: <ms> ms`
    pub fn timing_line(&self) -> String {
        format!("{} traversal time: {} ms", self.label, self.elapsed.as_millis())
    }
}

fn duration_as_millis<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_nanos() as f64 / 1_000_000.0)
}

/// Results of a full run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchReport {
    pub iterations: usize,
    pub dataset: DatasetStats,
    pub results: Vec<WorkloadResult>,
}

impl BenchReport {
    pub fn new(iterations: usize, dataset: DatasetStats, results: Vec<WorkloadResult>) -> Self {
        Self { iterations, dataset, results }
    }

    pub fn result(&self, workload: Workload) -> Option<&WorkloadResult> {
        self.results.iter().find(|r| r.workload == workload)
    }

    pub fn aggregate(&self, strategy: Strategy, shape: Shape) -> Option<Aggregate> {
        self.result(Workload::new(strategy, shape)).map(|r| r.aggregate)
    }

    /// True when every strategy produced the same aggregate for each shape
    pub fn aggregates_agree(&self) -> bool {
        [Shape::CountOnly, Shape::StringAccumulation].into_iter().all(|shape| {
            let mut aggregates = self.results.iter().filter(|r| r.workload.shape == shape).map(|r| r.aggregate);
            match aggregates.next() {
                Some(first) => aggregates.all(|a| a == first),
                None => true,
            }
        })
    }

    pub fn render_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for result in &self.results {
            writeln!(out, "{}", result.timing_line())?;
            writeln!(out, "{}", result.aggregate)?;
        }
        Ok(())
    }

    pub fn render_json<W: Write>(&self, out: &mut W) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)
    }

    pub fn render<W: Write>(&self, format: ReportFormat, out: &mut W) -> io::Result<()> {
        match format {
            ReportFormat::Text => self.render_text(out),
            ReportFormat::Json => self.render_json(out),
        }
    }
}
