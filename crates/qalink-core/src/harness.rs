//! Timed execution of the six workloads
//!
//! Only the traversal loop sits inside the timed region. Strategy and shape are chosen
//! before the clock starts, and reading or dropping the accumulated value happens after it
//! stops.

use crate::dataset::Dataset;
use crate::report::{BenchReport, WorkloadResult};
use crate::strategy::{DirectReference, HashIndexLookup, OrderedIndexLookup, QuestionResolver, Strategy};
use crate::workload::{Accumulator, Aggregate, Concatenation, CountTotals, Shape, Workload, traverse};
use std::hint::black_box;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Runs workloads over a borrowed, already assembled dataset
#[derive(Debug, Clone, Copy)]
pub struct Harness<'d> {
    dataset: &'d Dataset,
    iterations: usize,
}

impl<'d> Harness<'d> {
    /// `iterations` is clamped to at least one pass
    pub fn new(dataset: &'d Dataset, iterations: usize) -> Self {
        Self { dataset, iterations: iterations.max(1) }
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Run one workload to completion
    pub fn run(&self, workload: Workload) -> WorkloadResult {
        let (elapsed, aggregate) = match (workload.strategy, workload.shape) {
            (Strategy::OrderedIndex, Shape::CountOnly) => self.measure::<OrderedIndexLookup, CountTotals>(),
            (Strategy::HashIndex, Shape::CountOnly) => self.measure::<HashIndexLookup, CountTotals>(),
            (Strategy::DirectReference, Shape::CountOnly) => self.measure::<DirectReference, CountTotals>(),
            (Strategy::OrderedIndex, Shape::StringAccumulation) => {
                self.measure::<OrderedIndexLookup, Concatenation>()
            }
            (Strategy::HashIndex, Shape::StringAccumulation) => {
                self.measure::<HashIndexLookup, Concatenation>()
            }
            (Strategy::DirectReference, Shape::StringAccumulation) => {
                self.measure::<DirectReference, Concatenation>()
            }
        };

        debug!(
            workload = workload.label(),
            elapsed_ms = elapsed.as_millis() as u64,
            aggregate = %aggregate,
            "Workload finished"
        );
        WorkloadResult::new(workload, elapsed, aggregate)
    }

    /// Run all six workloads in their fixed order
    #[instrument(skip(self), fields(iterations = self.iterations, answers = self.dataset.answers().len()))]
    pub fn run_all(&self) -> BenchReport {
        info!("Running traversal workloads");
        let results = Workload::ORDER.iter().map(|&workload| self.run(workload)).collect();
        BenchReport::new(self.iterations, self.dataset.stats(), results)
    }

    fn measure<R, A>(&self) -> (Duration, Aggregate)
    where
        R: QuestionResolver,
        A: Accumulator,
    {
        let mut acc = A::default();

        let start = Instant::now();
        traverse::<R, A>(self.dataset, self.iterations, &mut acc);
        let elapsed = start.elapsed();

        (elapsed, black_box(acc.finish()))
    }
}
