//! Workload shapes and their aggregates
//!
//! A workload pairs a [`Strategy`] with a [`Shape`]. The count-only shape measures little
//! more than the lookup itself; the string shape adds realistic work per matched question
//! by concatenating its title, body and tag names.

use crate::dataset::Dataset;
use crate::strategy::{QuestionResolver, Strategy};
use qalink_types::Question;
use serde::Serialize;
use std::fmt;
use std::hint::black_box;

/// What a traversal accumulates for each visited answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    CountOnly,
    StringAccumulation,
}

/// Totals gathered by the count-only shape
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CountTotals {
    /// Every visited answer
    pub answers: usize,
    /// Answers whose question resolved
    pub questions: usize,
    /// Tags attached to resolved questions
    pub tags: usize,
}

/// Terminal value of a workload, kept observable so the traversal is not optimised out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregate {
    Counts(CountTotals),
    ResultLength(usize),
}

impl Aggregate {
    pub fn is_zero(&self) -> bool {
        match self {
            Aggregate::Counts(totals) => *totals == CountTotals::default(),
            Aggregate::ResultLength(len) => *len == 0,
        }
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregate::Counts(t) => write!(
                f,
                "Total answers: {}, total questions: {}, total tags: {}",
                t.answers, t.questions, t.tags
            ),
            Aggregate::ResultLength(len) => write!(f, "Result length: {len}"),
        }
    }
}

/// Per-answer accumulation for one shape
pub trait Accumulator: Default {
    const SHAPE: Shape;

    /// Record one visited answer and its resolved question, if any
    fn visit(&mut self, dataset: &Dataset, question: Option<&Question>);

    fn finish(self) -> Aggregate;
}

impl Accumulator for CountTotals {
    const SHAPE: Shape = Shape::CountOnly;

    #[inline]
    fn visit(&mut self, _dataset: &Dataset, question: Option<&Question>) {
        self.answers += 1;
        if let Some(question) = question {
            self.questions += 1;
            self.tags += question.tags.len();
        }
    }

    fn finish(self) -> Aggregate {
        Aggregate::Counts(self)
    }
}

/// Concatenation of title, body and tag names of every resolved question
#[derive(Debug, Clone, Default)]
pub struct Concatenation {
    buffer: String,
}

impl Concatenation {
    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}

impl Accumulator for Concatenation {
    const SHAPE: Shape = Shape::StringAccumulation;

    #[inline]
    fn visit(&mut self, dataset: &Dataset, question: Option<&Question>) {
        if let Some(question) = question {
            self.buffer.push_str(&question.title);
            self.buffer.push_str(&question.body);
            for name in dataset.tag_names(question) {
                self.buffer.push_str(name);
            }
        }
    }

    fn finish(self) -> Aggregate {
        Aggregate::ResultLength(self.buffer.len())
    }
}

/// One of the six benchmark workloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Workload {
    pub strategy: Strategy,
    pub shape: Shape,
}

impl Workload {
    /// Execution order: every strategy count-only, then every strategy with strings
    pub const ORDER: [Workload; 6] = [
        Workload::new(Strategy::OrderedIndex, Shape::CountOnly),
        Workload::new(Strategy::HashIndex, Shape::CountOnly),
        Workload::new(Strategy::DirectReference, Shape::CountOnly),
        Workload::new(Strategy::OrderedIndex, Shape::StringAccumulation),
        Workload::new(Strategy::HashIndex, Shape::StringAccumulation),
        Workload::new(Strategy::DirectReference, Shape::StringAccumulation),
    ];

    pub const fn new(strategy: Strategy, shape: Shape) -> Self {
        Self { strategy, shape }
    }

    /// Label printed in front of the timing line
    pub fn label(&self) -> &'static str {
        match (self.shape, self.strategy) {
            (Shape::CountOnly, Strategy::OrderedIndex) => "Map index",
            (Shape::CountOnly, Strategy::HashIndex) => "Unordered map index",
            (Shape::CountOnly, Strategy::DirectReference) => "Direct pointer",
            (Shape::StringAccumulation, Strategy::OrderedIndex) => "String concat map index",
            (Shape::StringAccumulation, Strategy::HashIndex) => {
                "String concat unordered_map index"
            }
            (Shape::StringAccumulation, Strategy::DirectReference) => {
                "String concat direct pointer"
            }
        }
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Visit every answer `iterations` times in source order, resolving through `R`
#[inline(never)]
pub fn traverse<R, A>(dataset: &Dataset, iterations: usize, acc: &mut A)
where
    R: QuestionResolver,
    A: Accumulator,
{
    let resolver = R::default();
    for _ in 0..iterations {
        for answer in dataset.answers() {
            let question = black_box(resolver.resolve(dataset, answer));
            acc.visit(dataset, question);
        }
    }
}

/// Single untimed pass; convenient for checking aggregates
pub fn single_pass<R, A>(dataset: &Dataset) -> Aggregate
where
    R: QuestionResolver,
    A: Accumulator,
{
    let mut acc = A::default();
    traverse::<R, A>(dataset, 1, &mut acc);
    acc.finish()
}
