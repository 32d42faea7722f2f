//! Answer-to-question resolution strategies
//!
//! Each strategy answers the same question, "which record is this answer's parent?", in a
//! different way: through the ordered index, through the hash index, or by reading the
//! handle cached on the answer. The harness is generic over [`QuestionResolver`] so the
//! choice is made once per workload and the traversal loop is monomorphised.

use crate::dataset::Dataset;
use qalink_types::{Answer, Question};
use serde::Serialize;
use std::fmt;

/// Lookup strategy identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// `BTreeMap` lookup on every visit
    OrderedIndex,
    /// Hash map lookup on every visit
    HashIndex,
    /// Read the handle cached on the answer
    DirectReference,
}

impl Strategy {
    /// All strategies in reporting order
    pub const ALL: [Strategy; 3] =
        [Strategy::OrderedIndex, Strategy::HashIndex, Strategy::DirectReference];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::OrderedIndex => "ordered_index",
            Strategy::HashIndex => "hash_index",
            Strategy::DirectReference => "direct_reference",
        }
    }

    /// Resolve through this strategy without static dispatch
    pub fn resolve<'d>(self, dataset: &'d Dataset, answer: &Answer) -> Option<&'d Question> {
        match self {
            Strategy::OrderedIndex => OrderedIndexLookup.resolve(dataset, answer),
            Strategy::HashIndex => HashIndexLookup.resolve(dataset, answer),
            Strategy::DirectReference => DirectReference.resolve(dataset, answer),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve an answer's parent question
pub trait QuestionResolver: Default {
    const STRATEGY: Strategy;

    fn resolve<'d>(&self, dataset: &'d Dataset, answer: &Answer) -> Option<&'d Question>;
}

/// Looks `question_id` up in the ordered index
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderedIndexLookup;

impl QuestionResolver for OrderedIndexLookup {
    const STRATEGY: Strategy = Strategy::OrderedIndex;

    #[inline]
    fn resolve<'d>(&self, dataset: &'d Dataset, answer: &Answer) -> Option<&'d Question> {
        dataset.indexes().ordered_question(&answer.question_id).and_then(|q| dataset.question(q))
    }
}

/// Looks `question_id` up in the hash index
#[derive(Debug, Clone, Copy, Default)]
pub struct HashIndexLookup;

impl QuestionResolver for HashIndexLookup {
    const STRATEGY: Strategy = Strategy::HashIndex;

    #[inline]
    fn resolve<'d>(&self, dataset: &'d Dataset, answer: &Answer) -> Option<&'d Question> {
        dataset.indexes().hashed_question(&answer.question_id).and_then(|q| dataset.question(q))
    }
}

/// Uses the handle cached on the answer during association
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectReference;

impl QuestionResolver for DirectReference {
    const STRATEGY: Strategy = Strategy::DirectReference;

    #[inline]
    fn resolve<'d>(&self, dataset: &'d Dataset, answer: &Answer) -> Option<&'d Question> {
        answer.question().and_then(|q| dataset.question(q))
    }
}
