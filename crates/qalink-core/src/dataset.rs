//! The benchmark context
//!
//! [`Dataset`] owns the record arenas and the indexes over them. It is assembled once
//! (index, then associate) and is read-only afterwards; every workload borrows it
//! immutably.

use crate::association::{LinkStats, resolve_answer_questions, resolve_question_tags};
use crate::config::DataSources;
use crate::index::Indexes;
use crate::loader::read_table;
use qalink_types::{Answer, Question, QuestionRef, Tag, TagLink, TagRef};
use serde::Serialize;
use std::borrow::Borrow;
use tracing::{info, instrument};

/// Sizes of the assembled dataset and the outcome of link resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    pub questions: usize,
    pub answers: usize,
    pub tags: usize,
    /// Distinct question ids
    pub indexed_questions: usize,
    /// Distinct tag ids
    pub tag_buckets: usize,
    pub tag_links: LinkStats,
    pub answer_links: LinkStats,
}

/// Records, indexes and resolved links for one benchmark run
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    questions: Vec<Question>,
    answers: Vec<Answer>,
    tags: Vec<Tag>,
    indexes: Indexes,
    stats: DatasetStats,
}

impl Dataset {
    /// Build indexes over the records and resolve all links
    #[instrument(skip_all)]
    pub fn assemble<I, L>(
        mut questions: Vec<Question>,
        mut answers: Vec<Answer>,
        tags: Vec<Tag>,
        links: I,
    ) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Borrow<TagLink>,
    {
        let indexes = Indexes::build(&questions, &tags);
        let tag_links = resolve_question_tags(&mut questions, &indexes, links);
        let answer_links = resolve_answer_questions(&mut answers, &indexes);

        let stats = DatasetStats {
            questions: questions.len(),
            answers: answers.len(),
            tags: tags.len(),
            indexed_questions: indexes.question_count(),
            tag_buckets: indexes.tag_bucket_count(),
            tag_links,
            answer_links,
        };

        info!(
            questions = stats.questions,
            answers = stats.answers,
            tags = stats.tags,
            tag_links = tag_links.linked,
            dropped_tag_links = tag_links.dropped,
            linked_answers = answer_links.linked,
            orphan_answers = answer_links.dropped,
            "Assembled dataset"
        );

        Self { questions, answers, tags, indexes, stats }
    }

    /// Load the four sources and assemble them.
    ///
    /// A source that fails to read is reported and contributes whatever rows it produced.
    #[instrument(skip_all)]
    pub fn load(sources: &DataSources) -> Self {
        let questions: Vec<Question> = read_table(&sources.questions);
        let answers: Vec<Answer> = read_table(&sources.answers);
        let tags: Vec<Tag> = read_table(&sources.tags);
        let links: Vec<TagLink> = read_table(&sources.tag_questions);

        Self::assemble(questions, answers, tags, links)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn indexes(&self) -> &Indexes {
        &self.indexes
    }

    pub fn stats(&self) -> DatasetStats {
        self.stats
    }

    #[inline]
    pub fn question(&self, handle: QuestionRef) -> Option<&Question> {
        self.questions.get(handle.slot())
    }

    #[inline]
    pub fn tag(&self, handle: TagRef) -> Option<&Tag> {
        self.tags.get(handle.slot())
    }

    /// Names of the tags attached to `question`, in attachment order
    pub fn tag_names<'a>(&'a self, question: &'a Question) -> impl Iterator<Item = &'a str> + 'a {
        question.tags.iter().filter_map(|&handle| self.tag(handle)).map(|tag| tag.name.as_str())
    }

    /// Question the indexes resolve `id` to (the last one loaded under it)
    pub fn question_by_id(&self, id: &str) -> Option<&Question> {
        self.indexes.hashed_question(id).and_then(|handle| self.question(handle))
    }

    /// Parent question cached on `answer`
    pub fn parent_of(&self, answer: &Answer) -> Option<&Question> {
        answer.question().and_then(|handle| self.question(handle))
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty() && self.answers.is_empty() && self.tags.is_empty()
    }
}
