//! Question and tag indexes
//!
//! Four non-owning lookup structures over the record arenas: an ordered and a hashed map
//! for questions (one handle per id, last write wins) and an ordered and a hashed map for
//! tags (every handle sharing an id, in arena order).

use ahash::AHashMap;
use qalink_types::{Question, QuestionRef, Tag, TagRef};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Lookup structures built once after loading
#[derive(Debug, Clone, Default)]
pub struct Indexes {
    ordered_questions: BTreeMap<String, QuestionRef>,
    hashed_questions: AHashMap<String, QuestionRef>,
    ordered_tags: BTreeMap<String, Vec<TagRef>>,
    hashed_tags: AHashMap<String, Vec<TagRef>>,
}

impl Indexes {
    /// Index `questions` and `tags` by id
    #[instrument(skip_all, fields(questions = questions.len(), tags = tags.len()))]
    pub fn build(questions: &[Question], tags: &[Tag]) -> Self {
        let mut indexes = Self {
            ordered_questions: BTreeMap::new(),
            hashed_questions: AHashMap::with_capacity(questions.len()),
            ordered_tags: BTreeMap::new(),
            hashed_tags: AHashMap::with_capacity(tags.len()),
        };

        for (slot, question) in questions.iter().enumerate() {
            let handle = QuestionRef::new(slot);
            indexes.ordered_questions.insert(question.id.clone(), handle);
            indexes.hashed_questions.insert(question.id.clone(), handle);
        }

        for (slot, tag) in tags.iter().enumerate() {
            let handle = TagRef::new(slot);
            indexes.ordered_tags.entry(tag.id.clone()).or_default().push(handle);
            indexes.hashed_tags.entry(tag.id.clone()).or_default().push(handle);
        }

        debug!(
            question_ids = indexes.hashed_questions.len(),
            tag_ids = indexes.hashed_tags.len(),
            "Built indexes"
        );
        indexes
    }

    /// Ordered-index lookup
    #[inline]
    pub fn ordered_question(&self, id: &str) -> Option<QuestionRef> {
        self.ordered_questions.get(id).copied()
    }

    /// Hash-index lookup
    #[inline]
    pub fn hashed_question(&self, id: &str) -> Option<QuestionRef> {
        self.hashed_questions.get(id).copied()
    }

    /// Every tag handle carrying `id`, from the ordered index
    pub fn ordered_tags(&self, id: &str) -> &[TagRef] {
        self.ordered_tags.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every tag handle carrying `id`, from the hash index
    pub fn hashed_tags(&self, id: &str) -> &[TagRef] {
        self.hashed_tags.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// The handle association rows resolve to: the first tag seen with `id`
    pub fn first_tag(&self, id: &str) -> Option<TagRef> {
        self.hashed_tags(id).first().copied()
    }

    /// Distinct question ids, in key order
    pub fn question_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.ordered_questions.keys().map(String::as_str)
    }

    /// Number of distinct question ids
    pub fn question_count(&self) -> usize {
        self.hashed_questions.len()
    }

    /// Number of distinct tag ids
    pub fn tag_bucket_count(&self) -> usize {
        self.hashed_tags.len()
    }

    /// Check that the ordered and hashed views hold the same entries
    pub fn is_consistent(&self) -> bool {
        self.ordered_questions.len() == self.hashed_questions.len()
            && self
                .ordered_questions
                .iter()
                .all(|(id, handle)| self.hashed_questions.get(id) == Some(handle))
            && self.ordered_tags.len() == self.hashed_tags.len()
            && self.ordered_tags.iter().all(|(id, bucket)| self.hashed_tags.get(id) == Some(bucket))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, title: &str) -> Question {
        Question::new(id, "author", "2016-04-26", title, "body")
    }

    #[test]
    fn test_every_question_indexed_under_its_id() {
        let questions = vec![question("q2", "b"), question("q1", "a")];
        let indexes = Indexes::build(&questions, &[]);

        assert_eq!(indexes.ordered_question("q1"), Some(QuestionRef::new(1)));
        assert_eq!(indexes.hashed_question("q1"), Some(QuestionRef::new(1)));
        assert_eq!(indexes.ordered_question("q2"), Some(QuestionRef::new(0)));
        assert_eq!(indexes.hashed_question("q2"), Some(QuestionRef::new(0)));
        assert_eq!(indexes.hashed_question("q3"), None);
        assert_eq!(indexes.question_ids().collect::<Vec<_>>(), vec!["q1", "q2"]);
        assert!(indexes.is_consistent());
    }

    #[test]
    fn test_duplicate_question_last_write_wins() {
        let questions = vec![question("q1", "first"), question("q1", "second")];
        let indexes = Indexes::build(&questions, &[]);

        assert_eq!(indexes.question_count(), 1);
        assert_eq!(indexes.ordered_question("q1"), Some(QuestionRef::new(1)));
        assert_eq!(indexes.hashed_question("q1"), Some(QuestionRef::new(1)));
    }

    #[test]
    fn test_duplicate_tags_bucketed_in_order() {
        let tags = vec![Tag::new("t1", "perf"), Tag::new("t2", "io"), Tag::new("t1", "speed")];
        let indexes = Indexes::build(&[], &tags);

        assert_eq!(indexes.tag_bucket_count(), 2);
        assert_eq!(indexes.hashed_tags("t1"), &[TagRef::new(0), TagRef::new(2)]);
        assert_eq!(indexes.ordered_tags("t1"), &[TagRef::new(0), TagRef::new(2)]);
        assert_eq!(indexes.first_tag("t1"), Some(TagRef::new(0)));
        assert!(indexes.hashed_tags("t9").is_empty());
        assert_eq!(indexes.first_tag("t9"), None);
    }

    #[test]
    fn test_empty_inputs() {
        let indexes = Indexes::build(&[], &[]);
        assert_eq!(indexes.question_count(), 0);
        assert_eq!(indexes.tag_bucket_count(), 0);
        assert!(indexes.is_consistent());
    }
}
