//! Association resolution
//!
//! Applies the question/tag association rows and caches each answer's parent question.
//! Both passes read the finished [`Indexes`], so they must run after indexing. Rows that
//! point at unknown ids are expected noise in the export and are dropped without error.

use crate::index::Indexes;
use qalink_types::{Answer, Question, TagLink};
use serde::Serialize;
use std::borrow::Borrow;
use tracing::{debug, instrument, trace};

/// Outcome of one resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    /// Rows or records that were linked
    pub linked: usize,
    /// Rows or records left unlinked because an id was unknown
    pub dropped: usize,
}

impl LinkStats {
    pub fn total(&self) -> usize {
        self.linked + self.dropped
    }
}

/// Attach tags to questions following the association rows, in row order.
///
/// A row applies only when both its question id and its tag id are indexed. The tag
/// attached is the first one loaded under that id.
#[instrument(skip_all, fields(questions = questions.len()))]
pub fn resolve_question_tags<I, L>(questions: &mut [Question], indexes: &Indexes, links: I) -> LinkStats
where
    I: IntoIterator<Item = L>,
    L: Borrow<TagLink>,
{
    let mut stats = LinkStats::default();

    for link in links {
        let link = link.borrow();
        let target = match (indexes.hashed_question(&link.question_id), indexes.first_tag(&link.tag_id)) {
            (Some(question), Some(tag)) => questions.get_mut(question.slot()).map(|q| (q, tag)),
            _ => None,
        };

        match target {
            Some((question, tag)) => {
                question.tags.push(tag);
                stats.linked += 1;
            }
            None => {
                trace!(question_id = %link.question_id, tag_id = %link.tag_id, "Dropping dangling tag link");
                stats.dropped += 1;
            }
        }
    }

    debug!(linked = stats.linked, dropped = stats.dropped, "Resolved question tags");
    stats
}

/// Cache each answer's parent question from the hash index.
///
/// Answers whose question id is unknown stay unlinked. An answer that already carries a
/// cached question keeps it.
#[instrument(skip_all, fields(answers = answers.len()))]
pub fn resolve_answer_questions(answers: &mut [Answer], indexes: &Indexes) -> LinkStats {
    let mut stats = LinkStats::default();

    for answer in answers.iter_mut() {
        match indexes.hashed_question(&answer.question_id) {
            Some(question) => {
                if let Err(existing) = answer.link_question(question) {
                    debug!(answer_id = %answer.id, %existing, "Answer already linked");
                }
                stats.linked += 1;
            }
            None => stats.dropped += 1,
        }
    }

    debug!(linked = stats.linked, orphaned = stats.dropped, "Resolved answer questions");
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use qalink_types::{QuestionRef, Tag, TagRef};

    fn questions() -> Vec<Question> {
        vec![
            Question::new("q1", "u1", "2016-04-26", "Title one", "Body one"),
            Question::new("q2", "u2", "2016-04-27", "Title two", "Body two"),
        ]
    }

    fn tags() -> Vec<Tag> {
        vec![Tag::new("t1", "perf"), Tag::new("t2", "io"), Tag::new("t1", "speed")]
    }

    #[test]
    fn test_tags_follow_row_order() {
        let mut questions = questions();
        let tags = tags();
        let indexes = Indexes::build(&questions, &tags);

        let links = vec![TagLink::new("q1", "t2"), TagLink::new("q2", "t2"), TagLink::new("q1", "t1")];
        let stats = resolve_question_tags(&mut questions, &indexes, &links);

        assert_eq!(stats, LinkStats { linked: 3, dropped: 0 });
        assert_eq!(questions[0].tags, vec![TagRef::new(1), TagRef::new(0)]);
        assert_eq!(questions[1].tags, vec![TagRef::new(1)]);
    }

    #[test]
    fn test_dangling_links_dropped() {
        let mut questions = questions();
        let tags = tags();
        let indexes = Indexes::build(&questions, &tags);

        let links = vec![TagLink::new("q9", "t1"), TagLink::new("q1", "t9"), TagLink::new("q2", "t1")];
        let stats = resolve_question_tags(&mut questions, &indexes, links);

        assert_eq!(stats, LinkStats { linked: 1, dropped: 2 });
        assert_eq!(stats.total(), 3);
        assert!(questions[0].tags.is_empty());
        assert_eq!(questions[1].tags, vec![TagRef::new(0)]);
    }

    #[test]
    fn test_duplicate_tag_id_uses_first_loaded() {
        let mut questions = questions();
        let tags = tags();
        let indexes = Indexes::build(&questions, &tags);

        resolve_question_tags(&mut questions, &indexes, [TagLink::new("q1", "t1")]);
        assert_eq!(questions[0].tags, vec![TagRef::new(0)]);
        assert_eq!(tags[questions[0].tags[0].slot()].name, "perf");
    }

    #[test]
    fn test_repeated_link_appends_twice() {
        let mut questions = questions();
        let indexes = Indexes::build(&questions, &tags());

        let links = [TagLink::new("q1", "t2"), TagLink::new("q1", "t2")];
        resolve_question_tags(&mut questions, &indexes, links);
        assert_eq!(questions[0].tags, vec![TagRef::new(1), TagRef::new(1)]);
    }

    #[test]
    fn test_answers_linked_through_hash_index() {
        let questions = questions();
        let indexes = Indexes::build(&questions, &[]);
        let mut answers = vec![
            Answer::new("a1", "q2", "2016-04-29", "answer"),
            Answer::new("a2", "q9", "2016-04-29", "orphan"),
        ];

        let stats = resolve_answer_questions(&mut answers, &indexes);

        assert_eq!(stats, LinkStats { linked: 1, dropped: 1 });
        assert_eq!(answers[0].question(), Some(QuestionRef::new(1)));
        assert_eq!(answers[1].question(), None);
    }

    #[test]
    fn test_answers_follow_last_written_question() {
        let questions = vec![
            Question::new("q1", "u1", "2016-04-26", "old", "body"),
            Question::new("q1", "u1", "2016-04-27", "new", "body"),
        ];
        let indexes = Indexes::build(&questions, &[]);
        let mut answers = vec![Answer::new("a1", "q1", "2016-04-29", "answer")];

        resolve_answer_questions(&mut answers, &indexes);
        let linked = answers[0].question().unwrap();
        assert_eq!(questions[linked.slot()].title, "new");
    }

    #[test]
    fn test_second_pass_keeps_existing_link() {
        let questions = questions();
        let indexes = Indexes::build(&questions, &[]);
        let mut answers = vec![Answer::new("a1", "q1", "2016-04-29", "answer")];

        resolve_answer_questions(&mut answers, &indexes);
        resolve_answer_questions(&mut answers, &indexes);
        assert_eq!(answers[0].question(), Some(QuestionRef::new(0)));
    }
}
