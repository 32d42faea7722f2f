use std::cell::OnceCell;
use std::fmt;

/// Position of a [`Question`] inside the question arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuestionRef(usize);

impl QuestionRef {
    /// Wrap an arena position
    #[must_use]
    pub const fn new(slot: usize) -> Self {
        Self(slot)
    }

    /// Arena position this handle points at
    #[must_use]
    pub const fn slot(self) -> usize {
        self.0
    }
}

/// Position of a [`Tag`] inside the tag arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagRef(usize);

impl TagRef {
    /// Wrap an arena position
    #[must_use]
    pub const fn new(slot: usize) -> Self {
        Self(slot)
    }

    /// Arena position this handle points at
    #[must_use]
    pub const fn slot(self) -> usize {
        self.0
    }
}

impl fmt::Display for QuestionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "question#{}", self.0)
    }
}

impl fmt::Display for TagRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tag#{}", self.0)
    }
}

/// A tag row. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag identifier (not guaranteed unique across rows)
    pub id: String,
    /// Display name
    pub name: String,
}

impl Tag {
    /// Create a tag record
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// A question row together with the tags attached to it by the association table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Question identifier
    pub id: String,
    /// Author identifier
    pub author_id: String,
    /// Creation timestamp as exported
    pub date_added: String,
    /// Title text
    pub title: String,
    /// Body text
    pub body: String,
    /// Handles into the tag arena, in association order
    pub tags: Vec<TagRef>,
}

impl Question {
    /// Create a question record with no tags attached
    pub fn new(
        id: impl Into<String>,
        author_id: impl Into<String>,
        date_added: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            author_id: author_id.into(),
            date_added: date_added.into(),
            title: title.into(),
            body: body.into(),
            tags: Vec::new(),
        }
    }
}

/// An answer row.
///
/// `question_id` is authoritative. The cached `question` handle is a shortcut to the same
/// record and can be filled in at most once; later attempts are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    /// Answer identifier
    pub id: String,
    /// Identifier of the parent question
    pub question_id: String,
    /// Creation timestamp as exported
    pub date_added: String,
    /// Body text
    pub body: String,
    question: OnceCell<QuestionRef>,
}

impl Answer {
    /// Create an answer record with no cached question
    pub fn new(
        id: impl Into<String>,
        question_id: impl Into<String>,
        date_added: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            question_id: question_id.into(),
            date_added: date_added.into(),
            body: body.into(),
            question: OnceCell::new(),
        }
    }

    /// Cached handle to the parent question, if it was resolved
    #[inline]
    #[must_use]
    pub fn question(&self) -> Option<QuestionRef> {
        self.question.get().copied()
    }

    /// Cache the parent question handle.
    ///
    /// # Errors
    ///
    /// Returns the already cached handle if one was set before.
    pub fn link_question(&mut self, question: QuestionRef) -> Result<(), QuestionRef> {
        match self.question.get() {
            Some(existing) => Err(*existing),
            None => {
                self.question.get_or_init(|| question);
                Ok(())
            }
        }
    }
}

/// One row of the question/tag association table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLink {
    /// Question side of the link
    pub question_id: String,
    /// Tag side of the link
    pub tag_id: String,
}

impl TagLink {
    /// Create an association row
    pub fn new(question_id: impl Into<String>, tag_id: impl Into<String>) -> Self {
        Self { question_id: question_id.into(), tag_id: tag_id.into() }
    }
}
