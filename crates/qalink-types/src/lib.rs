//! qalink Types
//!
//! This crate defines the records loaded from the question/answer export and the arena
//! handles that link them. It is shared by `qalink-core` and the `qalink` binary so that
//! neither has to own the data model.

#![deny(missing_docs)]

mod types;
pub use types::{Answer, Question, QuestionRef, Tag, TagLink, TagRef};
