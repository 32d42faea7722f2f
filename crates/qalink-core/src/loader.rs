//! CSV loader adapter
//!
//! Turns a CSV file into an ordered `Vec` of records. Each data row is exposed to a factory
//! as a [`Row`], a mapping from column name to string value. A failing source never aborts
//! the run: the loader stops at the first error and hands back what it read so far.

use crate::error::LoadError;
use ahash::AHashMap;
use qalink_types::{Answer, Question, Tag, TagLink};
use std::fs::File;
use std::path::Path;
use tracing::{debug, error, instrument};

/// Header positions for one source
#[derive(Debug, Clone, Default)]
pub struct Columns {
    positions: AHashMap<String, usize>,
}

impl Columns {
    /// Index a header record. A repeated name keeps its first position.
    pub fn new<'h>(headers: impl IntoIterator<Item = &'h str>) -> Self {
        let mut positions = AHashMap::new();
        for (idx, name) in headers.into_iter().enumerate() {
            positions.entry(name.trim().to_string()).or_insert(idx);
        }
        Self { positions }
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// One data row viewed through its source's header
#[derive(Debug, Clone, Copy)]
pub struct Row<'r> {
    table: &'static str,
    columns: &'r Columns,
    record: &'r csv::StringRecord,
}

impl<'r> Row<'r> {
    pub fn new(table: &'static str, columns: &'r Columns, record: &'r csv::StringRecord) -> Self {
        Self { table, columns, record }
    }

    /// Value of `column` in this row
    pub fn get(&self, column: &'static str) -> Result<&'r str, LoadError> {
        self.columns
            .position(column)
            .and_then(|idx| self.record.get(idx))
            .ok_or(LoadError::MissingColumn { table: self.table, column })
    }

    /// Value of the first column in `columns` present in the header.
    ///
    /// A missing column is reported under the first name.
    pub fn get_any(&self, columns: &[&'static str]) -> Result<&'r str, LoadError> {
        for &column in columns {
            if let Ok(value) = self.get(column) {
                return Ok(value);
            }
        }
        let column = columns.first().copied().unwrap_or_default();
        Err(LoadError::MissingColumn { table: self.table, column })
    }

    pub fn table(&self) -> &'static str {
        self.table
    }
}

/// Records read from one source plus the error that stopped reading, if any
#[derive(Debug)]
pub struct TableLoad<T> {
    pub records: Vec<T>,
    pub error: Option<LoadError>,
}

impl<T> TableLoad<T> {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Report a failure on the error channel and keep the partial records
    pub fn into_reported(self) -> Vec<T> {
        if let Some(e) = &self.error {
            error!(
                table = e.table(),
                category = e.category(),
                records_read = self.records.len(),
                error = %e,
                "Error reading source"
            );
        }
        self.records
    }
}

/// A record type that can be built from one CSV row
pub trait FromRow: Sized {
    /// Logical table name used in diagnostics
    const TABLE: &'static str;

    fn from_row(row: &Row<'_>) -> Result<Self, LoadError>;
}

impl FromRow for Question {
    const TABLE: &'static str = "questions";

    fn from_row(row: &Row<'_>) -> Result<Self, LoadError> {
        Ok(Question::new(
            row.get_any(&["questions_id", "id"])?,
            row.get_any(&["questions_author_id", "author_id"])?,
            row.get_any(&["questions_date_added", "date_added"])?,
            row.get_any(&["questions_title", "title"])?,
            row.get_any(&["questions_body", "body"])?,
        ))
    }
}

impl FromRow for Answer {
    const TABLE: &'static str = "answers";

    fn from_row(row: &Row<'_>) -> Result<Self, LoadError> {
        Ok(Answer::new(
            row.get_any(&["answers_id", "id"])?,
            row.get_any(&["answers_question_id", "question_id"])?,
            row.get_any(&["answers_date_added", "date_added"])?,
            row.get_any(&["answers_body", "body"])?,
        ))
    }
}

impl FromRow for Tag {
    const TABLE: &'static str = "tags";

    fn from_row(row: &Row<'_>) -> Result<Self, LoadError> {
        Ok(Tag::new(
            row.get_any(&["tags_tag_id", "tag_id"])?,
            row.get_any(&["tags_tag_name", "tag_name"])?,
        ))
    }
}

impl FromRow for TagLink {
    const TABLE: &'static str = "tag_questions";

    fn from_row(row: &Row<'_>) -> Result<Self, LoadError> {
        Ok(TagLink::new(
            row.get_any(&["tag_questions_question_id", "question_id"])?,
            row.get_any(&["tag_questions_tag_id", "tag_id"])?,
        ))
    }
}

/// Read `path` row by row through `factory`, preserving row order
#[instrument(skip(path, factory), fields(path = %path.display()))]
pub fn load_table<T, F>(path: &Path, table: &'static str, mut factory: F) -> TableLoad<T>
where
    F: FnMut(&Row<'_>) -> Result<T, LoadError>,
{
    let mut records = Vec::new();
    let error = read_rows(path, table, &mut factory, &mut records).err();
    debug!(records = records.len(), failed = error.is_some(), "Loaded table");
    TableLoad { records, error }
}

/// Read a [`FromRow`] table, reporting any failure and returning the partial result
pub fn read_table<T: FromRow>(path: &Path) -> Vec<T> {
    load_table(path, T::TABLE, T::from_row).into_reported()
}

fn read_rows<T, F>(
    path: &Path,
    table: &'static str,
    factory: &mut F,
    out: &mut Vec<T>,
) -> Result<(), LoadError>
where
    F: FnMut(&Row<'_>) -> Result<T, LoadError>,
{
    let file = File::open(path).map_err(|source| LoadError::Io {
        table,
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);

    let columns = match reader.headers() {
        Ok(headers) => Columns::new(headers.iter()),
        Err(source) => return Err(LoadError::Csv { table, record: 0, source }),
    };

    let mut record = csv::StringRecord::new();
    loop {
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => return Ok(()),
            Err(source) => {
                return Err(LoadError::Csv { table, record: out.len() + 1, source });
            }
        }
        out.push(factory(&Row::new(table, &columns, &record))?);
    }
}
