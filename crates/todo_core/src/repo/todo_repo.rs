//! Todo repository contract and CSV-file implementation.
//!
//! # Responsibility
//! - Allocate identifiers and append new records.
//! - Rewrite the store file on update/delete while preserving row order.
//! - Parse the store file into records for listing.
//!
//! # Invariants
//! - The header row `id,todo` is written before the first data row.
//! - Rows are rewritten verbatim except for the one mutation applied;
//!   malformed rows survive rewrites and are only skipped when listing.
//! - Next id is derived from the last data row only.
//! - Nothing is rewritten when no row matched.

use crate::config::{ConfigError, StoreConfig};
use crate::model::todo::{MutationOutcome, Todo, TodoId, TodoListResult, TodoUpdate};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::time::Instant;
use tempfile::NamedTempFile;

/// Header row of every store file.
pub const HEADER_FIELDS: [&str; 2] = ["id", "todo"];

const ID_FIELD: usize = 0;
const TEXT_FIELD: usize = 1;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store failure. Absent stores and unknown ids are not errors.
#[derive(Debug)]
pub enum StoreError {
    Config(ConfigError),
    Io(io::Error),
    Csv(csv::Error),
}

impl StoreError {
    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_invalid",
            Self::Io(_) => "io_failed",
            Self::Csv(_) => "csv_failed",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "todo store i/o failed: {err}"),
            Self::Csv(err) => write!(f, "todo store is not valid csv: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Csv(err) => Some(err),
        }
    }
}

impl From<ConfigError> for StoreError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<io::Error> for StoreError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for StoreError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// Repository interface for todo CRUD operations.
pub trait TodoRepository {
    fn create_todo(&self, text: &str) -> StoreResult<Todo>;
    fn list_todos(&self) -> StoreResult<TodoListResult>;
    fn update_todo(&self, id: &TodoId, text: &str) -> StoreResult<MutationOutcome<TodoUpdate>>;
    /// Removes every row carrying `id`; the applied payload lists them in file order.
    fn delete_todo(&self, id: &TodoId) -> StoreResult<MutationOutcome<Vec<Todo>>>;
}

/// CSV-file backed todo repository.
///
/// There is no locking. Two processes mutating the same file race on
/// read-modify-write and the later rewrite wins; a create that lands between
/// another process's read and rewrite is lost. Rewrites go through a
/// temporary file in the same directory, so a crash never leaves a truncated
/// store behind.
#[derive(Debug, Clone)]
pub struct CsvTodoRepository {
    config: StoreConfig,
}

impl CsvTodoRepository {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Reads the raw store bytes; `None` when the file does not exist.
    fn read_bytes(&self) -> StoreResult<Option<Vec<u8>>> {
        match fs::read(self.config.data_file()) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Reads every row including the header; `None` when the file does not exist.
    fn read_rows(&self) -> StoreResult<Option<Vec<StringRecord>>> {
        match self.read_bytes()? {
            Some(bytes) => Ok(Some(parse_rows(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Reads rows for a mutation; `None` when there is nothing to mutate.
    fn read_populated_rows(&self) -> StoreResult<Option<Vec<StringRecord>>> {
        Ok(self.read_rows()?.filter(|rows| rows.len() > 1))
    }

    fn append_todo(&self, text: &str) -> StoreResult<Todo> {
        fs::create_dir_all(self.config.data_dir())?;

        let existing = self.read_bytes()?;
        let (needs_header, needs_line_break, id) = match existing.as_deref() {
            None => (true, false, TodoId::from(1_u64)),
            Some(bytes) => {
                let rows = parse_rows(bytes)?;
                (
                    rows.is_empty(),
                    !bytes.is_empty() && !bytes.ends_with(b"\n"),
                    next_todo_id(&rows, ends_with_blank_row(bytes)),
                )
            }
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.config.data_file())?;
        if needs_line_break {
            file.write_all(b"\r\n")?;
        }

        let todo = Todo::new(id, text);
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if needs_header {
            writer.write_record(HEADER_FIELDS)?;
        }
        writer.serialize(&todo)?;
        writer.flush()?;

        Ok(todo)
    }

    /// Replaces the store file with `rows` through an atomically persisted temp file.
    fn rewrite_rows(&self, rows: &[StringRecord]) -> StoreResult<()> {
        // Replace the symlink target, not the link, and keep its mode.
        let target = fs::canonicalize(self.config.data_file())?;
        let permissions = fs::metadata(&target)?.permissions();
        let dir = target.parent().unwrap_or(self.config.data_dir());

        let temp = NamedTempFile::new_in(dir)?;
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(temp);
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        let temp = writer
            .into_inner()
            .map_err(|err| io::Error::new(err.error().kind(), err.error().to_string()))?;
        temp.as_file().set_permissions(permissions)?;
        temp.as_file().sync_all()?;
        temp.persist(&target)
            .map_err(|err| StoreError::Io(err.error))?;
        Ok(())
    }

    fn replace_first_match(
        &self,
        id: &TodoId,
        text: &str,
    ) -> StoreResult<MutationOutcome<TodoUpdate>> {
        let Some(mut rows) = self.read_populated_rows()? else {
            return Ok(MutationOutcome::EmptyStore);
        };

        let Some(index) = rows
            .iter()
            .skip(1)
            .position(|row| row_matches(row, id))
            .map(|position| position + 1)
        else {
            return Ok(MutationOutcome::NotFound);
        };

        let old_text = rows[index][TEXT_FIELD].to_string();
        let replaced = with_text(&rows[index], text);
        rows[index] = replaced;
        self.rewrite_rows(&rows)?;

        Ok(MutationOutcome::Applied(TodoUpdate {
            id: id.clone(),
            old_text,
            new_text: text.to_string(),
        }))
    }

    fn remove_all_matches(&self, id: &TodoId) -> StoreResult<MutationOutcome<Vec<Todo>>> {
        let Some(rows) = self.read_populated_rows()? else {
            return Ok(MutationOutcome::EmptyStore);
        };

        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            if index > 0 && row_matches(&row, id) {
                removed.push(Todo::new(id.clone(), &row[TEXT_FIELD]));
            } else {
                kept.push(row);
            }
        }

        if removed.is_empty() {
            return Ok(MutationOutcome::NotFound);
        }

        self.rewrite_rows(&kept)?;
        Ok(MutationOutcome::Applied(removed))
    }

    fn collect_todos(&self) -> StoreResult<TodoListResult> {
        let Some(rows) = self.read_rows()? else {
            return Ok(TodoListResult::default());
        };

        let mut result = TodoListResult::default();
        for row in rows.iter().skip(1) {
            match todo_from_row(row) {
                Some(todo) => result.items.push(todo),
                None => result.skipped_rows += 1,
            }
        }
        Ok(result)
    }
}

impl TodoRepository for CsvTodoRepository {
    fn create_todo(&self, text: &str) -> StoreResult<Todo> {
        let started_at = Instant::now();
        match self.append_todo(text) {
            Ok(todo) => {
                info!(
                    "event=todo_create module=repo status=ok id={} duration_ms={}",
                    todo.id,
                    started_at.elapsed().as_millis()
                );
                Ok(todo)
            }
            Err(err) => Err(log_failure("todo_create", started_at, err)),
        }
    }

    fn list_todos(&self) -> StoreResult<TodoListResult> {
        let started_at = Instant::now();
        match self.collect_todos() {
            Ok(result) => {
                debug!(
                    "event=todo_list module=repo status=ok count={} skipped={} duration_ms={}",
                    result.items.len(),
                    result.skipped_rows,
                    started_at.elapsed().as_millis()
                );
                Ok(result)
            }
            Err(err) => Err(log_failure("todo_list", started_at, err)),
        }
    }

    fn update_todo(&self, id: &TodoId, text: &str) -> StoreResult<MutationOutcome<TodoUpdate>> {
        let started_at = Instant::now();
        match self.replace_first_match(id, text) {
            Ok(outcome) => {
                info!(
                    "event=todo_update module=repo status={} id={} duration_ms={}",
                    outcome_status(&outcome),
                    id,
                    started_at.elapsed().as_millis()
                );
                Ok(outcome)
            }
            Err(err) => Err(log_failure("todo_update", started_at, err)),
        }
    }

    fn delete_todo(&self, id: &TodoId) -> StoreResult<MutationOutcome<Vec<Todo>>> {
        let started_at = Instant::now();
        match self.remove_all_matches(id) {
            Ok(outcome) => {
                info!(
                    "event=todo_delete module=repo status={} id={} removed={} duration_ms={}",
                    outcome_status(&outcome),
                    id,
                    removed_count(&outcome),
                    started_at.elapsed().as_millis()
                );
                Ok(outcome)
            }
            Err(err) => Err(log_failure("todo_delete", started_at, err)),
        }
    }
}

/// Computes the next id from the last data row.
///
/// Falls back to `1` when there are no data rows, the file ends in a blank
/// row, or the last id is not an unsigned integer. Ids held by earlier rows
/// are not consulted.
pub(crate) fn next_todo_id(rows: &[StringRecord], last_row_blank: bool) -> TodoId {
    if rows.len() <= 1 || last_row_blank {
        return TodoId::from(1_u64);
    }

    rows.last()
        .and_then(|row| row.get(ID_FIELD))
        .and_then(|value| TodoId::new(value).as_number())
        .and_then(|last| last.checked_add(1))
        .map_or_else(|| TodoId::from(1_u64), TodoId::from)
}

/// Whether the last line of the file is empty.
///
/// The csv reader drops blank lines, so this looks at the raw bytes: after
/// removing the final line terminator, the content still ends in one.
fn ends_with_blank_row(bytes: &[u8]) -> bool {
    let body = bytes
        .strip_suffix(b"\r\n")
        .or_else(|| bytes.strip_suffix(b"\n"))
        .or_else(|| bytes.strip_suffix(b"\r"))
        .unwrap_or(bytes);
    !body.is_empty() && (body.ends_with(b"\n") || body.ends_with(b"\r"))
}

fn parse_rows(bytes: &[u8]) -> StoreResult<Vec<StringRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for row in reader.records() {
        rows.push(row?);
    }
    Ok(rows)
}

fn row_matches(row: &StringRecord, id: &TodoId) -> bool {
    row.len() > TEXT_FIELD && row.get(ID_FIELD) == Some(id.as_str())
}

fn todo_from_row(row: &StringRecord) -> Option<Todo> {
    match (row.get(ID_FIELD), row.get(TEXT_FIELD)) {
        (Some(id), Some(text)) => Some(Todo::new(TodoId::new(id), text)),
        _ => None,
    }
}

fn with_text(row: &StringRecord, text: &str) -> StringRecord {
    row.iter()
        .enumerate()
        .map(|(index, field)| if index == TEXT_FIELD { text } else { field })
        .collect()
}

fn outcome_status<T>(outcome: &MutationOutcome<T>) -> &'static str {
    match outcome {
        MutationOutcome::Applied(_) => "ok",
        MutationOutcome::NotFound => "not_found",
        MutationOutcome::EmptyStore => "empty",
    }
}

fn removed_count(outcome: &MutationOutcome<Vec<Todo>>) -> usize {
    match outcome {
        MutationOutcome::Applied(removed) => removed.len(),
        MutationOutcome::NotFound | MutationOutcome::EmptyStore => 0,
    }
}

fn log_failure(event: &str, started_at: Instant, err: StoreError) -> StoreError {
    error!(
        "event={event} module=repo status=error duration_ms={} error_code={} error={}",
        started_at.elapsed().as_millis(),
        err.code(),
        err
    );
    err
}

#[cfg(test)]
mod tests {
    use super::{ends_with_blank_row, next_todo_id, parse_rows, with_text};
    use crate::model::todo::TodoId;
    use csv::StringRecord;

    fn rows(lines: &[&[&str]]) -> Vec<StringRecord> {
        lines.iter().map(|fields| StringRecord::from(fields.to_vec())).collect()
    }

    #[test]
    fn next_id_starts_at_one_for_empty_or_header_only() {
        assert_eq!(next_todo_id(&[], false), TodoId::new("1"));
        assert_eq!(
            next_todo_id(&rows(&[&["id", "todo"]]), false),
            TodoId::new("1")
        );
    }

    #[test]
    fn next_id_uses_last_row_only() {
        let rows = rows(&[&["id", "todo"], &["9", "a"], &["4", "b"]]);
        assert_eq!(next_todo_id(&rows, false), TodoId::new("5"));
        assert_eq!(next_todo_id(&rows, true), TodoId::new("1"));
    }

    #[test]
    fn next_id_falls_back_to_one_for_unparseable_last_id() {
        let rows = rows(&[&["id", "todo"], &["3", "a"], &["x7", "b"]]);
        assert_eq!(next_todo_id(&rows, false), TodoId::new("1"));
    }

    #[test]
    fn blank_last_row_is_detected_from_raw_bytes() {
        assert!(ends_with_blank_row(b"id,todo\r\n5,a\r\n\r\n"));
        assert!(ends_with_blank_row(b"id,todo\n5,a\n\n"));
        assert!(!ends_with_blank_row(b"id,todo\r\n5,a\r\n"));
        assert!(!ends_with_blank_row(b"id,todo\r\n5,a"));
        assert!(!ends_with_blank_row(b"id,todo\r\n\r\n5,a\r\n"));
        assert!(!ends_with_blank_row(b"id,todo\r\n1,\"x\ny\"\r\n"));
        assert!(!ends_with_blank_row(b""));
    }

    #[test]
    fn parse_rows_handles_quoted_fields_and_crlf() {
        let parsed = parse_rows(b"id,todo\r\n1,\"a, b\"\r\n2,\"line\nbreak\"\r\n").unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(&parsed[1][1], "a, b");
        assert_eq!(&parsed[2][1], "line\nbreak");
    }

    #[test]
    fn with_text_replaces_only_the_text_field() {
        let row = StringRecord::from(vec!["2", "old", "extra"]);
        let replaced = with_text(&row, "new");
        assert_eq!(replaced, StringRecord::from(vec!["2", "new", "extra"]));
    }
}
