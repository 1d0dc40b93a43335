//! Todo domain model.
//!
//! # Responsibility
//! - Define the canonical `{id, text}` record.
//! - Keep identifiers opaque at the public boundary.
//!
//! # Invariants
//! - `TodoId` equality is textual; `"01"` and `"1"` are different ids.
//! - Numeric interpretation of an id is only used for next-id allocation.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Opaque identifier token for a todo record.
///
/// Holds the textual form exactly as supplied by the caller or read from the
/// store file, so lookups compare what the user typed against what is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Wraps a textual identifier without validation.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Parses the identifier as an allocated sequence number.
    ///
    /// Surrounding whitespace and a leading `+` are accepted; anything else
    /// that is not an unsigned integer returns `None`.
    pub fn as_number(&self) -> Option<u64> {
        self.0.trim().parse().ok()
    }
}

impl From<u64> for TodoId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for TodoId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Display for TodoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Canonical todo record.
///
/// Field names double as the persisted header row (`id,todo`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    /// Free-form text; may contain commas, quotes and line breaks.
    #[serde(rename = "todo")]
    pub text: String,
}

impl Todo {
    pub fn new(id: impl Into<TodoId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Payload of an applied text update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoUpdate {
    pub id: TodoId,
    pub old_text: String,
    pub new_text: String,
}

/// Result of a mutation addressed by id.
///
/// `EmptyStore` and `NotFound` both mean "nothing changed", but callers word
/// them differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome<T> {
    /// The store file was rewritten with the change applied.
    Applied(T),
    /// The store has data rows but none carries the requested id.
    NotFound,
    /// The store file is absent, empty, or header-only.
    EmptyStore,
}

impl<T> MutationOutcome<T> {
    /// Returns whether the store was modified.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::NotFound | Self::EmptyStore => None,
        }
    }
}

/// List result envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoListResult {
    /// Well-formed records in file order.
    pub items: Vec<Todo>,
    /// Data rows dropped because they had fewer than two fields.
    pub skipped_rows: usize,
}

impl TodoListResult {
    /// `false` is the "no records" signal: the store is absent or header-only.
    pub fn has_records(&self) -> bool {
        !self.items.is_empty() || self.skipped_rows > 0
    }
}

#[cfg(test)]
mod tests {
    use super::{MutationOutcome, TodoId, TodoListResult};

    #[test]
    fn todo_id_compares_textually() {
        assert_ne!(TodoId::new("01"), TodoId::new("1"));
        assert_eq!(TodoId::from(7_u64), TodoId::new("7"));
    }

    #[test]
    fn todo_id_numeric_view_rejects_non_numbers() {
        assert_eq!(TodoId::new("42").as_number(), Some(42));
        assert_eq!(TodoId::new(" 7 ").as_number(), Some(7));
        assert_eq!(TodoId::new("+5").as_number(), Some(5));
        assert_eq!(TodoId::new("abc").as_number(), None);
        assert_eq!(TodoId::new("-3").as_number(), None);
        assert_eq!(TodoId::new("").as_number(), None);
    }

    #[test]
    fn mutation_outcome_reports_applied_only_for_applied() {
        assert!(MutationOutcome::Applied(()).is_applied());
        assert!(!MutationOutcome::<()>::NotFound.is_applied());
        assert!(!MutationOutcome::<()>::EmptyStore.is_applied());
        assert_eq!(MutationOutcome::Applied(3).applied(), Some(3));
    }

    #[test]
    fn empty_list_result_signals_no_records() {
        assert!(!TodoListResult::default().has_records());
        let only_malformed = TodoListResult {
            items: Vec::new(),
            skipped_rows: 1,
        };
        assert!(only_malformed.has_records());
    }
}
