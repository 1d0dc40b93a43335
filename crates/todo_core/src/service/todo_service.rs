//! Todo use-case service.
//!
//! # Responsibility
//! - Provide the create/read/update/delete entry points used by the CLI.
//! - Accept raw textual ids from callers and wrap them as `TodoId`.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::todo::{MutationOutcome, Todo, TodoId, TodoListResult, TodoUpdate};
use crate::repo::todo_repo::{StoreResult, TodoRepository};
use log::debug;

/// Use-case service wrapper for todo CRUD operations.
pub struct TodoService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Appends a todo and returns it with its allocated id.
    pub fn create_todo(&self, text: impl AsRef<str>) -> StoreResult<Todo> {
        let text = text.as_ref();
        debug!(
            "event=todo_create module=service status=start text_len={}",
            text.chars().count()
        );
        self.repo.create_todo(text)
    }

    /// Lists stored todos in file order.
    ///
    /// # Contract
    /// - `has_records() == false` when the store is absent or header-only.
    pub fn list_todos(&self) -> StoreResult<TodoListResult> {
        debug!("event=todo_list module=service status=start");
        self.repo.list_todos()
    }

    /// Replaces the text of the first todo whose id equals `id`.
    ///
    /// # Contract
    /// - `id` is compared textually, exactly as given.
    /// - Later rows with the same id are left untouched.
    pub fn update_todo(
        &self,
        id: &str,
        text: impl AsRef<str>,
    ) -> StoreResult<MutationOutcome<TodoUpdate>> {
        let id = TodoId::new(id);
        debug!("event=todo_update module=service status=start id={id}");
        self.repo.update_todo(&id, text.as_ref())
    }

    /// Deletes every todo whose id equals `id`.
    pub fn delete_todo(&self, id: &str) -> StoreResult<MutationOutcome<Vec<Todo>>> {
        let id = TodoId::new(id);
        debug!("event=todo_delete module=service status=start id={id}");
        self.repo.delete_todo(&id)
    }
}
