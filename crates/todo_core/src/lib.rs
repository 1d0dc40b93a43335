//! Core logic for the todo CLI.
//! This crate owns the todo store file and every invariant on it.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreConfig, DEFAULT_DATA_DIR_NAME, DEFAULT_DATA_FILE_NAME};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::todo::{MutationOutcome, Todo, TodoId, TodoListResult, TodoUpdate};
pub use repo::todo_repo::{
    CsvTodoRepository, StoreError, StoreResult, TodoRepository, HEADER_FIELDS,
};
pub use service::todo_service::TodoService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
