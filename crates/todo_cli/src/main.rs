//! `todo` command-line front end.
//!
//! # Responsibility
//! - Map sub-commands and positional arguments onto `TodoService` calls.
//! - Resolve the store location against the current directory before
//!   handing an absolute path to core.
//! - Print user-facing messages; "not found" outcomes exit successfully.

mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use todo_core::{
    default_log_level, init_logging, CsvTodoRepository, MutationOutcome, StoreConfig,
    TodoService, DEFAULT_DATA_DIR_NAME, DEFAULT_DATA_FILE_NAME,
};

use crate::render::{render_todo_table, NO_TODOS_MESSAGE};

#[derive(Debug, Parser)]
#[command(name = "todo")]
#[command(about = "Todo management CLI", version)]
struct Cli {
    /// Store file; relative paths resolve against the current directory.
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    /// Absolute directory for rolling log files. Logging is off without it.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add a todo item.
    Create { text: String },
    /// Show all todo items.
    Read,
    /// Replace the text of a todo item.
    Update {
        id: String,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Remove a todo item.
    Delete { id: String },
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let config = StoreConfig::new(resolve_data_file(&cwd, cli.data_file.as_deref()))
        .context("invalid store location")?;
    info!(
        "event=cli_start module=cli status=ok data_file={}",
        config.data_file().display()
    );

    let service = TodoService::new(CsvTodoRepository::new(config));
    match cli.command {
        Command::Create { text } => run_create(&service, &text),
        Command::Read => run_read(&service),
        Command::Update { id, text } => run_update(&service, &id, &text.join(" ")),
        Command::Delete { id } => run_delete(&service, &id),
    }
}

/// `<cwd>/data/todos.csv` unless overridden; relative overrides join `cwd`.
fn resolve_data_file(cwd: &Path, data_file: Option<&Path>) -> PathBuf {
    match data_file {
        Some(path) => cwd.join(path),
        None => cwd.join(DEFAULT_DATA_DIR_NAME).join(DEFAULT_DATA_FILE_NAME),
    }
}

fn run_create(service: &TodoService<CsvTodoRepository>, text: &str) -> Result<()> {
    let todo = service
        .create_todo(text)
        .context("failed to create todo")?;
    println!("Creating todo item: {} (ID: {})", todo.text, todo.id);
    Ok(())
}

fn run_read(service: &TodoService<CsvTodoRepository>) -> Result<()> {
    let listing = service.list_todos().context("failed to read todos")?;
    if !listing.has_records() {
        println!("{NO_TODOS_MESSAGE}");
        return Ok(());
    }
    print!("{}", render_todo_table(&listing));
    println!();
    Ok(())
}

fn run_update(service: &TodoService<CsvTodoRepository>, id: &str, text: &str) -> Result<()> {
    match service
        .update_todo(id, text)
        .context("failed to update todo")?
    {
        MutationOutcome::Applied(update) => {
            println!("Updated todo ID {}:", update.id);
            println!("  Old: {}", update.old_text);
            println!("  New: {}", update.new_text);
        }
        MutationOutcome::NotFound => println!("Todo with ID {id} does not exist!"),
        MutationOutcome::EmptyStore => println!("{NO_TODOS_MESSAGE}"),
    }
    Ok(())
}

fn run_delete(service: &TodoService<CsvTodoRepository>, id: &str) -> Result<()> {
    match service.delete_todo(id).context("failed to delete todo")? {
        MutationOutcome::Applied(removed) => {
            for todo in removed {
                println!("Deleted todo ID {}: {}", todo.id, todo.text);
            }
        }
        MutationOutcome::NotFound => println!("Todo with ID {id} does not exist!"),
        MutationOutcome::EmptyStore => println!("{NO_TODOS_MESSAGE}"),
    }
    Ok(())
}
