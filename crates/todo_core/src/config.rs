//! Store location configuration.
//!
//! # Responsibility
//! - Carry the absolute path of the todo store file into the store layer.
//! - Keep current-directory resolution out of core.
//!
//! # Invariants
//! - `StoreConfig::data_file` is always absolute and non-empty.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Directory name used by the CLI default location.
pub const DEFAULT_DATA_DIR_NAME: &str = "data";
/// File name of the store inside its data directory.
pub const DEFAULT_DATA_FILE_NAME: &str = "todos.csv";

/// Invalid store location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyPath,
    RelativePath(PathBuf),
    MissingFileName(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPath => write!(f, "store path cannot be empty"),
            Self::RelativePath(path) => write!(
                f,
                "store path must be an absolute path, got `{}`",
                path.display()
            ),
            Self::MissingFileName(path) => write!(
                f,
                "store path must name a file, got `{}`",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {}

/// Explicit store handle configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    data_file: PathBuf,
}

impl StoreConfig {
    /// Builds a config for one store file.
    ///
    /// # Errors
    /// - Returns `EmptyPath` when `data_file` is empty.
    /// - Returns `RelativePath` when `data_file` is not absolute.
    /// - Returns `MissingFileName` when `data_file` is a root or ends in `..`.
    pub fn new(data_file: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let data_file = data_file.into();
        if data_file.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath);
        }
        if !data_file.is_absolute() {
            return Err(ConfigError::RelativePath(data_file));
        }
        if data_file.file_name().is_none() {
            return Err(ConfigError::MissingFileName(data_file));
        }
        Ok(Self { data_file })
    }

    /// Builds a config for `<data_dir>/todos.csv`.
    pub fn in_data_dir(data_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::new(data_dir.as_ref().join(DEFAULT_DATA_FILE_NAME))
    }

    pub fn data_file(&self) -> &Path {
        self.data_file.as_path()
    }

    /// Directory holding the store file and its rewrite temporaries.
    pub fn data_dir(&self) -> &Path {
        // An absolute path with a file name always has a parent.
        self.data_file.parent().unwrap_or(self.data_file.as_path())
    }
}
