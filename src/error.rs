//! Typed failures raised while preparing a reconciliation run.
//!
//! The engine itself never fails; every variant here originates in the loader,
//! the correspondence builder or the interactive prompts.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("column '{column}' not found in {source_label}")]
    ColumnNotFound {
        source_label: String,
        column: String,
    },
    #[error(
        "{path:?} is {size} bytes which exceeds the maximum of {} MiB",
        .limit / (1024 * 1024)
    )]
    SourceTooLarge { path: PathBuf, size: u64, limit: u64 },
    #[error("unable to read {path:?}: {reason}")]
    SourceUnreadable { path: PathBuf, reason: String },
}

impl LoadError {
    pub(crate) fn unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        LoadError::SourceUnreadable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrespondenceError {
    #[error("at least one column pair is required")]
    Empty,
    #[error("column name {position} is blank")]
    BlankColumn { position: usize },
    #[error("{first} column(s) listed for the first source but {second} for the second")]
    LengthMismatch { first: usize, second: usize },
}

/// Answers the prompts reject and ask again for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("File path cannot be empty. Please try again.")]
    EmptyPath,
    #[error("Column name cannot be empty. Please try again.")]
    EmptyColumnName,
    #[error("Please enter yes or no.")]
    NotYesNo(String),
    #[error("Invalid number. Please enter a valid integer.")]
    InvalidNumber(String),
    #[error("Number of columns must be greater than 0. Please try again.")]
    NonPositiveCount(i64),
}
