//! Error handling for notewidget.
//!
//! [`NwError`] is the single error enum for all operations; the crate-wide
//! [`Result`] alias is re-exported from the crate root.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for notewidget operations.
#[derive(Error, Debug)]
pub enum NwError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Destination already exists: {}", .0.display())]
    DestinationConflict(PathBuf),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl NwError {
    /// Whether this error is the lost-the-race outcome of two processes
    /// migrating the same destination.
    #[must_use]
    pub fn is_destination_conflict(&self) -> bool {
        matches!(self, Self::DestinationConflict(_))
    }
}

/// Result type alias using NwError.
pub type Result<T> = std::result::Result<T, NwError>;
