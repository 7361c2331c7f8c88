#![deny(clippy::cargo)]
#![deny(clippy::complexity)]
#![deny(clippy::correctness)]
#![deny(clippy::nursery)]
#![deny(clippy::perf)]
#![deny(clippy::style)]
#![deny(clippy::suspicious)]
#![deny(clippy::pedantic)]

use serde::{Deserialize, Serialize};
use std::io;
use tabled::Tabled;
use thiserror::Error;

pub mod app;
pub mod backends;
pub mod config;
pub mod ids;
pub mod markup;
pub mod palette;
pub mod setup;
pub mod store;
pub mod ui;

pub use app::{NoteSession, Selection};
pub use config::SessionConfig;
pub use store::NoteStore;

// More convenient Result type
pub type Result<T> = std::result::Result<T, NoteError>;

/// A saved note, exactly as it is persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    /// Serialized rich-text markup, opaque to the core
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

// Truncated note data. Displayed in the notes grid
#[derive(Tabled, Debug, Clone, PartialEq, Eq)]
pub struct NotePreview {
    pub id: i64,
    pub color: String,
    pub preview: String,
}

/// Trait to be implemented by all key/value stores that can hold the notes blob
pub trait StorageBackend {
    /// Fetches the value stored under `key`, or `None` if the key was never written
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage could not be read
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing anything already there
    ///
    /// # Errors
    ///
    /// Returns an error if the write was refused or failed
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage could not be modified
    fn remove(&self, key: &str) -> Result<()>;
}

// Enum for all possible session, storage and menu errors
#[derive(Debug, Error)]
pub enum NoteError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Menu(#[from] MenuError),
}

// Enum for all possible menu input errors
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("Failed to read from stdin: {0}")]
    StdinReadError(io::Error),

    #[error("Couldn't convert '{0}' to a number")]
    ParseError(String),

    #[error("There is no menu option with number {0}")]
    InvalidOption(u8),

    #[error("Failed writing to stdout")]
    StdoutWriteError(io::Error),

    #[error("Input closed")]
    EndOfInput,
}

// Enum for all caller-side contract violations of the note session
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Note not found with ID: {0}")]
    NotFound(i64),

    #[error("No note is open")]
    NoSelection,

    #[error("Draft is empty. Write something first")]
    EmptyDraft,

    #[error("No note IDs left. The largest stored ID is already i64::MAX")]
    IdsExhausted,
}

// Enum for all possible storage backend errors
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Failed opening database")]
    DatabaseCreationError,

    #[error("Failed creating `storage` table in database")]
    TableCreationError,

    #[error("Failed creating storage directory")]
    DirectoryCreationError(io::Error),

    #[error("Failed writing storage file")]
    FileWriteError(io::Error),

    #[error("Failed reading storage file")]
    FileReadError(io::Error),

    #[error("Failed removing storage file")]
    FileRemoveError(io::Error),

    #[error("Storage key '{0}' is not usable as a file name")]
    InvalidKey(String),

    #[error("Failed serializing notes")]
    Serialization(serde_json::Error),

    #[error("Storage is full")]
    StorageFull,

    #[error("Backend connection timed out")]
    Timeout,

    #[error("Database file is not a valid SQLite database")]
    NotADatabase,

    #[error("Database schema has changed unexpectedly")]
    SchemaChanged,

    #[error("Insufficient permissions")]
    PermissionDenied,

    #[error(transparent)]
    Other(#[from] anyhow::Error), // Used as fallback
}
