use super::{BackendError, NoteError, Result, StorageBackend};
use log::debug;
use rusqlite::{params, Connection, Error as SqliteError, ErrorCode, OptionalExtension};

/// Key/value storage kept in a single `storage` table
#[derive(Debug)]
pub struct SqliteBackend {
    connection: Connection,
}

impl SqliteBackend {
    /// Creates a new `SqliteBackend` by opening the `SQLite` database at the given path.
    /// Also ensures that the `storage` table exists.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::DatabaseCreationError` if the database cannot be opened and
    /// `BackendError::TableCreationError` if the `storage` table cannot be created.
    pub fn new(path: &str) -> Result<Self> {
        let connection =
            Connection::open(path).map_err(|_| BackendError::DatabaseCreationError)?;
        debug!("Opened SQLite storage at '{path}'");
        Self::with_connection(connection)
    }

    /// Creates a `SqliteBackend` backed by a private in-memory database.
    ///
    /// # Errors
    ///
    /// Same as [`SqliteBackend::new`].
    pub fn in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().map_err(|_| BackendError::DatabaseCreationError)?;
        Self::with_connection(connection)
    }

    fn with_connection(connection: Connection) -> Result<Self> {
        // Create storage table if it doesn't exist
        connection
            .execute(
                "
                CREATE TABLE IF NOT EXISTS storage (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                )
                ",
                [],
            )
            .map_err(|_| BackendError::TableCreationError)?;
        Ok(Self { connection })
    }
}

/// Maps a `rusqlite::Error` into a `NoteError`, wrapping known SQLite-specific codes into domain-specific variants.
///
/// This function is used internally by all database operations.
fn map_sqlite_error(e: SqliteError) -> NoteError {
    match e {
        SqliteError::SqliteFailure(code, _) => match code.code {
            ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => {
                NoteError::Backend(BackendError::Timeout)
            }
            ErrorCode::DiskFull => NoteError::Backend(BackendError::StorageFull),
            ErrorCode::PermissionDenied | ErrorCode::ReadOnly => {
                NoteError::Backend(BackendError::PermissionDenied)
            }
            ErrorCode::NotADatabase => NoteError::Backend(BackendError::NotADatabase),
            ErrorCode::SchemaChanged => NoteError::Backend(BackendError::SchemaChanged),
            _ => NoteError::Backend(BackendError::Other(anyhow::anyhow!(
                "SQLite error: {:?}",
                code
            ))),
        },
        other => NoteError::Backend(BackendError::Other(anyhow::Error::new(other))),
    }
}

impl StorageBackend for SqliteBackend {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns mapped `SQLite` errors if the query fails.
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.connection
            .query_row(
                "SELECT value FROM storage WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()
            .map_err(map_sqlite_error)
    }

    /// Inserts or replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `BackendError::StorageFull` when the disk is full.
    /// - `BackendError::Timeout`, `PermissionDenied`, `NotADatabase`, or other mapped SQLite-specific errors.
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.connection
            .execute(
                "INSERT INTO storage (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(map_sqlite_error)?;
        Ok(())
    }

    /// Deletes the row for `key`. Zero affected rows is fine.
    ///
    /// # Errors
    ///
    /// Returns mapped `SQLite` errors if the deletion fails.
    fn remove(&self, key: &str) -> Result<()> {
        self.connection
            .execute("DELETE FROM storage WHERE key = ?1", [key])
            .map_err(map_sqlite_error)?;
        Ok(())
    }
}
