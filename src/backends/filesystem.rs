use super::{BackendError, NoteError, Result, StorageBackend};
use log::{debug, trace, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Stores every key as its own `<key>.json` file inside one directory
#[derive(Debug)]
pub struct FilesystemBackend {
    dir: PathBuf,
}

impl FilesystemBackend {
    /// Creates a new `FilesystemBackend` rooted at `path`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::DirectoryCreationError` if the directory cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let dir = path.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(BackendError::DirectoryCreationError)?;
        debug!("Using filesystem storage at '{}'", dir.display());
        Ok(Self { dir })
    }

    // Only plain names, so a key can never escape the storage directory
    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(self.dir.join(format!("{key}.json")))
        } else {
            Err(NoteError::Backend(BackendError::InvalidKey(key.to_string())))
        }
    }
}

impl StorageBackend for FilesystemBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => {
                trace!("Read {} bytes from '{}'", value.len(), path.display());
                Ok(Some(value))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BackendError::FileReadError(e).into()),
        }
    }

    /// Writes to a temporary sibling first and renames it over the old file,
    /// so a crash mid-write never leaves a truncated blob behind.
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(BackendError::FileWriteError)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                warn!("Could not remove '{}': {cleanup}", tmp.display());
            }
            return Err(BackendError::FileWriteError(e).into());
        }
        trace!("Wrote {} bytes to '{}'", value.len(), path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BackendError::FileRemoveError(e).into()),
        }
    }
}
