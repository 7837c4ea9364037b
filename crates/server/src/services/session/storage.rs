//! Where the signed-in user is persisted between restarts.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use inventrak_core::user::User;

use super::StorageError;

/// Key of the single persisted record.
pub const SESSION_KEY: &str = "inventrak_user";

/// Backing store for the one session record.
pub trait SessionStorage: Send + Sync {
    /// Read the record, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on I/O failure or an unreadable record.
    fn load(&self) -> Result<Option<User>, StorageError>;

    /// Overwrite the record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be written.
    fn save(&self, user: &User) -> Result<(), StorageError>;

    /// Delete the record. Deleting a missing record is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record exists but cannot be removed.
    fn clear(&self) -> Result<(), StorageError>;
}

/// JSON file at `<dir>/inventrak_user.json`.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{SESSION_KEY}.json")),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<User>, StorageError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, user: &User) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        // Write then rename so a crash never leaves a half-written record.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(user)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process storage, for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    record: Mutex<Option<User>>,
}

impl MemorySessionStorage {
    #[must_use]
    pub fn with_user(user: User) -> Self {
        Self {
            record: Mutex::new(Some(user)),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<User>> {
        self.record
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Option<User>, StorageError> {
        Ok(self.slot().clone())
    }

    fn save(&self, user: &User) -> Result<(), StorageError> {
        *self.slot() = Some(user.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.slot() = None;
        Ok(())
    }
}
