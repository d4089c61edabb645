//! Durable token storage
//!
//! Only a single key is ever written: [`TOKEN_KEY`]. Its absence means there
//! is no session to resume.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

use crate::{CoreError, CoreResult};

/// Key under which the session token is persisted
pub const TOKEN_KEY: &str = "token";

/// Durable storage for the session token
pub trait TokenStorage: Send + Sync {
    /// Read the persisted token, `None` when absent
    fn load(&self) -> CoreResult<Option<String>>;

    /// Persist the token, replacing any previous value
    fn store(&self, token: &str) -> CoreResult<()>;

    /// Remove the persisted token
    fn clear(&self) -> CoreResult<()>;
}

/// Token storage that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> CoreResult<Option<String>> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn store(&self, token: &str) -> CoreResult<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> CoreResult<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Token storage backed by a small JSON key/value file
#[derive(Debug)]
pub struct FileTokenStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> CoreResult<Map<String, Value>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&content)? {
            Value::Object(entries) => Ok(entries),
            _ => Err(CoreError::serialization_error(format!(
                "{} does not contain a JSON object",
                self.path.display()
            ))),
        }
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> CoreResult<()> {
        if entries.is_empty() {
            return match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> CoreResult<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let entries = self.read_entries()?;
        Ok(entries
            .get(TOKEN_KEY)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn store(&self, token: &str) -> CoreResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_entries()?;
        entries.insert(TOKEN_KEY.to_string(), Value::String(token.to_string()));
        self.write_entries(&entries)?;
        debug!(path = %self.path.display(), "Stored session token");
        Ok(())
    }

    fn clear(&self) -> CoreResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(CoreError::Serialization { message }) => {
                warn!(path = %self.path.display(), "Removing unreadable token file: {message}");
                Map::new()
            }
            Err(e) => return Err(e),
        };
        if entries.remove(TOKEN_KEY).is_some() || entries.is_empty() {
            self.write_entries(&entries)?;
        }
        debug!(path = %self.path.display(), "Cleared session token");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_round_trip() {
        let storage = MemoryTokenStorage::new();
        assert_eq!(storage.load().unwrap(), None);

        storage.store("t-1").unwrap();
        assert_eq!(storage.load().unwrap().as_deref(), Some("t-1"));

        storage.clear().unwrap();
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let storage = FileTokenStorage::new(&path);

        assert_eq!(storage.load().unwrap(), None);

        storage.store("abc.def").unwrap();
        assert_eq!(storage.load().unwrap().as_deref(), Some("abc.def"));

        // A fresh handle sees the persisted value
        let reopened = FileTokenStorage::new(&path);
        assert_eq!(reopened.load().unwrap().as_deref(), Some("abc.def"));

        storage.clear().unwrap();
        assert_eq!(storage.load().unwrap(), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_file_keeps_other_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let storage = FileTokenStorage::new(&path);
        storage.store("abc").unwrap();
        storage.clear().unwrap();

        let content: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(content, serde_json::json!({ "theme": "dark" }));
    }

    #[test]
    fn test_file_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "[1, 2]").unwrap();

        let err = FileTokenStorage::new(&path).load().unwrap_err();
        assert!(matches!(err, CoreError::Serialization { .. }));
    }

    #[test]
    fn test_clear_removes_unreadable_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let storage = FileTokenStorage::new(&path);
        assert!(storage.load().is_err());

        storage.clear().unwrap();
        assert!(!path.exists());
        assert_eq!(storage.load().unwrap(), None);
    }
}
