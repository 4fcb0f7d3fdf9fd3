//! Persistent storage for the session's two string slots.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;

use crate::error::{DriveError, Result};

/// Named slot in a [`SessionStorage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Raw bearer token.
    Token,
    /// JSON-serialized user profile.
    User,
}

impl Slot {
    pub fn key(&self) -> &'static str {
        match self {
            Slot::Token => "auth_token",
            Slot::User => "auth_user",
        }
    }
}

/// Backend keeping the session across process restarts.
///
/// Implementations must be cheap to call; the store hits them on every
/// login, logout and profile update.
pub trait SessionStorage: Send + Sync {
    fn get(&self, slot: Slot) -> Result<Option<String>>;

    fn set(&self, slot: Slot, value: &str) -> Result<()>;

    fn remove(&self, slot: Slot) -> Result<()>;
}

/// Volatile storage, for tests and short-lived tools.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<Slot, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Slot, String>>> {
        self.slots
            .lock()
            .map_err(|_| DriveError::Storage("memory storage poisoned".to_string()))
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, slot: Slot) -> Result<Option<String>> {
        Ok(self.lock()?.get(&slot).cloned())
    }

    fn set(&self, slot: Slot, value: &str) -> Result<()> {
        self.lock()?.insert(slot, value.to_string());
        Ok(())
    }

    fn remove(&self, slot: Slot) -> Result<()> {
        self.lock()?.remove(&slot);
        Ok(())
    }
}

/// Storage backed by a small JSON file (`{"auth_token": ..., "auth_user": ...}`).
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    guard: Mutex<()>,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            guard: Mutex::new(()),
        }
    }

    /// Per-user data directory, e.g. `~/.local/share/drivelib/session.json`.
    pub fn default_location() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "drivelib")
            .ok_or_else(|| DriveError::Storage("No home directory found".to_string()))?;
        Ok(Self::new(dirs.data_dir().join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let json = std::fs::read_to_string(&self.path)
            .map_err(|e| DriveError::Storage(format!("Read error: {}", e)))?;
        if json.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&json).map_err(|e| DriveError::Storage(format!("Parse error: {}", e)))
    }

    fn write_map(&self, map: &HashMap<String, String>) -> Result<()> {
        if map.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path)
                    .map_err(|e| DriveError::Storage(format!("Remove error: {}", e)))?;
            }
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DriveError::Storage(format!("Create dir error: {}", e)))?;
        }
        let json = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, json)
            .map_err(|e| DriveError::Storage(format!("Write error: {}", e)))
    }

    fn update(&self, f: impl FnOnce(&mut HashMap<String, String>)) -> Result<()> {
        let _guard = self
            .guard
            .lock()
            .map_err(|_| DriveError::Storage("file storage poisoned".to_string()))?;
        // A corrupt file is replaced rather than blocking logout.
        let mut map = self.read_map().unwrap_or_default();
        f(&mut map);
        self.write_map(&map)
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, slot: Slot) -> Result<Option<String>> {
        Ok(self.read_map()?.remove(slot.key()))
    }

    fn set(&self, slot: Slot, value: &str) -> Result<()> {
        self.update(|map| {
            map.insert(slot.key().to_string(), value.to_string());
        })
    }

    fn remove(&self, slot: Slot) -> Result<()> {
        self.update(|map| {
            map.remove(slot.key());
        })
    }
}
