use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

// 1. KeyValueStore Contract
/// KeyValueStore
///
/// Defines the abstract contract for the durable, flat, string-keyed storage that
/// backs the session fields. This trait allows us to swap the concrete
/// implementation—from the real file-backed store (FileStore) in production to the
/// in-memory mock (MemoryStore) during testing—without affecting the Session Store.
///
/// Keys live in a single flat namespace; an absent key is indistinguishable from a
/// never-written one.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a single value. Returns None when the key has never been written or
    /// has been removed.
    async fn get(&self, key: &str) -> Option<String>;

    /// Writes a single value, overwriting any previous one. The value must be
    /// durable once this returns Ok.
    async fn set(&self, key: &str, value: &str) -> Result<(), String>;

    /// Removes a key. Removing an absent key is a no-op and still returns Ok.
    async fn remove(&self, key: &str) -> Result<(), String>;
}

// 2. The Real Implementation (file-backed)
/// FileStore
///
/// The concrete implementation persisting all keys as a single JSON object in one
/// file. The full map is held in memory and the file is rewritten on every
/// mutation, so a read never touches the disk after open and a mutation is durable
/// as soon as it returns.
///
/// Writes are whole-file and non-transactional; concurrent external writers are
/// not supported.
pub struct FileStore {
    path: PathBuf,
    cells: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// open
    ///
    /// Loads the backing file if it exists, or starts from an empty map if it does
    /// not. A present-but-unparsable file is an error: silently discarding state
    /// would masquerade as a cleared session.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref().to_path_buf();

        let cells = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str::<HashMap<String, String>>(&raw)
                .map_err(|e| format!("corrupt session file {}: {}", path.display(), e))?,
            // Missing file is the first-run case: an empty store.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(format!("cannot read {}: {}", path.display(), e)),
        };

        Ok(Self {
            path,
            cells: RwLock::new(cells),
        })
    }

    /// Serializes the current map and rewrites the backing file.
    /// Called with the write lock held so file contents always match the map.
    async fn flush(&self, cells: &HashMap<String, String>) -> Result<(), String> {
        let raw = serde_json::to_string_pretty(cells).map_err(|e| e.to_string())?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| format!("cannot write {}: {}", self.path.display(), e))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.cells.read().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let mut cells = self.cells.write().await;
        cells.insert(key.to_string(), value.to_string());
        self.flush(&cells).await
    }

    async fn remove(&self, key: &str) -> Result<(), String> {
        let mut cells = self.cells.write().await;
        // Rewrite only when something actually changed.
        if cells.remove(key).is_some() {
            self.flush(&cells).await?;
        }
        Ok(())
    }
}

// 3. The Mock Implementation (For Unit Tests)
/// MemoryStore
///
/// A mock implementation of `KeyValueStore` used exclusively for unit and
/// integration testing. It keeps everything in memory and can be switched into a
/// failing mode to exercise the persistence-failure paths of the Session Store and
/// its handlers.
#[derive(Default)]
pub struct MemoryStore {
    cells: RwLock<HashMap<String, String>>,
    /// When true, all mutations return a simulated failure. Reads keep working so
    /// the divergence between memory and "disk" is observable.
    pub should_fail: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            cells: RwLock::new(HashMap::new()),
            should_fail: true,
        }
    }

    /// Pre-populates a key, bypassing the failure switch. Used by tests to seed
    /// persisted state before the store under test is constructed.
    pub async fn seed(&self, key: &str, value: &str) {
        self.cells
            .write()
            .await
            .insert(key.to_string(), value.to_string());
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.cells.read().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), String> {
        if self.should_fail {
            return Err("Mock Storage Error: Simulation requested".to_string());
        }
        self.cells
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), String> {
        if self.should_fail {
            return Err("Mock Storage Error: Simulation requested".to_string());
        }
        self.cells.write().await.remove(key);
        Ok(())
    }
}

/// StorageState
///
/// The concrete type used to share the storage backend across the application state.
pub type StorageState = Arc<dyn KeyValueStore>;
