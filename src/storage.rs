use crate::errors::StorageError;
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::{collections::BTreeMap, path::Path, path::PathBuf, sync::Arc};
use tokio::{fs, sync::Mutex};
use tracing::error;

pub mod keys {
    pub const MISTAKE_BANK: &str = "mistakeBank";
    pub const COMPLETED_CHALLENGES: &str = "completedChallenges";
    pub const DAILY_PROGRESS: &str = "dailyProgress";
    pub const DAILY_CHALLENGES: &str = "dailyChallenges";
    pub const DAILY_PROMPT: &str = "dailyPrompt";
    pub const TENSE_EXAMPLES: &str = "tenseTheoryExamples";
}

/// Durable string-to-string store. Values are opaque to the backend.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get_raw(&self, key: &str) -> Option<String>;
    async fn set_raw(&self, key: &str, value: String) -> Result<(), StorageError>;
}

/// Every key lives in one JSON object on disk, rewritten on each write.
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    pub async fn open(path: PathBuf) -> Self {
        let entries = load_data(&path).await;
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.lock().await.get(key).cloned()
    }

    /// The in-memory map only changes once the file write succeeded.
    async fn set_raw(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        next.insert(key.to_string(), value);
        persist_data(&self.path, &next).await?;
        *entries = next;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.lock().await.get(key).cloned()
    }

    async fn set_raw(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }
}

pub async fn load_data(path: &Path) -> BTreeMap<String, String> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file: {err}");
                BTreeMap::new()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
        Err(err) => {
            error!("failed to read data file: {err}");
            BTreeMap::new()
        }
    }
}

pub async fn persist_data(path: &Path, data: &BTreeMap<String, String>) -> Result<(), StorageError> {
    let payload = serde_json::to_vec_pretty(data).map_err(|source| StorageError::Encode {
        key: path.display().to_string(),
        source,
    })?;
    fs::write(path, payload).await?;
    Ok(())
}

/// Typed JSON view over a [`KeyValueStore`].
///
/// Reads never fail: an absent or undecodable value yields the caller's
/// default. Writes and read-modify-write sequences are serialized within the
/// process; across processes the last write wins.
#[derive(Clone)]
pub struct PersistedStore {
    backend: Arc<dyn KeyValueStore>,
    write_lock: Arc<Mutex<()>>,
}

impl PersistedStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::default()))
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get_opt(key).await.unwrap_or(default)
    }

    pub async fn get_opt<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.backend.get_raw(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                error!(key, "failed to decode stored value: {err}");
                None
            }
        }
    }

    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        self.write(key, value).await
    }

    /// Reads `key` (or `default`), lets `f` mutate it, and writes it back.
    pub async fn update<T, R, F>(&self, key: &str, default: T, f: F) -> Result<R, StorageError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T) -> R,
    {
        let _guard = self.write_lock.lock().await;
        let mut value = self.get(key, default).await;
        let out = f(&mut value);
        self.write(key, &value).await?;
        Ok(out)
    }

    async fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.backend.set_raw(key, encoded).await
    }

    #[cfg(test)]
    pub(crate) async fn set_raw_for_tests(&self, key: &str, raw: &str) {
        let _ = self.backend.set_raw(key, raw.to_string()).await;
    }
}
