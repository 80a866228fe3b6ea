//! Key-value persistence for the best score
//!
//! Backends:
//! - `MemoryStore`: in-process map (tests, headless runs)
//! - `JsonFileStore`: JSON file with tmp-then-rename writes (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm32)

use std::collections::HashMap;
use std::fmt;

/// Key the best score lives under
pub const BEST_SCORE_KEY: &str = "gateRunnerBestScore";

/// Why a store operation failed
#[derive(Debug)]
pub enum StoreError {
    /// Backend not reachable (no LocalStorage, disabled store, ...)
    Unavailable,
    Io(std::io::Error),
    /// Stored data could not be understood
    Corrupt(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable => write!(f, "store unavailable"),
            StoreError::Io(e) => write!(f, "store I/O error: {}", e),
            StoreError::Corrupt(msg) => write!(f, "corrupt store data: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

/// Integer key-value store
pub trait PersistentStore {
    fn get(&self, key: &str) -> Result<Option<i64>, StoreError>;
    fn set(&mut self, key: &str, value: i64) -> Result<(), StoreError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, i64>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that fails every operation with `StoreError::Unavailable`
    pub fn unavailable() -> Self {
        Self {
            values: HashMap::new(),
            unavailable: true,
        }
    }

    pub fn with_value(key: &str, value: i64) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value);
        store
    }
}

impl PersistentStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<i64>, StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable);
        }
        Ok(self.values.get(key).copied())
    }

    fn set(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable);
        }
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};

    use super::{PersistentStore, StoreError};

    /// Flat JSON object of integers on disk
    #[derive(Debug, Clone)]
    pub struct JsonFileStore {
        path: PathBuf,
    }

    impl JsonFileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn read_all(&self) -> Result<BTreeMap<String, i64>, StoreError> {
            match std::fs::read_to_string(&self.path) {
                Ok(json) => serde_json::from_str(&json)
                    .map_err(|e| StoreError::Corrupt(format!("{}: {}", self.path.display(), e))),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
                Err(e) => Err(e.into()),
            }
        }
    }

    impl PersistentStore for JsonFileStore {
        fn get(&self, key: &str) -> Result<Option<i64>, StoreError> {
            Ok(self.read_all()?.get(key).copied())
        }

        fn set(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
            // A corrupt file is replaced rather than blocking the write
            let mut values = self.read_all().unwrap_or_else(|e| {
                log::warn!("Overwriting unreadable store: {}", e);
                BTreeMap::new()
            });
            values.insert(key.to_string(), value);

            let json = serde_json::to_string_pretty(&values)
                .map_err(|e| StoreError::Corrupt(e.to_string()))?;
            let tmp = self.path.with_extension("tmp");
            std::fs::write(&tmp, json)?;
            std::fs::rename(&tmp, &self.path)?;
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{PersistentStore, StoreError};

    /// Browser LocalStorage, values stored as decimal strings
    #[derive(Debug, Default)]
    pub struct LocalStorageStore;

    impl LocalStorageStore {
        fn storage() -> Result<web_sys::Storage, StoreError> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .ok_or(StoreError::Unavailable)
        }
    }

    impl PersistentStore for LocalStorageStore {
        fn get(&self, key: &str) -> Result<Option<i64>, StoreError> {
            let storage = Self::storage()?;
            match storage.get_item(key) {
                Ok(Some(raw)) => raw
                    .trim()
                    .parse::<i64>()
                    .map(Some)
                    .map_err(|e| StoreError::Corrupt(format!("{}: {}", key, e))),
                Ok(None) => Ok(None),
                Err(_) => Err(StoreError::Unavailable),
            }
        }

        fn set(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
            Self::storage()?
                .set_item(key, &value.to_string())
                .map_err(|_| StoreError::Unavailable)
        }
    }
}
