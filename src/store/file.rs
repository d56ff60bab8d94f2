use std::ffi::OsString;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::{StoreError, ValueStore};

/// Hash a byte slice for content comparison.
pub(super) fn hash_bytes(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}

/// All keys kept in one JSON object file.
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// reader never sees a half-written file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Map<String, Value>,
    /// Hash of the bytes last read from or written to `path`.
    last_hash: Option<u64>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or does not
    /// hold a JSON object.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let mut store = Self {
            path: path.into(),
            values: Map::new(),
            last_hash: None,
        };
        store.refresh()?;
        tracing::debug!(path = %store.path.display(), keys = store.values.len(), "opened store");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map_or_else(|| OsString::from("store"), ToOwned::to_owned);
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn read_file(&self) -> Result<Option<Vec<u8>>, StoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::io(&self.path, err)),
        }
    }

    fn parse(&self, bytes: &[u8]) -> Result<Map<String, Value>, StoreError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }
        match serde_json::from_slice(bytes)? {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::NotAnObject {
                path: self.path.clone(),
            }),
        }
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
        }
        let bytes = serde_json::to_vec_pretty(&self.values)?;
        let temp = self.temp_path();
        std::fs::write(&temp, &bytes).map_err(|err| StoreError::io(&temp, err))?;
        std::fs::rename(&temp, &self.path).map_err(|err| StoreError::io(&self.path, err))?;
        self.last_hash = Some(hash_bytes(&bytes));
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "store written");
        Ok(())
    }
}

impl ValueStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        self.persist()
    }

    fn refresh(&mut self) -> Result<bool, StoreError> {
        let Some(bytes) = self.read_file()? else {
            let changed = self.last_hash.is_some();
            self.values.clear();
            self.last_hash = None;
            return Ok(changed);
        };
        let hash = hash_bytes(&bytes);
        if self.last_hash == Some(hash) {
            return Ok(false);
        }
        self.values = self.parse(&bytes)?;
        self.last_hash = Some(hash);
        tracing::info!(path = %self.path.display(), "store changed on disk");
        Ok(true)
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}
