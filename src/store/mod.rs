//! Named value store.
//!
//! The collection is persisted as a JSON value under a string key. The
//! [`ValueStore`] trait is the only persistence seam; the controller never
//! touches files directly.

mod file;
mod memory;

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Key the document collection is stored under.
pub const PROJECTS_KEY: &str = "projects_data";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid store data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{} does not hold a JSON object", .path.display())]
    NotAnObject { path: PathBuf },
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Key/value persistence for JSON values.
pub trait ValueStore {
    /// Fetch the value stored under `key`. A missing key is `Ok(None)`.
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Pick up writes made by someone else.
    ///
    /// Returns `true` when the backing data changed since this store last
    /// read or wrote it.
    fn refresh(&mut self) -> Result<bool, StoreError> {
        Ok(false)
    }

    /// Backing file, for stores that have one.
    fn location(&self) -> Option<&Path> {
        None
    }
}

/// Read and decode `key`, falling back to `default`.
///
/// A missing key, a read failure and a value of the wrong shape all yield
/// the default; the latter two are logged.
pub fn read<T: DeserializeOwned>(store: &dyn ValueStore, key: &str, default: T) -> T {
    match store.load(key) {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(decoded) => decoded,
            Err(err) => {
                tracing::warn!(key, %err, "stored value has an unexpected shape");
                default
            }
        },
        Ok(None) => default,
        Err(err) => {
            tracing::warn!(key, %err, "store read failed");
            default
        }
    }
}

/// Read and decode `key`, reporting failures.
///
/// # Errors
///
/// Returns an error if the store cannot be read or the value has the wrong
/// shape.
pub fn load<T: DeserializeOwned>(
    store: &dyn ValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    store
        .load(key)?
        .map(serde_json::from_value)
        .transpose()
        .map_err(StoreError::from)
}

/// Items of a stored array, decoded one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<T> {
    pub items: Vec<T>,
    /// Elements that did not decode as `T`.
    pub rejected: usize,
}

/// Decode the array under `key` element by element, skipping elements of the
/// wrong shape.
///
/// # Errors
///
/// Returns an error if the store cannot be read or the value is not an array.
pub fn load_each<T: DeserializeOwned>(
    store: &dyn ValueStore,
    key: &str,
) -> Result<Option<Decoded<T>>, StoreError> {
    let Some(elements) = load::<Vec<Value>>(store, key)? else {
        return Ok(None);
    };
    let mut decoded = Decoded {
        items: Vec::with_capacity(elements.len()),
        rejected: 0,
    };
    for (index, element) in elements.into_iter().enumerate() {
        match serde_json::from_value(element) {
            Ok(item) => decoded.items.push(item),
            Err(err) => {
                tracing::warn!(key, index, %err, "skipping unreadable element");
                decoded.rejected += 1;
            }
        }
    }
    Ok(Some(decoded))
}

/// Key that [`set_aside`] copies an unreadable value of `key` to.
pub fn unreadable_key(key: &str) -> String {
    format!("{key}.unreadable")
}

/// Copy the raw value of `key` to [`unreadable_key`], so a later write to
/// `key` cannot destroy it.
///
/// # Errors
///
/// Returns an error if the value cannot be read back or the copy cannot be
/// saved.
pub fn set_aside(store: &mut dyn ValueStore, key: &str) -> Result<(), StoreError> {
    if let Some(raw) = store.load(key)? {
        store.save(&unreadable_key(key), raw)?;
    }
    Ok(())
}

/// Encode `value` and save it under `key`.
///
/// # Errors
///
/// Returns an error if encoding fails or the store cannot persist the value.
pub fn write<T: Serialize + ?Sized>(
    store: &mut dyn ValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let encoded = serde_json::to_value(value)?;
    store.save(key, encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_missing_key_returns_default() {
        let store = MemoryStore::default();
        let value: Vec<u32> = read(&store, "absent", vec![7]);
        assert_eq!(value, vec![7]);
    }

    #[test]
    fn test_read_wrong_shape_returns_default() {
        let mut store = MemoryStore::default();
        store.save("numbers", Value::String("nope".into())).unwrap();
        let value: Vec<u32> = read(&store, "numbers", Vec::new());
        assert!(value.is_empty());
    }

    #[test]
    fn test_write_then_read() {
        let mut store = MemoryStore::default();
        write(&mut store, "numbers", &[1_u32, 2, 3]).unwrap();
        let value: Vec<u32> = read(&store, "numbers", Vec::new());
        assert_eq!(value, vec![1, 2, 3]);
    }

    #[test]
    fn test_load_reports_wrong_shape() {
        let mut store = MemoryStore::default();
        store.save("numbers", Value::String("nope".into())).unwrap();
        let result: Result<Option<Vec<u32>>, _> = load(&store, "numbers");
        assert!(matches!(result, Err(StoreError::Json(_))));
        assert_eq!(load::<Vec<u32>>(&store, "absent").unwrap(), None);
    }

    #[test]
    fn test_load_each_skips_bad_elements() {
        let mut store = MemoryStore::default();
        store.save("numbers", json!([1, "two", 3, null])).unwrap();
        let decoded = load_each::<u32>(&store, "numbers").unwrap().unwrap();
        assert_eq!(decoded.items, vec![1, 3]);
        assert_eq!(decoded.rejected, 2);
    }

    #[test]
    fn test_load_each_rejects_non_array() {
        let mut store = MemoryStore::default();
        store.save("numbers", json!({"one": 1})).unwrap();
        assert!(load_each::<u32>(&store, "numbers").is_err());
    }

    #[test]
    fn test_set_aside_copies_raw_value() {
        let mut store = MemoryStore::default();
        store.save("numbers", json!([1, "two"])).unwrap();
        set_aside(&mut store, "numbers").unwrap();
        assert_eq!(
            store.load(&unreadable_key("numbers")).unwrap(),
            Some(json!([1, "two"]))
        );
        assert_eq!(store.load("numbers").unwrap(), Some(json!([1, "two"])));
    }

    #[test]
    fn test_error_messages_name_the_path() {
        let err = StoreError::NotAnObject {
            path: PathBuf::from("/tmp/store.json"),
        };
        assert_eq!(err.to_string(), "/tmp/store.json does not hold a JSON object");
    }
}
