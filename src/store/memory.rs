use std::collections::HashMap;

use serde_json::Value;

use super::{StoreError, ValueStore};

/// Store that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

impl ValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_save_replaces_previous_value() {
        let mut store = MemoryStore::new();
        store.save("k", json!(1)).unwrap();
        store.save("k", json!(2)).unwrap();
        assert_eq!(store.load("k").unwrap(), Some(json!(2)));
        assert!(store.contains("k"));
        assert!(!store.refresh().unwrap());
    }
}
