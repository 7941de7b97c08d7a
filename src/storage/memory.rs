use std::{collections::HashMap, sync::Mutex};

use anyhow::anyhow;

use super::KeyValueStore;

/// An in-process store. State is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> anyhow::Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|_| anyhow!("memory store lock was poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.lock()?.insert(key.to_owned(), value.to_owned());

        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.lock()?.remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn set_then_get() -> anyhow::Result<()> {
        let store = MemoryStore::new();

        store.set("greeting", "hello")?;

        assert_eq!(Some("hello".to_owned()), store.get("greeting")?);

        Ok(())
    }

    #[test]
    fn remove_missing_key_is_ok() -> anyhow::Result<()> {
        let store = MemoryStore::new();

        store.remove("nothing-here")?;

        assert_eq!(None, store.get("nothing-here")?);

        Ok(())
    }
}
