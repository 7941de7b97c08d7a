//! Versioned record encoding on top of a [`KeyValueStore`].
//!
//! Every value is written as `{"version": N, "data": ...}`. Reads produce an
//! explicit [`RecordRead`] instead of failing outright so that callers can
//! decide whether a damaged value should be discarded or reported.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::warn;

use super::{DynStore, KeyValueStore, StorageError};

/// The schema version written by this build.
pub const RECORD_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct RawEnvelope {
    version: u32,
    data: serde_json::Value,
}

/// The outcome of reading a record.
#[derive(Debug, PartialEq)]
pub enum RecordRead<T> {
    Present(T),
    Missing,
    /// The stored value exists but cannot be decoded. The value is a
    /// description of the problem.
    Corrupt(String),
}

impl<T: DeserializeOwned> RecordRead<T> {
    /// Decode a raw stored value.
    pub fn decode(raw: Option<&str>) -> Self {
        let raw = match raw {
            Some(raw) => raw,
            None => return Self::Missing,
        };

        let envelope: RawEnvelope = match serde_json::from_str(raw) {
            Ok(envelope) => envelope,
            Err(error) => return Self::Corrupt(format!("malformed envelope: {}", error)),
        };

        if envelope.version != RECORD_VERSION {
            return Self::Corrupt(format!(
                "unsupported record version {} (expected {})",
                envelope.version, RECORD_VERSION
            ));
        }

        match serde_json::from_value(envelope.data) {
            Ok(data) => Self::Present(data),
            Err(error) => Self::Corrupt(format!("malformed data: {}", error)),
        }
    }
}

/// Typed access to a [`KeyValueStore`].
#[derive(Clone)]
pub struct RecordStore {
    store: DynStore,
}

impl RecordStore {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub fn read<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<RecordRead<T>> {
        let raw = self.store.get(key)?;

        Ok(RecordRead::decode(raw.as_deref()))
    }

    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> anyhow::Result<()> {
        let encoded = serde_json::to_string(&EnvelopeRef {
            version: RECORD_VERSION,
            data: value,
        })?;

        self.store.set(key, &encoded)
    }

    pub fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.store.remove(key)
    }

    /// Read a record, removing it from the store if it is corrupt.
    ///
    /// Used for auth and session state where a damaged value is equivalent to
    /// no value at all.
    pub fn read_or_discard<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<Option<T>> {
        match self.read(key)? {
            RecordRead::Present(value) => Ok(Some(value)),
            RecordRead::Missing => Ok(None),
            RecordRead::Corrupt(reason) => {
                warn!(%key, %reason, "Discarding corrupt record.");
                self.store.remove(key)?;

                Ok(None)
            }
        }
    }

    /// Read a list of records. A missing key is an empty list, a corrupt one
    /// is an error.
    pub fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StorageError> {
        match self.read(key)? {
            RecordRead::Present(values) => Ok(values),
            RecordRead::Missing => Ok(vec![]),
            RecordRead::Corrupt(reason) => Err(StorageError::Corrupt {
                key: key.to_owned(),
                reason,
            }),
        }
    }
}

impl KeyValueStore for RecordStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.store.get(key)
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.store.set(key, value)
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.store.remove(key)
    }
}
