//! Persistence adapter: string-keyed JSON records.
//!
//! # Responsibility
//! - Define the `KeyValueStore` contract used by session and task state.
//! - Provide JSON read/write helpers that separate "absent" from "malformed".
//! - Own the persisted key layout.
//!
//! # Invariants
//! - A single `set` replaces the whole value for one key atomically.
//! - There are no cross-key transactions.
//!
//! # Key layout
//! - `taskUser` → `UserProfile` JSON object, present iff a session is active.
//! - `tasks_<userId>` → JSON array of `Task` for that user.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

mod memory;
pub mod migrations;
mod sqlite;

pub use memory::MemoryKvStore;
pub use sqlite::SqliteKvStore;

/// Key holding the logged-in profile.
pub const SESSION_KEY: &str = "taskUser";

const TASKS_KEY_PREFIX: &str = "tasks_";

/// Key holding one user's task collection.
pub fn tasks_key(user_id: &str) -> String {
    format!("{TASKS_KEY_PREFIX}{user_id}")
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage transport and encoding failures.
#[derive(Debug)]
pub enum StorageError {
    Sqlite(rusqlite::Error),
    Json(serde_json::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// A previous holder of the backend lock panicked.
    Poisoned,
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "json encoding failed: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "storage schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Poisoned => write!(f, "storage lock poisoned"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::Poisoned => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Durable string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// Backend selected at runtime from configuration.
#[derive(Debug)]
pub enum KvBackend {
    Memory(MemoryKvStore),
    Sqlite(SqliteKvStore),
}

impl KeyValueStore for KvBackend {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match self {
            Self::Memory(store) => store.get(key),
            Self::Sqlite(store) => store.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        match self {
            Self::Memory(store) => store.set(key, value),
            Self::Sqlite(store) => store.set(key, value),
        }
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        match self {
            Self::Memory(store) => store.remove(key),
            Self::Sqlite(store) => store.remove(key),
        }
    }
}

/// Outcome of decoding a stored JSON value.
#[derive(Debug)]
pub enum JsonRead<T> {
    Missing,
    Parsed(T),
    /// Value exists but does not decode as `T`; callers recover locally.
    Malformed(serde_json::Error),
}

/// Reads and decodes one key.
///
/// # Errors
/// - Returns backend errors only; decode failures are reported as
///   `JsonRead::Malformed`.
pub fn read_json<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> StorageResult<JsonRead<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(JsonRead::Missing);
    };
    Ok(match serde_json::from_str(&raw) {
        Ok(value) => JsonRead::Parsed(value),
        Err(err) => JsonRead::Malformed(err),
    })
}

/// Encodes `value` and writes it under `key`, replacing any previous value.
pub fn write_json<T: Serialize + ?Sized>(
    store: &impl KeyValueStore,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    let encoded = serde_json::to_string(value)?;
    store.set(key, &encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::user::UserProfile;

    #[test]
    fn tasks_key_is_prefixed_with_user_id() {
        assert_eq!(tasks_key("42"), "tasks_42");
    }

    #[test]
    fn read_json_distinguishes_missing_and_malformed() {
        let store = MemoryKvStore::new();
        assert!(matches!(
            read_json::<UserProfile>(&store, SESSION_KEY).unwrap(),
            JsonRead::Missing
        ));

        store.set(SESSION_KEY, "{not json").unwrap();
        assert!(matches!(
            read_json::<UserProfile>(&store, SESSION_KEY).unwrap(),
            JsonRead::Malformed(_)
        ));
    }

    #[test]
    fn arc_store_shares_underlying_entries() {
        let store = Arc::new(MemoryKvStore::new());
        let alias = Arc::clone(&store);
        alias.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
