//! Durable key-value storage for the ledger, its undo log and the app settings.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, OptionalExtension};
use serde::{Serialize, de::DeserializeOwned};

use crate::Error;

/// The key under which the list of expenses is stored.
pub const EXPENSES_KEY: &str = "pocketlog-data";
/// The key under which the undo log is stored.
pub const UNDO_KEY: &str = "pocketlog-undo";
/// The key under which the app settings are stored.
pub const SETTINGS_KEY: &str = "pocketlog-settings";

/// Stores string values by string keys.
///
/// Reads and writes are synchronous and there are no transactions or expiry:
/// a `set` overwrites whatever was stored under the key before.
pub trait KeyValueStore {
    /// Get the value stored under `key`, or `None` if nothing has been stored yet.
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store `value` under `key`, replacing any existing value.
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        (**self).set(key, value)
    }
}

/// A [KeyValueStore] backed by a table in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteKeyValueStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteKeyValueStore {
    /// Create a new store with a SQLite database.
    ///
    /// The caller should make sure the table exists, e.g. with [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl KeyValueStore for SQLiteKeyValueStore {
    /// Retrieve the value for `key` from the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DatabaseLockError] if the connection lock is poisoned,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare("SELECT value FROM key_value WHERE key = :key")?
            .query_row(&[(":key", key)], |row| row.get(0))
            .optional()
            .map_err(Error::from)
    }

    /// Insert or replace the value for `key` in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DatabaseLockError] if the connection lock is poisoned,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .execute(
                "INSERT INTO key_value (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                (key, value),
            )?;

        Ok(())
    }
}

/// Create the key-value table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_key_value_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS key_value (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// A [KeyValueStore] that only lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let values = self.values.lock().map_err(|_| Error::DatabaseLockError)?;

        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let mut values = self.values.lock().map_err(|_| Error::DatabaseLockError)?;
        values.insert(key.to_owned(), value.to_owned());

        Ok(())
    }
}

/// Read and parse the JSON stored under `key`, falling back to the default
/// value if it is missing or invalid.
pub(crate) fn load_or_default<S, T>(store: &S, key: &str) -> T
where
    S: KeyValueStore,
    T: DeserializeOwned + Default,
{
    let text = match store.get(key) {
        Ok(Some(text)) => text,
        Ok(None) => return T::default(),
        Err(error) => {
            tracing::error!("Could not read \"{key}\" from storage: {error}");
            return T::default();
        }
    };

    serde_json::from_str(&text).unwrap_or_else(|error| {
        tracing::warn!("Failed to parse saved \"{key}\", starting empty: {error}");
        T::default()
    })
}

/// Serialize `value` as JSON and store it under `key`.
pub(crate) fn save<S, T>(store: &S, key: &str, value: &T) -> Result<(), Error>
where
    S: KeyValueStore,
    T: Serialize + ?Sized,
{
    let text = serde_json::to_string(value)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    store.set(key, &text)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::db::initialize;

    use super::{KeyValueStore, MemoryKeyValueStore, SQLiteKeyValueStore};

    fn get_test_store() -> SQLiteKeyValueStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        SQLiteKeyValueStore::new(Arc::new(Mutex::new(connection)))
    }

    #[test]
    fn get_missing_key_returns_none() {
        let store = get_test_store();

        assert_eq!(store.get("missing"), Ok(None));
    }

    #[test]
    fn set_then_get_returns_value() {
        let store = get_test_store();

        store.set("foo", "bar").unwrap();

        assert_eq!(store.get("foo"), Ok(Some("bar".to_owned())));
    }

    #[test]
    fn set_replaces_existing_value() {
        let store = get_test_store();

        store.set("foo", "bar").unwrap();
        store.set("foo", "baz").unwrap();

        assert_eq!(store.get("foo"), Ok(Some("baz".to_owned())));
    }

    #[test]
    fn keys_are_independent() {
        let store = get_test_store();

        store.set("foo", "1").unwrap();
        store.set("bar", "2").unwrap();

        assert_eq!(store.get("foo"), Ok(Some("1".to_owned())));
        assert_eq!(store.get("bar"), Ok(Some("2".to_owned())));
    }

    #[test]
    fn clones_share_the_same_database() {
        let store = get_test_store();
        let other = store.clone();

        store.set("foo", "bar").unwrap();

        assert_eq!(other.get("foo"), Ok(Some("bar".to_owned())));
    }

    #[test]
    fn memory_store_set_replaces_existing_value() {
        let store = MemoryKeyValueStore::new();

        assert_eq!(store.get("foo"), Ok(None));

        store.set("foo", "bar").unwrap();
        store.set("foo", "baz").unwrap();

        assert_eq!(store.get("foo"), Ok(Some("baz".to_owned())));
    }
}
