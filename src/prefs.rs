//! Persisted key-value preferences (the browser's local storage).

use rusqlite::{params, Connection, OptionalExtension};
#[cfg(test)]
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::PrefsError;

/// Trait for preference storage backends.
pub trait PreferenceStore: Send + Sync {
  /// Read a stored value.
  fn get(&self, key: &str) -> Result<Option<String>, PrefsError>;

  /// Store a value, replacing any previous one.
  fn set(&self, key: &str, value: &str) -> Result<(), PrefsError>;
}

/// Preferences held in memory for the lifetime of the process.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryPreferences {
  values: Mutex<HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryPreferences {
  pub fn new() -> Self {
    Self::default()
  }
}

#[cfg(test)]
impl PreferenceStore for MemoryPreferences {
  fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
    let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
    Ok(values.get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
    let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
    values.insert(key.to_string(), value.to_string());
    Ok(())
  }
}

/// SQLite-backed preferences, shared with the cache database.
pub struct SqlitePreferences {
  conn: Mutex<Connection>,
}

impl SqlitePreferences {
  pub fn new(conn: Connection) -> Self {
    Self {
      conn: Mutex::new(conn),
    }
  }
}

impl PreferenceStore for SqlitePreferences {
  fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
    let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
    let value = conn
      .query_row(
        "SELECT value FROM preferences WHERE key = ?",
        params![key],
        |row| row.get(0),
      )
      .optional()?;
    Ok(value)
  }

  fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
    let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
    conn.execute(
      "INSERT OR REPLACE INTO preferences (key, value) VALUES (?, ?)",
      params![key, value],
    )?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db;

  #[test]
  fn test_memory_roundtrip() {
    let prefs = MemoryPreferences::new();
    assert_eq!(prefs.get("lang").unwrap(), None);
    prefs.set("lang", "en").unwrap();
    assert_eq!(prefs.get("lang").unwrap().as_deref(), Some("en"));
  }

  #[test]
  fn test_sqlite_overwrites_value() {
    let prefs = SqlitePreferences::new(db::open_in_memory().unwrap());
    prefs.set("lang", "en").unwrap();
    prefs.set("lang", "es").unwrap();
    assert_eq!(prefs.get("lang").unwrap().as_deref(), Some("es"));
    assert_eq!(prefs.get("missing").unwrap(), None);
  }
}
