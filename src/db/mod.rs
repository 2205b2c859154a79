pub mod schema;

use rusqlite::Connection;
use std::path::{Path, PathBuf};

use crate::error::PrefsError;

/// Default location of the local database
pub fn default_path() -> Result<PathBuf, PrefsError> {
  let data_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or(PrefsError::NoDataDir)?;

  Ok(data_dir.join("futbol-total").join("futbol-total.db"))
}

/// Open or create the database at `path` and run migrations
pub fn open(path: &Path) -> Result<Connection, PrefsError> {
  // Ensure parent directory exists
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }

  let conn = Connection::open(path)?;
  migrate(&conn)?;
  Ok(conn)
}

/// Open a throwaway in-memory database with the same schema
#[cfg(test)]
pub fn open_in_memory() -> Result<Connection, PrefsError> {
  let conn = Connection::open_in_memory()?;
  migrate(&conn)?;
  Ok(conn)
}

fn migrate(conn: &Connection) -> Result<(), PrefsError> {
  conn.execute_batch(schema::SCHEMA)?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_migrations_are_idempotent() {
    let conn = open_in_memory().unwrap();
    migrate(&conn).unwrap();

    let tables: i64 = conn
      .query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('preferences', 'cache_entries')",
        [],
        |row| row.get(0),
      )
      .unwrap();
    assert_eq!(tables, 2);
  }
}
