//! Named cache storage trait with in-memory and SQLite implementations.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
#[cfg(test)]
use std::collections::BTreeMap;
use std::sync::Mutex;

use super::traits::{CachedResponse, Response, ResponseType};
use crate::error::WorkerError;

type Result<T> = std::result::Result<T, WorkerError>;

/// Trait for cache storage backends.
///
/// Storage holds any number of named caches (cache versions). Within a cache
/// the request URL is the unique key.
pub trait CacheStorage: Send + Sync {
  /// Names of all caches, oldest first.
  fn keys(&self) -> Result<Vec<String>>;

  /// Delete a cache and all of its entries. Returns whether it existed.
  fn delete(&self, cache: &str) -> Result<bool>;

  /// Look a URL up across all caches, oldest cache first.
  fn match_url(&self, url: &str) -> Result<Option<CachedResponse>>;

  /// Store one response, creating the cache when needed.
  fn put(&self, cache: &str, url: &str, response: &Response) -> Result<()>;

  /// Store a batch of responses as a single unit: either all or none.
  fn put_all(&self, cache: &str, entries: &[(String, Response)]) -> Result<()>;

  /// Number of entries in a cache.
  fn entry_count(&self, cache: &str) -> Result<usize>;
}

/// Cache storage living in process memory.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryCacheStorage {
  caches: Mutex<Vec<(String, BTreeMap<String, CachedResponse>)>>,
}

#[cfg(test)]
impl MemoryCacheStorage {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(String, BTreeMap<String, CachedResponse>)>> {
    self.caches.lock().unwrap_or_else(|e| e.into_inner())
  }
}

#[cfg(test)]
fn entries_mut<'a>(
  caches: &'a mut Vec<(String, BTreeMap<String, CachedResponse>)>,
  cache: &str,
) -> &'a mut BTreeMap<String, CachedResponse> {
  let idx = match caches.iter().position(|(name, _)| name == cache) {
    Some(idx) => idx,
    None => {
      caches.push((cache.to_string(), BTreeMap::new()));
      caches.len() - 1
    }
  };
  &mut caches[idx].1
}

#[cfg(test)]
impl CacheStorage for MemoryCacheStorage {
  fn keys(&self) -> Result<Vec<String>> {
    Ok(self.lock().iter().map(|(name, _)| name.clone()).collect())
  }

  fn delete(&self, cache: &str) -> Result<bool> {
    let mut caches = self.lock();
    let before = caches.len();
    caches.retain(|(name, _)| name != cache);
    Ok(caches.len() != before)
  }

  fn match_url(&self, url: &str) -> Result<Option<CachedResponse>> {
    Ok(
      self
        .lock()
        .iter()
        .find_map(|(_, entries)| entries.get(url).cloned()),
    )
  }

  fn put(&self, cache: &str, url: &str, response: &Response) -> Result<()> {
    let mut caches = self.lock();
    entries_mut(&mut caches, cache).insert(
      url.to_string(),
      CachedResponse {
        response: response.clone(),
        cached_at: Utc::now(),
      },
    );
    Ok(())
  }

  fn put_all(&self, cache: &str, entries: &[(String, Response)]) -> Result<()> {
    // Everything is built before the lock is taken, so the swap is all-or-nothing
    let now = Utc::now();
    let batch: Vec<(String, CachedResponse)> = entries
      .iter()
      .map(|(url, response)| {
        (
          url.clone(),
          CachedResponse {
            response: response.clone(),
            cached_at: now,
          },
        )
      })
      .collect();

    let mut caches = self.lock();
    entries_mut(&mut caches, cache).extend(batch);
    Ok(())
  }

  fn entry_count(&self, cache: &str) -> Result<usize> {
    Ok(
      self
        .lock()
        .iter()
        .find(|(name, _)| name == cache)
        .map_or(0, |(_, entries)| entries.len()),
    )
  }
}

/// SQLite-based cache storage implementation.
pub struct SqliteCacheStorage {
  conn: Mutex<Connection>,
}

impl SqliteCacheStorage {
  /// Wrap a connection that has the cache schema applied (see `db::open`).
  pub fn new(conn: Connection) -> Self {
    Self {
      conn: Mutex::new(conn),
    }
  }

  fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
    self.conn.lock().unwrap_or_else(|e| e.into_inner())
  }
}

const INSERT_ENTRY: &str = "INSERT OR REPLACE INTO cache_entries
  (cache_name, url, status, response_type, content_type, body, cached_at)
  VALUES (?, ?, ?, ?, ?, ?, datetime('now'))";

const INSERT_NAME: &str = "INSERT OR IGNORE INTO cache_names (cache_name) VALUES (?)";

impl CacheStorage for SqliteCacheStorage {
  fn keys(&self) -> Result<Vec<String>> {
    let conn = self.lock();
    let mut stmt = conn.prepare("SELECT cache_name FROM cache_names ORDER BY rowid")?;
    let names = stmt
      .query_map([], |row| row.get(0))?
      .collect::<std::result::Result<Vec<String>, _>>()?;
    Ok(names)
  }

  fn delete(&self, cache: &str) -> Result<bool> {
    let mut conn = self.lock();
    let tx = conn.transaction()?;
    tx.execute(
      "DELETE FROM cache_entries WHERE cache_name = ?",
      params![cache],
    )?;
    let removed = tx.execute(
      "DELETE FROM cache_names WHERE cache_name = ?",
      params![cache],
    )?;
    tx.commit()?;
    Ok(removed > 0)
  }

  fn match_url(&self, url: &str) -> Result<Option<CachedResponse>> {
    let conn = self.lock();
    let mut stmt = conn.prepare(
      "SELECT e.url, e.status, e.response_type, e.content_type, e.body, e.cached_at
       FROM cache_entries e
       INNER JOIN cache_names n ON n.cache_name = e.cache_name
       WHERE e.url = ?
       ORDER BY n.rowid
       LIMIT 1",
    )?;

    let row = stmt
      .query_row(params![url], |row| {
        Ok((
          row.get::<_, String>(0)?,
          row.get::<_, u16>(1)?,
          row.get::<_, String>(2)?,
          row.get::<_, Option<String>>(3)?,
          row.get::<_, Vec<u8>>(4)?,
          row.get::<_, String>(5)?,
        ))
      })
      .optional()?;

    match row {
      Some((url, status, response_type, content_type, body, cached_at)) => {
        Ok(Some(CachedResponse {
          response: Response {
            url,
            status,
            response_type: ResponseType::parse(&response_type),
            content_type,
            body,
          },
          cached_at: parse_datetime(&cached_at)?,
        }))
      }
      None => Ok(None),
    }
  }

  fn put(&self, cache: &str, url: &str, response: &Response) -> Result<()> {
    let mut conn = self.lock();
    let tx = conn.transaction()?;
    tx.execute(INSERT_NAME, params![cache])?;
    tx.execute(
      INSERT_ENTRY,
      params![
        cache,
        url,
        response.status,
        response.response_type.as_str(),
        response.content_type,
        response.body
      ],
    )?;
    tx.commit()?;
    Ok(())
  }

  fn put_all(&self, cache: &str, entries: &[(String, Response)]) -> Result<()> {
    let mut conn = self.lock();
    // Dropping the transaction without commit rolls every insert back
    let tx = conn.transaction()?;
    tx.execute(INSERT_NAME, params![cache])?;
    for (url, response) in entries {
      tx.execute(
        INSERT_ENTRY,
        params![
          cache,
          url,
          response.status,
          response.response_type.as_str(),
          response.content_type,
          response.body
        ],
      )?;
    }
    tx.commit()?;
    Ok(())
  }

  fn entry_count(&self, cache: &str) -> Result<usize> {
    let count: i64 = self.lock().query_row(
      "SELECT COUNT(*) FROM cache_entries WHERE cache_name = ?",
      params![cache],
      |row| row.get(0),
    )?;
    Ok(count as usize)
  }
}

/// Parse a datetime string from SQLite format.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
  // SQLite stores as "YYYY-MM-DD HH:MM:SS"
  chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
    .map(|dt| dt.and_utc())
    .map_err(|e| WorkerError::Storage(format!("bad timestamp '{}': {}", s, e)))
}
