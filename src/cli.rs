//! One-shot subcommands that drive the worker and preferences directly.

use color_eyre::{eyre::eyre, Result};
use std::path::Path;
use tracing::debug;

use crate::config::Config;
use crate::db;
use crate::i18n::{Language, LANGUAGE_KEY};
use crate::prefs::{PreferenceStore, SqlitePreferences};
use crate::worker::{
  CacheStorage, ClickOutcome, HttpFetcher, LogHost, NotificationClick, NotificationOptions,
  OfflineWorker, PushEvent, Request, SqliteCacheStorage, SyncOutcome, WorkerEvent, WorkerReply,
  WorkerState, NOTIFICATION_TITLE, SYNC_TAG,
};

/// Worker wired to the local database and the network.
pub type AppWorker = OfflineWorker<SqliteCacheStorage, HttpFetcher, LogHost>;

/// Build the worker for `config`. A worker whose cache already exists picks
/// up where an earlier run left off.
pub fn open_worker(config: &Config, db_path: &Path) -> Result<AppWorker> {
  let settings = config.worker_settings()?;
  let conn = db::open(db_path)?;
  let storage = SqliteCacheStorage::new(conn);
  let fetcher = HttpFetcher::new(settings.origin.clone())?;

  let installed = storage.keys()?.contains(&settings.cache_name);
  let worker = OfflineWorker::new(settings, storage, fetcher, LogHost::default());
  Ok(if installed {
    worker.with_state(WorkerState::Installed)
  } else {
    worker
  })
}

/// Install and activate, as a freshly registered worker does.
pub async fn install_and_activate(worker: &mut AppWorker) -> Result<(usize, Vec<String>)> {
  let entries = match worker.dispatch(WorkerEvent::Install).await? {
    WorkerReply::Installed { entries } => entries,
    other => return Err(unexpected("install", other)),
  };
  let purged = activate_worker(worker).await?;
  debug!(state = ?worker.state(), entries, purged = purged.len(), "worker ready");
  Ok((entries, purged))
}

async fn activate_worker(worker: &mut AppWorker) -> Result<Vec<String>> {
  match worker.dispatch(WorkerEvent::Activate).await? {
    WorkerReply::Activated { purged } => Ok(purged),
    other => Err(unexpected("activate", other)),
  }
}

fn unexpected(event: &str, reply: WorkerReply) -> color_eyre::Report {
  eyre!("unexpected reply to {}: {:?}", event, reply)
}

pub async fn install(config: &Config, db_path: &Path) -> Result<()> {
  let mut worker = open_worker(config, db_path)?;
  let (entries, purged) = install_and_activate(&mut worker).await?;
  println!(
    "Cached {} entries in {}",
    entries,
    worker.settings().cache_name
  );
  for name in purged {
    println!("Deleted stale cache {}", name);
  }
  Ok(())
}

pub async fn activate(config: &Config, db_path: &Path) -> Result<()> {
  let mut worker = open_worker(config, db_path)?;
  let purged = activate_worker(&mut worker).await?;
  if purged.is_empty() {
    println!("No stale caches");
  }
  for name in purged {
    println!("Deleted stale cache {}", name);
  }
  let cache = &worker.settings().cache_name;
  println!("{}: {} entries", cache, worker.storage().entry_count(cache)?);
  Ok(())
}

pub async fn fetch(config: &Config, db_path: &Path, url: &str) -> Result<()> {
  let mut worker = open_worker(config, db_path)?;
  let result = match worker.dispatch(WorkerEvent::Fetch(Request::get(url))).await? {
    WorkerReply::Fetched(result) => result,
    other => return Err(unexpected("fetch", other)),
  };
  let response = &result.response;
  println!("{} {}", response.status, response.url);
  println!("source: {:?}", result.source);
  println!("type: {}", response.response_type.as_str());
  if let Some(content_type) = &response.content_type {
    println!("content-type: {}", content_type);
  }
  if let Some(cached_at) = result.cached_at {
    println!("cached at: {}", cached_at.to_rfc3339());
  }
  println!("{} bytes", response.body.len());
  Ok(())
}

pub async fn sync(config: &Config, db_path: &Path) -> Result<()> {
  let mut worker = open_worker(config, db_path)?;
  let event = WorkerEvent::Sync {
    tag: SYNC_TAG.to_string(),
  };
  match worker.dispatch(event).await? {
    WorkerReply::Synced(SyncOutcome::Completed(data)) => {
      println!("{}", serde_json::to_string_pretty(&data)?);
      Ok(())
    }
    WorkerReply::Synced(SyncOutcome::Failed(reason)) => {
      Err(eyre!("Background sync failed: {}", reason))
    }
    WorkerReply::Synced(SyncOutcome::Ignored) => Ok(()),
    other => Err(unexpected("sync", other)),
  }
}

pub async fn push(config: &Config, db_path: &Path, body: Option<String>) -> Result<()> {
  let options = NotificationOptions::for_push(body.as_deref(), chrono::Utc::now().timestamp_millis());
  println!("{}", NOTIFICATION_TITLE);
  println!("{}", serde_json::to_string_pretty(&options)?);

  let mut worker = open_worker(config, db_path)?;
  match worker.dispatch(WorkerEvent::Push(PushEvent { data: body })).await? {
    WorkerReply::NotificationShown { id } => {
      println!("notification {}", id);
      Ok(())
    }
    other => Err(unexpected("push", other)),
  }
}

/// Click notification `id`, either on one of its actions or on its body.
pub async fn click(
  config: &Config,
  db_path: &Path,
  id: u64,
  action: Option<String>,
) -> Result<()> {
  let mut worker = open_worker(config, db_path)?;
  let event = WorkerEvent::NotificationClick(NotificationClick {
    notification_id: id,
    action: action.unwrap_or_default(),
  });
  match worker.dispatch(event).await? {
    WorkerReply::Clicked(ClickOutcome::OpenedWindow(url)) => println!("Opened {}", url),
    WorkerReply::Clicked(ClickOutcome::Closed) => println!("Closed notification {}", id),
    other => return Err(unexpected("notificationclick", other)),
  }
  Ok(())
}

pub fn set_language(db_path: &Path, code: &str) -> Result<()> {
  let lang: Language = code.parse()?;
  let conn = db::open(db_path)?;
  SqlitePreferences::new(conn).set(LANGUAGE_KEY, lang.code())?;
  println!("Language set to {}", lang);
  Ok(())
}
