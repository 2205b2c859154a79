//! The offline cache worker: lifecycle, fetch strategy and event dispatch.

use chrono::Utc;
use futures::future::try_join_all;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, error, info, warn};
use url::Url;

use super::notifications::{
  NotificationClick, NotificationOptions, PushEvent, WorkerHost, EXPLORE_ACTION,
  NOTIFICATION_TITLE,
};
use super::storage::CacheStorage;
use super::traits::{CacheResult, Fetcher, Request, Response};
use super::{ROOT_URL, SYNC_TAG};
use crate::error::WorkerError;

/// What the worker caches and where it talks to.
#[derive(Debug, Clone)]
pub struct WorkerSettings {
  pub origin: Url,
  pub cache_name: String,
  pub manifest: Vec<String>,
  pub sync_endpoint: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
  Parsed,
  Installing,
  Installed,
  Activated,
  Redundant,
}

/// Events the platform delivers to the worker.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
  Install,
  Activate,
  Fetch(Request),
  Push(PushEvent),
  NotificationClick(NotificationClick),
  Sync { tag: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
  OpenedWindow(String),
  Closed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
  Completed(Value),
  Failed(String),
  /// Tag this worker does not handle
  Ignored,
}

/// Reply to a dispatched event.
#[derive(Debug, Clone)]
pub enum WorkerReply {
  Installed { entries: usize },
  Activated { purged: Vec<String> },
  Fetched(CacheResult),
  NotificationShown { id: u64 },
  Clicked(ClickOutcome),
  Synced(SyncOutcome),
}

/// Offline cache worker.
///
/// Owns the cache storage, the network fetcher and the host services of its
/// isolated context. Events run to completion one at a time.
pub struct OfflineWorker<S: CacheStorage, F: Fetcher, H: WorkerHost> {
  settings: WorkerSettings,
  storage: S,
  fetcher: F,
  host: H,
  state: WorkerState,
}

impl<S: CacheStorage, F: Fetcher, H: WorkerHost> OfflineWorker<S, F, H> {
  pub fn new(settings: WorkerSettings, storage: S, fetcher: F, host: H) -> Self {
    Self {
      settings,
      storage,
      fetcher,
      host,
      state: WorkerState::Parsed,
    }
  }

  /// Mark a worker whose install already happened in an earlier run.
  pub fn with_state(mut self, state: WorkerState) -> Self {
    self.state = state;
    self
  }

  pub fn state(&self) -> WorkerState {
    self.state
  }

  pub fn storage(&self) -> &S {
    &self.storage
  }

  pub fn settings(&self) -> &WorkerSettings {
    &self.settings
  }

  /// Resolve a possibly relative URL against the app origin.
  pub fn resolve(&self, url: &str) -> Result<String, WorkerError> {
    self
      .settings
      .origin
      .join(url)
      .map(String::from)
      .map_err(|e| WorkerError::InvalidUrl(url.to_string(), e))
  }

  /// Route one event to its handler.
  pub async fn dispatch(&mut self, event: WorkerEvent) -> Result<WorkerReply, WorkerError> {
    match event {
      WorkerEvent::Install => self
        .install()
        .await
        .map(|entries| WorkerReply::Installed { entries }),
      WorkerEvent::Activate => self
        .activate()
        .map(|purged| WorkerReply::Activated { purged }),
      WorkerEvent::Fetch(request) => self.handle_fetch(request).await.map(WorkerReply::Fetched),
      WorkerEvent::Push(push) => self
        .handle_push(&push)
        .map(|id| WorkerReply::NotificationShown { id }),
      WorkerEvent::NotificationClick(click) => {
        self.handle_notification_click(&click).map(WorkerReply::Clicked)
      }
      WorkerEvent::Sync { tag } => Ok(WorkerReply::Synced(self.handle_sync(&tag).await)),
    }
  }

  /// Pre-populate the cache with the app shell.
  ///
  /// Every manifest URL must come back with an ok status; a single failure
  /// fails the install, stores nothing and leaves the worker redundant.
  pub async fn install(&mut self) -> Result<usize, WorkerError> {
    self.state = WorkerState::Installing;
    match self.precache().await {
      Ok(count) => {
        self.state = WorkerState::Installed;
        info!(cache = %self.settings.cache_name, entries = count, "worker installed");
        Ok(count)
      }
      Err(e) => {
        self.state = WorkerState::Redundant;
        error!(error = %e, "worker install failed");
        Err(e)
      }
    }
  }

  async fn precache(&self) -> Result<usize, WorkerError> {
    let urls = self
      .settings
      .manifest
      .iter()
      .map(|u| self.resolve(u))
      .collect::<Result<Vec<_>, _>>()?;

    let entries = try_join_all(urls.into_iter().map(|url| async move {
      let response = self
        .fetcher
        .fetch(&Request::get(url.clone()))
        .await
        .map_err(|e| WorkerError::Install {
          url: url.clone(),
          reason: e.to_string(),
        })?;

      if !response.ok() {
        return Err(WorkerError::Install {
          url,
          reason: format!("status {}", response.status),
        });
      }
      Ok((url, response))
    }))
    .await?;

    self.storage.put_all(&self.settings.cache_name, &entries)?;
    Ok(entries.len())
  }

  /// Delete every cache that is not the current version.
  pub fn activate(&mut self) -> Result<Vec<String>, WorkerError> {
    match self.state {
      WorkerState::Installed | WorkerState::Activated => {}
      WorkerState::Redundant => return Err(WorkerError::Redundant),
      WorkerState::Parsed | WorkerState::Installing => return Err(WorkerError::NotInstalled),
    }

    let mut purged = Vec::new();
    for name in self.storage.keys()? {
      if name != self.settings.cache_name {
        info!(cache = %name, "deleting stale cache");
        self.storage.delete(&name)?;
        purged.push(name);
      }
    }

    self.state = WorkerState::Activated;
    Ok(purged)
  }

  /// Cache first, then network; successful same-origin responses are cached.
  pub async fn handle_fetch(&self, mut request: Request) -> Result<CacheResult, WorkerError> {
    request.url = self.resolve(&request.url)?;

    if let Some(cached) = self.storage.match_url(&request.url)? {
      debug!(url = %request.url, "served from cache");
      return Ok(CacheResult::from_cache(cached));
    }

    let response = self.fetcher.fetch(&request).await?;
    if request.method == Method::GET && response.is_cacheable() {
      self.store(&request, &response);
    }
    Ok(CacheResult::from_network(response))
  }

  fn store(&self, request: &Request, response: &Response) {
    // Write failures are logged, the response still goes out
    if let Err(e) = self
      .storage
      .put(&self.settings.cache_name, &request.url, response)
    {
      warn!(url = %request.url, error = %e, "could not cache response");
    }
  }

  /// Show the notification for a push message.
  pub fn handle_push(&self, event: &PushEvent) -> Result<u64, WorkerError> {
    let arrived_at = Utc::now().timestamp_millis();
    let options = NotificationOptions::for_push(event.data.as_deref(), arrived_at);
    self.host.show_notification(NOTIFICATION_TITLE, &options)
  }

  /// Close the clicked notification; `explore` opens the app root.
  pub fn handle_notification_click(
    &self,
    click: &NotificationClick,
  ) -> Result<ClickOutcome, WorkerError> {
    self.host.close_notification(click.notification_id);

    if click.action == EXPLORE_ACTION {
      let url = self.resolve(ROOT_URL)?;
      self.host.open_window(&url)?;
      return Ok(ClickOutcome::OpenedWindow(url));
    }
    Ok(ClickOutcome::Closed)
  }

  /// One background sync attempt. Failures are logged, never retried here.
  pub async fn handle_sync(&self, tag: &str) -> SyncOutcome {
    if tag != SYNC_TAG {
      debug!(tag, "ignoring sync tag");
      return SyncOutcome::Ignored;
    }

    match self.sync_once().await {
      Ok(data) => {
        info!(%data, "background sync complete");
        SyncOutcome::Completed(data)
      }
      Err(e) => {
        error!(error = %e, "background sync failed");
        SyncOutcome::Failed(e.to_string())
      }
    }
  }

  async fn sync_once(&self) -> Result<Value, WorkerError> {
    let url = self.resolve(&self.settings.sync_endpoint)?;
    let response = self.fetcher.fetch(&Request::get(url)).await?;
    Ok(serde_json::from_slice(&response.body)?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::worker::notifications::DEFAULT_PUSH_BODY;
  use crate::worker::storage::MemoryCacheStorage;
  use crate::worker::traits::{CacheSource, ResponseType};
  use crate::worker::SYNC_ENDPOINT;
  use std::collections::HashMap;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Mutex;

  const ORIGIN: &str = "https://futbol.test/";

  #[derive(Default)]
  struct FakeFetcher {
    routes: HashMap<String, Response>,
    calls: AtomicUsize,
  }

  impl FakeFetcher {
    fn route(mut self, url: &str, status: u16, response_type: ResponseType, body: &str) -> Self {
      self.routes.insert(
        url.to_string(),
        Response {
          url: url.to_string(),
          status,
          response_type,
          content_type: None,
          body: body.as_bytes().to_vec(),
        },
      );
      self
    }

    fn calls(&self) -> usize {
      self.calls.load(Ordering::SeqCst)
    }
  }

  impl Fetcher for FakeFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, WorkerError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      self
        .routes
        .get(&request.url)
        .cloned()
        .ok_or_else(|| WorkerError::Network {
          url: request.url.clone(),
          reason: "connection refused".to_string(),
        })
    }
  }

  #[derive(Default)]
  struct RecordingHost {
    shown: Mutex<Vec<(String, NotificationOptions)>>,
    closed: Mutex<Vec<u64>>,
    windows: Mutex<Vec<String>>,
  }

  impl WorkerHost for RecordingHost {
    fn show_notification(
      &self,
      title: &str,
      options: &NotificationOptions,
    ) -> Result<u64, WorkerError> {
      let mut shown = self.shown.lock().unwrap();
      shown.push((title.to_string(), options.clone()));
      Ok(shown.len() as u64)
    }

    fn close_notification(&self, id: u64) {
      self.closed.lock().unwrap().push(id);
    }

    fn open_window(&self, url: &str) -> Result<(), WorkerError> {
      self.windows.lock().unwrap().push(url.to_string());
      Ok(())
    }
  }

  fn settings(manifest: &[&str]) -> WorkerSettings {
    WorkerSettings {
      origin: Url::parse(ORIGIN).unwrap(),
      cache_name: "v_current".to_string(),
      manifest: manifest.iter().map(|s| s.to_string()).collect(),
      sync_endpoint: SYNC_ENDPOINT.to_string(),
    }
  }

  fn worker(
    manifest: &[&str],
    fetcher: FakeFetcher,
  ) -> OfflineWorker<MemoryCacheStorage, FakeFetcher, RecordingHost> {
    OfflineWorker::new(
      settings(manifest),
      MemoryCacheStorage::new(),
      fetcher,
      RecordingHost::default(),
    )
  }

  fn shell_fetcher() -> FakeFetcher {
    FakeFetcher::default()
      .route("https://futbol.test/", 200, ResponseType::Basic, "root")
      .route("https://futbol.test/index.html", 200, ResponseType::Basic, "index")
      .route("https://futbol.test/estilo.css", 200, ResponseType::Basic, "css")
  }

  #[tokio::test]
  async fn test_install_caches_manifest() {
    let mut w = worker(&["/", "/index.html", "/estilo.css"], shell_fetcher());
    let entries = w.install().await.unwrap();
    assert_eq!(entries, 3);
    assert_eq!(w.state(), WorkerState::Installed);
    assert_eq!(w.storage().entry_count("v_current").unwrap(), 3);
  }

  #[tokio::test]
  async fn test_install_fails_atomically_on_404() {
    let fetcher = shell_fetcher().route(
      "https://futbol.test/missing.js",
      404,
      ResponseType::Basic,
      "",
    );
    let mut w = worker(&["/", "/index.html", "/missing.js", "/estilo.css"], fetcher);

    let err = w.install().await.unwrap_err();
    assert!(matches!(err, WorkerError::Install { ref url, .. } if url.ends_with("/missing.js")));
    assert_eq!(w.state(), WorkerState::Redundant);
    assert_eq!(w.storage().entry_count("v_current").unwrap(), 0);
    assert!(w.storage().keys().unwrap().is_empty());
    assert!(matches!(w.activate(), Err(WorkerError::Redundant)));
  }

  #[tokio::test]
  async fn test_install_fails_on_network_error() {
    let mut w = worker(&["/", "/offline.html"], shell_fetcher());
    assert!(w.install().await.is_err());
    assert_eq!(w.state(), WorkerState::Redundant);
  }

  #[tokio::test]
  async fn test_activate_requires_install() {
    let mut w = worker(&[], FakeFetcher::default());
    assert!(matches!(w.activate(), Err(WorkerError::NotInstalled)));
  }

  #[tokio::test]
  async fn test_fetch_caches_then_serves_from_cache() {
    let w = worker(&[], shell_fetcher());

    let first = w.handle_fetch(Request::get("/index.html")).await.unwrap();
    assert_eq!(first.source, CacheSource::Network);
    assert_eq!(w.fetcher.calls(), 1);

    let second = w.handle_fetch(Request::get("/index.html")).await.unwrap();
    assert_eq!(second.source, CacheSource::Cache);
    assert_eq!(second.response.body, b"index");
    assert_eq!(w.fetcher.calls(), 1);
  }

  #[tokio::test]
  async fn test_fetch_does_not_cache_cross_origin_or_errors() {
    let fetcher = FakeFetcher::default()
      .route("https://cdn.test/font.css", 200, ResponseType::Cors, "font")
      .route("https://futbol.test/gone", 404, ResponseType::Basic, "");
    let w = worker(&[], fetcher);

    let cors = w
      .handle_fetch(Request::get("https://cdn.test/font.css"))
      .await
      .unwrap();
    assert_eq!(cors.response.status, 200);
    let gone = w.handle_fetch(Request::get("/gone")).await.unwrap();
    assert_eq!(gone.response.status, 404);

    assert_eq!(w.storage().entry_count("v_current").unwrap(), 0);
    w.handle_fetch(Request::get("/gone")).await.unwrap();
    assert_eq!(w.fetcher.calls(), 3);
  }

  #[tokio::test]
  async fn test_fetch_skips_caching_non_get() {
    let w = worker(&[], shell_fetcher());
    let request = Request {
      method: Method::POST,
      url: "/index.html".to_string(),
    };
    w.handle_fetch(request).await.unwrap();
    assert_eq!(w.storage().entry_count("v_current").unwrap(), 0);
  }

  #[tokio::test]
  async fn test_fetch_propagates_network_error() {
    let w = worker(&[], FakeFetcher::default());
    let err = w.handle_fetch(Request::get("/index.html")).await.unwrap_err();
    assert!(matches!(err, WorkerError::Network { .. }));
  }

  #[tokio::test]
  async fn test_activate_purges_stale_versions() {
    let mut w = worker(&["/"], shell_fetcher());
    let stale = Response {
      url: "https://futbol.test/old.css".to_string(),
      status: 200,
      response_type: ResponseType::Basic,
      content_type: None,
      body: b"old".to_vec(),
    };
    w.storage().put("v1", &stale.url, &stale).unwrap();
    w.storage().put("v2", &stale.url, &stale).unwrap();
    w.install().await.unwrap();

    let purged = w.activate().unwrap();
    assert_eq!(purged, vec!["v1".to_string(), "v2".to_string()]);
    assert_eq!(w.storage().keys().unwrap(), vec!["v_current".to_string()]);
    assert_eq!(w.state(), WorkerState::Activated);
  }

  #[tokio::test]
  async fn test_push_shows_notification() {
    let mut w = worker(&[], FakeFetcher::default());
    let reply = w
      .dispatch(WorkerEvent::Push(PushEvent {
        data: Some("Gol de Messi".to_string()),
      }))
      .await
      .unwrap();
    assert!(matches!(reply, WorkerReply::NotificationShown { id: 1 }));

    w.handle_push(&PushEvent::default()).unwrap();
    let shown = w.host.shown.lock().unwrap();
    assert_eq!(shown[0].0, NOTIFICATION_TITLE);
    assert_eq!(shown[0].1.body, "Gol de Messi");
    assert_eq!(shown[1].1.body, DEFAULT_PUSH_BODY);
  }

  #[tokio::test]
  async fn test_notification_click_actions() {
    let w = worker(&[], FakeFetcher::default());

    let explore = w
      .handle_notification_click(&NotificationClick {
        notification_id: 3,
        action: EXPLORE_ACTION.to_string(),
      })
      .unwrap();
    assert_eq!(explore, ClickOutcome::OpenedWindow(ORIGIN.to_string()));

    let close = w
      .handle_notification_click(&NotificationClick {
        notification_id: 4,
        action: "close".to_string(),
      })
      .unwrap();
    assert_eq!(close, ClickOutcome::Closed);

    assert_eq!(*w.host.closed.lock().unwrap(), vec![3, 4]);
    assert_eq!(*w.host.windows.lock().unwrap(), vec![ORIGIN.to_string()]);
  }

  #[tokio::test]
  async fn test_dispatch_notification_click() {
    let mut w = worker(&[], FakeFetcher::default());

    let reply = w
      .dispatch(WorkerEvent::NotificationClick(NotificationClick {
        notification_id: 7,
        action: EXPLORE_ACTION.to_string(),
      }))
      .await
      .unwrap();
    assert!(
      matches!(reply, WorkerReply::Clicked(ClickOutcome::OpenedWindow(ref url)) if url == ORIGIN)
    );

    // Clicking the body carries no action
    let reply = w
      .dispatch(WorkerEvent::NotificationClick(NotificationClick {
        notification_id: 8,
        action: String::new(),
      }))
      .await
      .unwrap();
    assert!(matches!(reply, WorkerReply::Clicked(ClickOutcome::Closed)));
    assert_eq!(*w.host.closed.lock().unwrap(), vec![7, 8]);
    assert_eq!(w.host.windows.lock().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn test_dispatch_sync() {
    let fetcher = FakeFetcher::default().route(
      "https://futbol.test/api/sync",
      200,
      ResponseType::Basic,
      r#"{"matches": []}"#,
    );
    let mut w = worker(&[], fetcher);

    let reply = w
      .dispatch(WorkerEvent::Sync {
        tag: SYNC_TAG.to_string(),
      })
      .await
      .unwrap();
    match reply {
      WorkerReply::Synced(SyncOutcome::Completed(data)) => assert!(data["matches"].is_array()),
      other => panic!("unexpected {:?}", other),
    }

    let reply = w
      .dispatch(WorkerEvent::Sync {
        tag: "periodic".to_string(),
      })
      .await
      .unwrap();
    assert!(matches!(reply, WorkerReply::Synced(SyncOutcome::Ignored)));
    assert_eq!(w.fetcher.calls(), 1);
  }

  #[tokio::test]
  async fn test_background_sync() {
    let fetcher = FakeFetcher::default().route(
      "https://futbol.test/api/sync",
      200,
      ResponseType::Basic,
      r#"{"synced": 2}"#,
    );
    let w = worker(&[], fetcher);

    match w.handle_sync(SYNC_TAG).await {
      SyncOutcome::Completed(data) => assert_eq!(data["synced"], 2),
      other => panic!("unexpected {:?}", other),
    }
    assert_eq!(w.handle_sync("other-tag").await, SyncOutcome::Ignored);
    assert_eq!(w.fetcher.calls(), 1);
  }

  #[tokio::test]
  async fn test_background_sync_failure_is_reported() {
    let w = worker(&[], FakeFetcher::default());
    assert!(matches!(
      w.handle_sync(SYNC_TAG).await,
      SyncOutcome::Failed(_)
    ));
  }
}
