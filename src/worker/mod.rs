//! Offline cache worker for the app shell.
//!
//! Runs in its own context with no access to the page:
//! - Pre-caches the app shell on install (all or nothing)
//! - Serves requests cache-first, falling back to the network and caching
//!   same-origin successes
//! - Purges stale cache versions on activation
//! - Shows push notifications, handles notification clicks and background sync

mod http;
mod notifications;
mod offline;
mod storage;
mod traits;

pub use http::HttpFetcher;
pub use notifications::{
  LogHost, NotificationClick, NotificationOptions, PushEvent, APP_ICON, NOTIFICATION_TITLE,
};
pub use offline::{
  ClickOutcome, OfflineWorker, SyncOutcome, WorkerEvent, WorkerReply, WorkerSettings, WorkerState,
};
pub use storage::{CacheStorage, SqliteCacheStorage};
pub use traits::{Fetcher, Request, Response};
#[cfg(test)]
pub use traits::ResponseType;

/// Current cache generation. Bump on deploy to invalidate every old entry.
pub const CACHE_NAME: &str = "futbol-total-v1";

pub const SYNC_ENDPOINT: &str = "/api/sync";
pub const SYNC_TAG: &str = "background-sync";
pub const ROOT_URL: &str = "/";

/// Script URL the shell registers.
pub const WORKER_SCRIPT: &str = "/sw.js";

/// App shell pre-cached on install.
pub const APP_SHELL: &[&str] = &[
  "/",
  "/index.html",
  "/loguin.html",
  "/ajustes.html",
  "/pantalla de carga.html",
  "/estilo.css",
  "/styles.css",
  "/ajustes.css",
  "/cargando.css",
  "/mobile-styles.css",
  "/mobile-components.js",
  "/ajustes.js",
  "/cargando.js",
  "/img/logo_3-removebg-preview.png",
  "/img/logo_3-removebg-preview.ico",
  "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.0.0-beta3/css/all.min.css",
];
