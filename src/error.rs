//! Typed errors for the worker, the shell and the persisted preferences.

use thiserror::Error;

/// Errors raised inside the offline cache worker.
#[derive(Error, Debug)]
pub enum WorkerError {
  /// A manifest entry could not be fetched; nothing was cached.
  #[error("install failed: {url} ({reason})")]
  Install { url: String, reason: String },

  /// The worker failed to install and can not be activated.
  #[error("worker is redundant and can not be activated")]
  Redundant,

  /// Activation was requested before a successful install.
  #[error("worker has not been installed")]
  NotInstalled,

  /// Network failure while fetching a request.
  #[error("network error for {url}: {reason}")]
  Network { url: String, reason: String },

  /// Relative URL could not be resolved against the origin.
  #[error("invalid url '{0}': {1}")]
  InvalidUrl(String, url::ParseError),

  /// Cache storage backend failure.
  #[error("cache storage error: {0}")]
  Storage(String),

  /// Background sync returned something that is not JSON.
  #[error("sync response is not valid JSON: {0}")]
  SyncPayload(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for WorkerError {
  fn from(e: rusqlite::Error) -> Self {
    WorkerError::Storage(e.to_string())
  }
}

/// Errors raised by the mobile shell.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
  /// Navigation target is not in the page registry.
  #[error("unknown page '{0}'")]
  UnknownPage(String),

  /// A platform capability is missing on this device.
  #[error("{0}")]
  Unsupported(&'static str),

  /// The platform reported a failure while using a capability.
  #[error("{0}")]
  Platform(String),
}

/// Errors from the preference store.
#[derive(Error, Debug)]
pub enum PrefsError {
  #[error("preference storage error: {0}")]
  Storage(#[from] rusqlite::Error),

  #[error("could not determine data directory")]
  NoDataDir,

  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),
}

/// Error reported by the identity provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
  pub message: String,
}

impl ProviderError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }
}
