use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

use crate::loading;
use crate::session::{UserMetadata, UserRecord};
use crate::worker::{self, WorkerSettings};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Origin the app is served from; relative URLs resolve against it
  pub origin: String,
  pub worker: WorkerConfig,
  pub loading: LoadingConfig,
  /// Account served by the local identity provider (signed out if absent)
  pub account: Option<AccountConfig>,
  /// Path of the local database (defaults to the XDG data directory)
  pub database: Option<PathBuf>,
  /// User agent used for device classification
  pub user_agent: Option<String>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      origin: "http://localhost:8080/".to_string(),
      worker: WorkerConfig::default(),
      loading: LoadingConfig::default(),
      account: None,
      database: None,
      user_agent: None,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
  /// Cache generation name; bump to invalidate every cached entry
  pub cache_name: String,
  /// App shell URLs pre-cached on install
  pub manifest: Vec<String>,
  pub sync_endpoint: String,
}

impl Default for WorkerConfig {
  fn default() -> Self {
    Self {
      cache_name: worker::CACHE_NAME.to_string(),
      manifest: worker::APP_SHELL.iter().map(|u| u.to_string()).collect(),
      sync_endpoint: worker::SYNC_ENDPOINT.to_string(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoadingConfig {
  pub timeout_ms: u64,
  pub next_page: String,
}

impl Default for LoadingConfig {
  fn default() -> Self {
    Self {
      timeout_ms: loading::HARD_TIMEOUT.as_millis() as u64,
      next_page: loading::NEXT_PAGE.to_string(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
  pub email: String,
  pub created: Option<DateTime<Utc>>,
  pub last_sign_in: Option<DateTime<Utc>>,
}

impl From<AccountConfig> for UserRecord {
  fn from(account: AccountConfig) -> Self {
    UserRecord {
      email: account.email,
      metadata: UserMetadata {
        creation_time: account.created,
        last_sign_in_time: account.last_sign_in,
      },
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./futbol-total.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/futbol-total/config.yaml
  ///
  /// Without any file the defaults are used.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("futbol-total.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("futbol-total").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;
    config.origin_url()?;
    Ok(config)
  }

  pub fn origin_url(&self) -> Result<Url> {
    Url::parse(&self.origin).map_err(|e| eyre!("Invalid origin '{}': {}", self.origin, e))
  }

  pub fn worker_settings(&self) -> Result<WorkerSettings> {
    Ok(WorkerSettings {
      origin: self.origin_url()?,
      cache_name: self.worker.cache_name.clone(),
      manifest: self.worker.manifest.clone(),
      sync_endpoint: self.worker.sync_endpoint.clone(),
    })
  }

  /// Path of the local database.
  pub fn database_path(&self) -> Result<PathBuf> {
    match &self.database {
      Some(path) => Ok(path.clone()),
      None => crate::db::default_path().map_err(|e| eyre!("{}", e)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_config_uses_defaults() {
    let config = Config::parse("{}").unwrap();
    assert_eq!(config.worker.cache_name, worker::CACHE_NAME);
    assert_eq!(config.worker.manifest.len(), worker::APP_SHELL.len());
    assert_eq!(config.loading.timeout_ms, 5000);
    assert!(config.account.is_none());
  }

  #[test]
  fn test_parse_overrides_and_account() {
    let yaml = r#"
origin: https://futbol.example/
worker:
  cache_name: futbol-total-v2
account:
  email: messi@futbol.com
  created: 2023-03-05T10:00:00Z
"#;
    let config = Config::parse(yaml).unwrap();
    let settings = config.worker_settings().unwrap();
    assert_eq!(settings.cache_name, "futbol-total-v2");
    assert_eq!(settings.sync_endpoint, worker::SYNC_ENDPOINT);
    assert_eq!(settings.origin.as_str(), "https://futbol.example/");

    let user: UserRecord = config.account.unwrap().into();
    assert_eq!(user.email, "messi@futbol.com");
    assert!(user.metadata.creation_time.is_some());
    assert!(user.metadata.last_sign_in_time.is_none());
  }

  #[test]
  fn test_invalid_origin_is_rejected() {
    assert!(Config::parse("origin: not a url").is_err());
  }
}
