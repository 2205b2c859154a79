//! Core request/response types and the network seam of the worker.

use chrono::{DateTime, Utc};
use reqwest::Method;
use std::future::Future;

use crate::error::WorkerError;

/// How a response relates to the requesting origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
  /// Same-origin response
  Basic,
  /// Cross-origin response with readable body
  Cors,
  /// Cross-origin response without a readable body
  Opaque,
  /// Network error placeholder
  Error,
}

impl ResponseType {
  pub fn as_str(self) -> &'static str {
    match self {
      ResponseType::Basic => "basic",
      ResponseType::Cors => "cors",
      ResponseType::Opaque => "opaque",
      ResponseType::Error => "error",
    }
  }

  pub fn parse(s: &str) -> Self {
    match s {
      "basic" => ResponseType::Basic,
      "cors" => ResponseType::Cors,
      "opaque" => ResponseType::Opaque,
      _ => ResponseType::Error,
    }
  }
}

/// A request intercepted by the worker. `url` is absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
  pub method: Method,
  pub url: String,
}

impl Request {
  pub fn get(url: impl Into<String>) -> Self {
    Self {
      method: Method::GET,
      url: url.into(),
    }
  }
}

/// A response as returned to the page or stored in a cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
  pub url: String,
  pub status: u16,
  pub response_type: ResponseType,
  pub content_type: Option<String>,
  pub body: Vec<u8>,
}

impl Response {
  /// Status in the 2xx range
  pub fn ok(&self) -> bool {
    (200..300).contains(&self.status)
  }

  /// Only same-origin 200 responses are cached at runtime.
  pub fn is_cacheable(&self) -> bool {
    self.status == 200 && self.response_type == ResponseType::Basic
  }
}

/// A response read back from cache storage.
#[derive(Debug, Clone)]
pub struct CachedResponse {
  pub response: Response,
  pub cached_at: DateTime<Utc>,
}

/// Result of a fetch through the worker, including where it came from.
#[derive(Debug, Clone)]
pub struct CacheResult {
  pub response: Response,
  pub source: CacheSource,
  /// When the response was cached (if from cache)
  pub cached_at: Option<DateTime<Utc>>,
}

impl CacheResult {
  pub fn from_network(response: Response) -> Self {
    Self {
      response,
      source: CacheSource::Network,
      cached_at: None,
    }
  }

  pub fn from_cache(cached: CachedResponse) -> Self {
    Self {
      response: cached.response,
      source: CacheSource::Cache,
      cached_at: Some(cached.cached_at),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  Network,
  Cache,
}

/// Network access for the worker.
pub trait Fetcher: Send + Sync {
  fn fetch(&self, request: &Request) -> impl Future<Output = Result<Response, WorkerError>> + Send;
}
