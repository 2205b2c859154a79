//! Push notification payloads and the worker's host environment.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

use crate::error::WorkerError;

pub const NOTIFICATION_TITLE: &str = "Futbol Total";
pub const DEFAULT_PUSH_BODY: &str = "Nueva notificación de Futbol Total";
pub const APP_ICON: &str = "/img/logo_3-removebg-preview.png";
pub const EXPLORE_ACTION: &str = "explore";
pub const CLOSE_ACTION: &str = "close";

/// Options passed to the platform when showing a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOptions {
  pub body: String,
  pub icon: String,
  pub badge: String,
  pub vibrate: Vec<u32>,
  pub data: NotificationData,
  pub actions: Vec<NotificationAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
  /// Milliseconds since the Unix epoch
  pub date_of_arrival: i64,
  pub primary_key: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationAction {
  pub action: String,
  pub title: String,
  pub icon: String,
}

impl NotificationAction {
  fn new(action: &str, title: &str) -> Self {
    Self {
      action: action.to_string(),
      title: title.to_string(),
      icon: APP_ICON.to_string(),
    }
  }
}

impl NotificationOptions {
  /// Options for an incoming push message.
  pub fn for_push(body: Option<&str>, arrived_at_ms: i64) -> Self {
    Self {
      body: body.unwrap_or(DEFAULT_PUSH_BODY).to_string(),
      icon: APP_ICON.to_string(),
      badge: APP_ICON.to_string(),
      vibrate: vec![100, 50, 100],
      data: NotificationData {
        date_of_arrival: arrived_at_ms,
        primary_key: 1,
      },
      actions: vec![
        NotificationAction::new(EXPLORE_ACTION, "Ver más"),
        NotificationAction::new(CLOSE_ACTION, "Cerrar"),
      ],
    }
  }
}

/// A push message delivered to the worker. The payload is plain text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushEvent {
  pub data: Option<String>,
}

/// The user clicked a shown notification or one of its actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationClick {
  pub notification_id: u64,
  /// Empty when the body of the notification was clicked
  pub action: String,
}

/// Platform services available inside the worker context.
pub trait WorkerHost: Send + Sync {
  /// Display a notification, returning its id.
  fn show_notification(&self, title: &str, options: &NotificationOptions)
    -> Result<u64, WorkerError>;

  fn close_notification(&self, id: u64);

  /// Open (or focus) a client window at `url`.
  fn open_window(&self, url: &str) -> Result<(), WorkerError>;
}

/// Host that reports notifications and windows through the log.
#[derive(Default)]
pub struct LogHost {
  next_id: AtomicU64,
}

impl WorkerHost for LogHost {
  fn show_notification(
    &self,
    title: &str,
    options: &NotificationOptions,
  ) -> Result<u64, WorkerError> {
    let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
    info!(id, title, body = %options.body, "notification shown");
    Ok(id)
  }

  fn close_notification(&self, id: u64) {
    info!(id, "notification closed");
  }

  fn open_window(&self, url: &str) -> Result<(), WorkerError> {
    info!(url, "open window");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_push_options_default_body() {
    let opts = NotificationOptions::for_push(None, 42);
    assert_eq!(opts.body, DEFAULT_PUSH_BODY);
    assert_eq!(opts.vibrate, vec![100, 50, 100]);
    assert_eq!(opts.data.date_of_arrival, 42);
    assert_eq!(opts.data.primary_key, 1);
    let actions: Vec<&str> = opts.actions.iter().map(|a| a.action.as_str()).collect();
    assert_eq!(actions, vec![EXPLORE_ACTION, CLOSE_ACTION]);
  }

  #[test]
  fn test_push_options_serialize_camel_case() {
    let opts = NotificationOptions::for_push(Some("Gol!"), 7);
    let json = serde_json::to_value(&opts).unwrap();
    assert_eq!(json["body"], "Gol!");
    assert_eq!(json["data"]["dateOfArrival"], 7);
    assert_eq!(json["data"]["primaryKey"], 1);
    assert_eq!(json["actions"][0]["title"], "Ver más");
  }
}
