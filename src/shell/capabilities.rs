//! Platform capabilities used by the shell, and soft wrappers over them.
//!
//! Every capability has a default that reports it as missing, so a platform
//! only implements what it actually offers.

use serde::Serialize;
use tracing::debug;

use crate::error::ShellError;

pub const DEFAULT_VIBRATION: &[u32] = &[100];
pub const WAKE_LOCK_UNSUPPORTED: &str = "Wake Lock no soportado";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permission {
  #[default]
  Default,
  Granted,
  Denied,
}

/// Connection details reported by the platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
  pub effective_type: String,
  /// Mbit/s
  pub downlink: f64,
  /// Round trip estimate in ms
  pub rtt: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareData {
  pub title: Option<String>,
  pub text: Option<String>,
  pub url: Option<String>,
}

impl ShareData {
  /// Text copied when native sharing is missing. The URL wins over the text.
  pub fn fallback_text(&self) -> Option<&str> {
    self.url.as_deref().or(self.text.as_deref())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
  Shared,
  Copied(String),
  Unavailable,
}

/// Notification shown from the page itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNotification {
  pub title: String,
  pub body: Option<String>,
  pub icon: String,
  pub badge: String,
}

pub trait Platform {
  fn user_agent(&self) -> String;

  fn supports_notifications(&self) -> bool {
    false
  }

  fn supports_service_worker(&self) -> bool {
    false
  }

  fn notification_permission(&self) -> Permission {
    Permission::Default
  }

  fn request_notification_permission(&mut self) -> Permission {
    Permission::Denied
  }

  fn show_notification(&mut self, _notification: &PageNotification) -> Result<(), ShellError> {
    Err(ShellError::Unsupported("notifications"))
  }

  fn register_service_worker(&mut self, _script: &str) -> Result<(), ShellError> {
    Err(ShellError::Unsupported("service worker"))
  }

  /// Returns false when the device can not vibrate.
  fn vibrate(&mut self, _pattern: &[u32]) -> bool {
    false
  }

  fn is_online(&self) -> bool {
    true
  }

  fn connection(&self) -> Option<NetworkInfo> {
    None
  }

  fn share(&mut self, _data: &ShareData) -> Result<(), ShellError> {
    Err(ShellError::Unsupported("share"))
  }

  fn clipboard_write(&mut self, _text: &str) -> Result<(), ShellError> {
    Err(ShellError::Unsupported("clipboard"))
  }

  fn request_wake_lock(&mut self) -> Result<(), ShellError> {
    Err(ShellError::Unsupported(WAKE_LOCK_UNSUPPORTED))
  }

  /// Angle from the screen orientation API.
  fn screen_orientation_angle(&self) -> Option<i32> {
    None
  }

  /// Legacy window orientation.
  fn window_orientation(&self) -> Option<i32> {
    None
  }
}

pub fn vibrate<P: Platform + ?Sized>(platform: &mut P, pattern: Option<&[u32]>) {
  let pattern = pattern.unwrap_or(DEFAULT_VIBRATION);
  if !platform.vibrate(pattern) {
    debug!("vibration not supported");
  }
}

pub fn is_online<P: Platform + ?Sized>(platform: &P) -> bool {
  platform.is_online()
}

pub fn network_info<P: Platform + ?Sized>(platform: &P) -> Option<NetworkInfo> {
  platform.connection()
}

/// Share natively, falling back to copying to the clipboard.
pub fn share_content<P: Platform + ?Sized>(
  platform: &mut P,
  data: &ShareData,
) -> Result<ShareOutcome, ShellError> {
  match platform.share(data) {
    Ok(()) => return Ok(ShareOutcome::Shared),
    Err(ShellError::Unsupported(_)) => {}
    Err(e) => return Err(e),
  }

  let Some(text) = data.fallback_text() else {
    return Ok(ShareOutcome::Unavailable);
  };
  match platform.clipboard_write(text) {
    Ok(()) => Ok(ShareOutcome::Copied(text.to_string())),
    Err(ShellError::Unsupported(_)) => Ok(ShareOutcome::Unavailable),
    Err(e) => Err(e),
  }
}

pub fn request_wake_lock<P: Platform + ?Sized>(platform: &mut P) -> Result<(), ShellError> {
  platform.request_wake_lock()
}

pub fn detect_orientation<P: Platform + ?Sized>(platform: &P) -> i32 {
  platform
    .screen_orientation_angle()
    .or_else(|| platform.window_orientation())
    .unwrap_or(0)
}
