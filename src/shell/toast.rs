//! Transient toast messages.

use std::time::Duration;

pub const TOAST_DURATION: Duration = Duration::from_millis(3000);
/// Time the hide animation runs before the toast is removed.
pub const TOAST_REMOVAL: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
  Success,
  Info,
  Warning,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
  pub message: String,
  pub kind: ToastKind,
  /// Offset from the shell clock at which the toast was shown
  pub shown_at: Duration,
  pub duration: Duration,
}

impl Toast {
  /// Still showing, before the hide animation starts.
  pub fn is_shown(&self, now: Duration) -> bool {
    now < self.shown_at + self.duration
  }

  /// Removed from the page once the hide animation has finished.
  pub fn is_removed(&self, now: Duration) -> bool {
    now >= self.shown_at + self.duration + TOAST_REMOVAL
  }
}

#[derive(Debug, Default)]
pub struct ToastQueue {
  toasts: Vec<Toast>,
}

impl ToastQueue {
  pub fn show(&mut self, message: impl Into<String>, kind: ToastKind, now: Duration) {
    self.show_for(message, kind, now, TOAST_DURATION);
  }

  pub fn show_for(
    &mut self,
    message: impl Into<String>,
    kind: ToastKind,
    now: Duration,
    duration: Duration,
  ) {
    self.toasts.push(Toast {
      message: message.into(),
      kind,
      shown_at: now,
      duration,
    });
  }

  /// Drop every toast whose removal time has passed.
  pub fn prune(&mut self, now: Duration) {
    self.toasts.retain(|t| !t.is_removed(now));
  }

  pub fn visible(&self, now: Duration) -> impl Iterator<Item = &Toast> {
    self.toasts.iter().filter(move |t| t.is_shown(now))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_toast_lifecycle() {
    let mut queue = ToastQueue::default();
    queue.show("Conexión restaurada", ToastKind::Success, Duration::ZERO);

    assert_eq!(queue.visible(Duration::from_millis(2999)).count(), 1);
    assert_eq!(queue.visible(Duration::from_millis(3000)).count(), 0);

    // Hidden but still animating out
    queue.prune(Duration::from_millis(3200));
    assert_eq!(queue.toasts.len(), 1);

    queue.prune(Duration::from_millis(3300));
    assert!(queue.toasts.is_empty());
  }

  #[test]
  fn test_custom_duration() {
    let mut queue = ToastQueue::default();
    queue.show_for("x", ToastKind::Error, Duration::ZERO, Duration::from_millis(500));
    queue.prune(Duration::from_millis(800));
    assert!(queue.toasts.is_empty());
  }
}
