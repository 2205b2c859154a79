//! Touch gesture tracking and pull-to-refresh detection.

/// Downward travel (px) needed before a pull at the top refreshes.
pub const PULL_THRESHOLD: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
  pub x: f64,
  pub y: f64,
}

impl TouchPoint {
  pub fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
  PullToRefresh,
}

/// Tracks one touch gesture from start to end.
///
/// Deltas are `start - current`, so a finger moving down gives a negative
/// `dy`. A vertical gesture is an ordinary scroll unless it is a downward
/// pull that began with the page at the top; only those can refresh.
#[derive(Debug, Default)]
pub struct GestureTracker {
  start: Option<TouchPoint>,
  start_scroll_y: f64,
  scrolling: bool,
  refreshed: bool,
}

impl GestureTracker {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn touch_start(&mut self, point: TouchPoint, scroll_y: f64) {
    self.start = Some(point);
    self.start_scroll_y = scroll_y;
    self.scrolling = false;
    self.refreshed = false;
  }

  pub fn touch_move(&mut self, point: TouchPoint, scroll_y: f64) -> Option<GestureEvent> {
    let start = self.start?;
    let dy = start.y - point.y;
    let dx = start.x - point.x;

    if dy.abs() > dx.abs() {
      let pulling_from_top = dy < 0.0 && self.start_scroll_y <= 0.0;
      if !pulling_from_top {
        self.scrolling = true;
      }
    }

    if dy < -PULL_THRESHOLD && scroll_y <= 0.0 && !self.scrolling && !self.refreshed {
      self.refreshed = true;
      return Some(GestureEvent::PullToRefresh);
    }
    None
  }

  pub fn touch_end(&mut self) {
    self.start = None;
    self.start_scroll_y = 0.0;
    self.scrolling = false;
    self.refreshed = false;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pull(tracker: &mut GestureTracker, scroll_y: f64, to: TouchPoint) -> Option<GestureEvent> {
    tracker.touch_start(TouchPoint::new(100.0, 200.0), scroll_y);
    tracker.touch_move(to, scroll_y)
  }

  #[test]
  fn test_pull_down_at_top_refreshes() {
    let mut tracker = GestureTracker::new();
    let event = pull(&mut tracker, 0.0, TouchPoint::new(110.0, 320.0));
    assert_eq!(event, Some(GestureEvent::PullToRefresh));
  }

  #[test]
  fn test_pull_down_mid_scroll_does_not_refresh() {
    let mut tracker = GestureTracker::new();
    let event = pull(&mut tracker, 250.0, TouchPoint::new(110.0, 320.0));
    assert_eq!(event, None);
    assert!(tracker.scrolling);
  }

  #[test]
  fn test_short_pull_does_not_refresh() {
    let mut tracker = GestureTracker::new();
    assert_eq!(pull(&mut tracker, 0.0, TouchPoint::new(100.0, 290.0)), None);
    // Crossing the threshold later in the same gesture still counts
    assert_eq!(
      tracker.touch_move(TouchPoint::new(100.0, 301.0), 0.0),
      Some(GestureEvent::PullToRefresh)
    );
  }

  #[test]
  fn test_refresh_fires_once_per_gesture() {
    let mut tracker = GestureTracker::new();
    assert!(pull(&mut tracker, 0.0, TouchPoint::new(100.0, 320.0)).is_some());
    assert_eq!(tracker.touch_move(TouchPoint::new(100.0, 400.0), 0.0), None);

    tracker.touch_end();
    assert!(pull(&mut tracker, 0.0, TouchPoint::new(100.0, 320.0)).is_some());
  }

  #[test]
  fn test_upward_scroll_blocks_refresh() {
    let mut tracker = GestureTracker::new();
    tracker.touch_start(TouchPoint::new(100.0, 200.0), 0.0);
    assert_eq!(tracker.touch_move(TouchPoint::new(100.0, 150.0), 0.0), None);
    assert!(tracker.scrolling);
    assert_eq!(tracker.touch_move(TouchPoint::new(100.0, 320.0), 0.0), None);
  }

  #[test]
  fn test_horizontal_swipe_is_not_scroll() {
    let mut tracker = GestureTracker::new();
    tracker.touch_start(TouchPoint::new(100.0, 200.0), 50.0);
    assert_eq!(tracker.touch_move(TouchPoint::new(300.0, 210.0), 50.0), None);
    assert!(!tracker.scrolling);
  }

  #[test]
  fn test_move_without_start_is_ignored() {
    let mut tracker = GestureTracker::new();
    assert_eq!(tracker.touch_move(TouchPoint::new(0.0, 500.0), 0.0), None);
  }
}
