//! Periodic reachability checks against the app origin.
//!
//! The terminal has no connection API, so the app fetches the origin on a
//! timer. Any HTTP response counts as online; the round trip time doubles as
//! the connection estimate shown in the footer.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::event::Event;
use crate::shell::capabilities::NetworkInfo;
use crate::worker::{Fetcher, Request, Response};

/// How often the origin is checked.
pub const CHECK_INTERVAL: Duration = Duration::from_secs(15);

/// Outcome of one reachability check.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkCheck {
  pub online: bool,
  pub info: Option<NetworkInfo>,
}

impl NetworkCheck {
  fn offline() -> Self {
    Self {
      online: false,
      info: None,
    }
  }
}

/// Effective connection type for a round trip, using the browser thresholds.
pub fn effective_type(rtt: Duration) -> &'static str {
  match rtt.as_millis() {
    0..=269 => "4g",
    270..=1399 => "3g",
    1400..=1999 => "2g",
    _ => "slow-2g",
  }
}

/// Connection estimate from one response and how long it took.
pub fn measure(response: &Response, elapsed: Duration) -> NetworkInfo {
  let secs = elapsed.as_secs_f64();
  let mbits = if secs > 0.0 {
    response.body.len() as f64 * 8.0 / secs / 1_000_000.0
  } else {
    0.0
  };
  NetworkInfo {
    effective_type: effective_type(elapsed).to_string(),
    downlink: (mbits * 100.0).round() / 100.0,
    rtt: u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX),
  }
}

/// Fetch `url` once and time it.
pub async fn check<F: Fetcher>(fetcher: &F, url: &str) -> NetworkCheck {
  let started = Instant::now();
  match fetcher.fetch(&Request::get(url)).await {
    Ok(response) => NetworkCheck {
      online: true,
      info: Some(measure(&response, started.elapsed())),
    },
    Err(e) => {
      debug!(error = %e, "origin unreachable");
      NetworkCheck::offline()
    }
  }
}

/// Check `url` every `every` until the app stops listening.
pub async fn watch<F: Fetcher>(
  fetcher: F,
  url: String,
  every: Duration,
  tx: mpsc::UnboundedSender<Event>,
) {
  let mut interval = time::interval(every);
  interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
  loop {
    interval.tick().await;
    let result = check(&fetcher, &url).await;
    if tx.send(Event::Network(result)).is_err() {
      break;
    }
  }
}

/// Turns check results into online/offline transitions.
///
/// Starts online, as a freshly loaded page does.
#[derive(Debug)]
pub struct Connectivity {
  online: bool,
}

impl Default for Connectivity {
  fn default() -> Self {
    Self { online: true }
  }
}

impl Connectivity {
  /// The new state, when it differs from the last one.
  pub fn observe(&mut self, online: bool) -> Option<bool> {
    if online == self.online {
      return None;
    }
    self.online = online;
    info!(online, "connectivity changed");
    Some(online)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::WorkerError;
  use crate::worker::ResponseType;
  use std::collections::VecDeque;
  use std::sync::Mutex;

  /// Answers with a 1 KB page after `delay`, or fails when scripted to.
  struct SlowOrigin {
    delay: Duration,
    up: Mutex<VecDeque<bool>>,
  }

  impl SlowOrigin {
    fn new(delay_ms: u64, up: &[bool]) -> Self {
      Self {
        delay: Duration::from_millis(delay_ms),
        up: Mutex::new(up.iter().copied().collect()),
      }
    }
  }

  impl Fetcher for SlowOrigin {
    async fn fetch(&self, request: &Request) -> Result<Response, WorkerError> {
      let up = self.up.lock().unwrap().pop_front().unwrap_or(true);
      time::sleep(self.delay).await;
      if !up {
        return Err(WorkerError::Network {
          url: request.url.clone(),
          reason: "connection refused".to_string(),
        });
      }
      Ok(Response {
        url: request.url.clone(),
        status: 200,
        response_type: ResponseType::Basic,
        content_type: Some("text/html".to_string()),
        body: vec![b'x'; 1000],
      })
    }
  }

  #[test]
  fn test_effective_type_thresholds() {
    assert_eq!(effective_type(Duration::from_millis(50)), "4g");
    assert_eq!(effective_type(Duration::from_millis(270)), "3g");
    assert_eq!(effective_type(Duration::from_millis(1500)), "2g");
    assert_eq!(effective_type(Duration::from_secs(3)), "slow-2g");
  }

  #[tokio::test(start_paused = true)]
  async fn test_check_measures_round_trip() {
    let origin = SlowOrigin::new(100, &[true]);
    let result = check(&origin, "https://futbol.test/").await;
    assert!(result.online);
    let info = result.info.unwrap();
    assert_eq!(info.effective_type, "4g");
    assert_eq!(info.rtt, 100);
    // 8000 bits in 0.1s
    assert_eq!(info.downlink, 0.08);
  }

  #[tokio::test(start_paused = true)]
  async fn test_check_reports_offline() {
    let origin = SlowOrigin::new(10, &[false]);
    assert_eq!(
      check(&origin, "https://futbol.test/").await,
      NetworkCheck::offline()
    );
  }

  #[tokio::test(start_paused = true)]
  async fn test_watch_reports_every_interval() {
    let origin = SlowOrigin::new(10, &[true, false, true]);
    let (tx, mut rx) = mpsc::unbounded_channel();
    tokio::spawn(watch(
      origin,
      "https://futbol.test/".to_string(),
      Duration::from_secs(15),
      tx,
    ));

    let mut seen = Vec::new();
    for _ in 0..3 {
      match rx.recv().await {
        Some(Event::Network(result)) => seen.push(result.online),
        other => panic!("unexpected {:?}", other),
      }
    }
    assert_eq!(seen, vec![true, false, true]);
  }

  #[test]
  fn test_connectivity_reports_changes_only() {
    let mut connectivity = Connectivity::default();
    assert_eq!(connectivity.observe(true), None);
    assert_eq!(connectivity.observe(false), Some(false));
    assert_eq!(connectivity.observe(false), None);
    assert_eq!(connectivity.observe(true), Some(true));
  }
}
