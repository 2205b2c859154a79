//! Simulated loading screen.
//!
//! A tick-driven progress counter with a circular progress indicator and a
//! list of labelled phases. The sequence always ends: by reaching 100, by a
//! user skip, or by the hard timeout.

use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant};
use tracing::{debug, info};

use crate::page::{ids, Document};

/// Circumference of the progress ring (`2πr` for r = 45).
pub const RING_LENGTH: f64 = 282.6;

/// Page that hosts the loading screen.
pub const LOADING_PAGE: &str = "pantalla de carga.html";
/// Page the loading screen hands over to.
pub const NEXT_PAGE: &str = "loguin.html";

pub const TICK_INTERVAL: Duration = Duration::from_millis(30);
pub const PROGRESS_STEP: u32 = 2;
pub const COMPLETE_GRACE: Duration = Duration::from_millis(300);
pub const HARD_TIMEOUT: Duration = Duration::from_millis(5000);

/// One labelled phase of the loading screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingTask {
  pub label: &'static str,
  pub duration: Duration,
}

pub const LOADING_TASKS: &[LoadingTask] = &[
  LoadingTask {
    label: "Conectando...",
    duration: Duration::from_millis(800),
  },
  LoadingTask {
    label: "Cargando datos...",
    duration: Duration::from_millis(1000),
  },
  LoadingTask {
    label: "Preparando interfaz...",
    duration: Duration::from_millis(700),
  },
  LoadingTask {
    label: "Finalizando...",
    duration: Duration::from_millis(500),
  },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingState {
  Running,
  Complete,
  Skipped,
  TimedOut,
}

/// Where to go once the sequence ends, and after how long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
  pub target: String,
  pub delay: Duration,
}

/// Snapshot published on every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadingFrame {
  pub progress: u32,
  pub offset: f64,
  pub label: Option<&'static str>,
}

impl LoadingFrame {
  /// Percentage in `0.0..=1.0`, for gauges.
  pub fn ratio(&self) -> f64 {
    f64::from(self.progress.min(100)) / 100.0
  }

  pub fn apply(&self, doc: &mut Document) {
    if let Some(label) = self.label {
      doc.set_text(ids::LOADING_MESSAGE, label);
    }
    doc.set_text(ids::PROGRESS_TEXT, format!("{}%", self.progress));
    doc.set_style_property("--progress-offset", &format!("{:.1}", self.offset));
  }
}

/// Progress ring offset for a percentage.
pub fn ring_offset(progress: u32) -> f64 {
  RING_LENGTH * (1.0 - f64::from(progress) / 100.0)
}

/// The loading screen's state machine.
#[derive(Debug, Clone)]
pub struct LoadingSequencer {
  state: LoadingState,
  progress: u32,
  step: u32,
  tasks: &'static [LoadingTask],
  current_task: usize,
  task_started: Duration,
  label: Option<&'static str>,
  next_page: String,
}

impl Default for LoadingSequencer {
  fn default() -> Self {
    Self::new(LOADING_TASKS)
  }
}

impl LoadingSequencer {
  pub fn new(tasks: &'static [LoadingTask]) -> Self {
    Self {
      state: LoadingState::Running,
      progress: 0,
      step: PROGRESS_STEP,
      tasks,
      current_task: 0,
      task_started: Duration::ZERO,
      label: None,
      next_page: NEXT_PAGE.to_string(),
    }
  }

  pub fn with_next_page(mut self, page: impl Into<String>) -> Self {
    self.next_page = page.into();
    self
  }

  pub fn state(&self) -> LoadingState {
    self.state
  }

  pub fn frame(&self) -> LoadingFrame {
    LoadingFrame {
      progress: self.progress,
      offset: ring_offset(self.progress),
      label: self.label,
    }
  }

  /// Advance one tick. `now` is the time since the screen started.
  ///
  /// Returns the navigation to schedule when this tick completes the bar.
  pub fn tick(&mut self, now: Duration) -> Option<Navigation> {
    if self.state != LoadingState::Running {
      return None;
    }

    if let Some(task) = self.tasks.get(self.current_task) {
      self.label = Some(task.label);
      if now.saturating_sub(self.task_started) >= task.duration {
        self.current_task += 1;
        self.task_started = now;
      }
    }

    self.progress = (self.progress + self.step).min(100);

    if self.progress >= 100 {
      self.state = LoadingState::Complete;
      info!("loading complete");
      return Some(self.navigation(COMPLETE_GRACE));
    }
    None
  }

  /// User skip: stop immediately and leave without delay.
  pub fn skip(&mut self) -> Option<Navigation> {
    self.terminate(LoadingState::Skipped)
  }

  /// Hard timeout reached.
  pub fn expire(&mut self) -> Option<Navigation> {
    self.terminate(LoadingState::TimedOut)
  }

  fn terminate(&mut self, to: LoadingState) -> Option<Navigation> {
    if self.state != LoadingState::Running {
      return None;
    }
    self.state = to;
    info!(state = ?to, progress = self.progress, "loading stopped");
    Some(self.navigation(Duration::ZERO))
  }

  fn navigation(&self, delay: Duration) -> Navigation {
    Navigation {
      target: self.next_page.clone(),
      delay,
    }
  }
}

/// Timing of the async driver.
#[derive(Debug, Clone, Copy)]
pub struct LoadingTiming {
  pub tick: Duration,
  pub timeout: Duration,
}

impl Default for LoadingTiming {
  fn default() -> Self {
    Self {
      tick: TICK_INTERVAL,
      timeout: HARD_TIMEOUT,
    }
  }
}

/// How the sequence ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingOutcome {
  pub state: LoadingState,
  pub target: String,
}

/// Drive a sequencer on the tokio clock until it ends.
///
/// Publishes a frame after each tick, stops on `skip` or on the timeout,
/// waits out the navigation delay and returns where to go. A skip during
/// the completion grace cuts the wait short.
pub async fn run(
  mut seq: LoadingSequencer,
  timing: LoadingTiming,
  mut skip: oneshot::Receiver<()>,
  frames: mpsc::UnboundedSender<LoadingFrame>,
) -> LoadingOutcome {
  let start = Instant::now();
  let mut ticker = time::interval_at(start + timing.tick, timing.tick);
  let deadline = time::sleep_until(start + timing.timeout);
  tokio::pin!(deadline);
  let mut skip_open = true;

  let navigation = loop {
    tokio::select! {
      res = &mut skip, if skip_open => {
        skip_open = false;
        // A dropped sender is not a skip request
        if res.is_ok() {
          if let Some(nav) = seq.skip() {
            break nav;
          }
        }
      }
      _ = &mut deadline => {
        if let Some(nav) = seq.expire() {
          break nav;
        }
      }
      _ = ticker.tick() => {
        let done = seq.tick(start.elapsed());
        let _ = frames.send(seq.frame());
        if let Some(nav) = done {
          break nav;
        }
      }
    }
  };

  debug!(page = %navigation.target, delay = ?navigation.delay, "loading navigation");
  if !navigation.delay.is_zero() {
    let grace = time::sleep(navigation.delay);
    tokio::pin!(grace);
    loop {
      tokio::select! {
        res = &mut skip, if skip_open => {
          skip_open = false;
          if res.is_ok() {
            debug!("completion grace skipped");
            break;
          }
        }
        _ = &mut grace => break,
      }
    }
  }

  LoadingOutcome {
    state: seq.state(),
    target: navigation.target,
  }
}
