use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::loading::{LoadingFrame, LoadingOutcome};
use crate::network::NetworkCheck;
use crate::session::{LogoutOutcome, UserRecord};

/// Application events
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Mouse input, replayed as touch gestures
  Mouse(MouseEvent),
  /// Periodic tick for UI refresh and shell timers
  Tick,
  /// Loading screen progress
  Loading(LoadingFrame),
  /// Loading screen finished
  LoadingDone(LoadingOutcome),
  /// Identity provider session changed
  Session(Option<UserRecord>),
  /// Sign-out finished
  Logout(LogoutOutcome),
  /// The shell asked for the worker script to be registered
  RegisterWorker(String),
  /// The background worker finished starting up
  Worker(WorkerStatus),
  /// Result of a periodic reachability check against the origin
  Network(NetworkCheck),
}

/// How the worker's install and activation went
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerStatus {
  Ready { entries: usize, purged: usize },
  Failed(String),
}

/// Event handler that produces events from terminal input and a tick timer
pub struct EventHandler {
  tx: mpsc::UnboundedSender<Event>,
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  /// Create a new event handler with the given tick rate
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    let input_tx = tx.clone();

    // Crossterm polling blocks, keep it off the async workers
    tokio::task::spawn_blocking(move || loop {
      if !event::poll(tick_rate).unwrap_or(false) {
        if input_tx.is_closed() {
          break;
        }
        continue;
      }
      let event = match event::read() {
        Ok(CrosstermEvent::Key(key)) => Event::Key(key),
        Ok(CrosstermEvent::Mouse(mouse)) => Event::Mouse(mouse),
        _ => continue,
      };
      if input_tx.send(event).is_err() {
        break;
      }
    });

    spawn_ticks(tx.clone(), tick_rate);

    Self { tx, rx }
  }

  /// Sender for tasks that report back to the app
  pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
    self.tx.clone()
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}

/// Ticks run on their own timer so a stream of input never delays them.
fn spawn_ticks(tx: mpsc::UnboundedSender<Event>, tick_rate: Duration) {
  tokio::spawn(async move {
    let mut interval = tokio::time::interval(tick_rate);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
      interval.tick().await;
      if tx.send(Event::Tick).is_err() {
        break;
      }
    }
  });
}
