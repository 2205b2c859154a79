//! The mobile shell: one controller owning the page and its UX state.
//!
//! Timers run on a caller-supplied clock. Anything scheduled (content swaps,
//! reloads, toast removal) happens in [`MobileShell::poll_timers`].

use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::capabilities::{self, PageNotification, Permission, Platform};
use super::device::{DeviceInfo, Os};
use super::gesture::{GestureEvent, GestureTracker, TouchPoint};
use super::install::{InstallChoice, InstallPrompt, InstallPromptSlot};
use super::navigation::{History, PageId, TRANSITION_CLASS, TRANSITION_DELAY};
use super::toast::{Toast, ToastKind, ToastQueue};
use crate::error::ShellError;
use crate::page::{ids, Document};
use crate::worker::{APP_ICON, WORKER_SCRIPT};

pub const VIEWPORT: &str =
  "width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no, viewport-fit=cover";
pub const REFRESH_DELAY: Duration = Duration::from_millis(1000);
pub const REFRESH_MESSAGE: &str = "Actualizando...";
pub const ONLINE_MESSAGE: &str = "Conexión restaurada";
pub const OFFLINE_MESSAGE: &str = "Sin conexión a internet";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStep {
  Viewport,
  Device,
  SafeArea,
  Gestures,
  Navigation,
  Notifications,
  ServiceWorker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
  Done,
  Skipped(&'static str),
  Failed(ShellError),
}

/// Outcome of every init step, in the order they ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
  pub steps: Vec<(InitStep, StepOutcome)>,
}

impl InitReport {
  pub fn failures(&self) -> impl Iterator<Item = &(InitStep, StepOutcome)> {
    self.steps.iter().filter(|(_, o)| matches!(o, StepOutcome::Failed(_)))
  }
}

#[derive(Debug, Clone, Copy)]
struct PendingNavigation {
  page: PageId,
  push: bool,
  due: Duration,
}

pub struct MobileShell<P: Platform> {
  platform: P,
  document: Document,
  gestures: GestureTracker,
  gestures_wired: bool,
  navigation_wired: bool,
  history: History,
  current: Option<PageId>,
  /// Every started transition swaps in, in click order.
  pending_navigations: VecDeque<PendingNavigation>,
  pending_reload: Option<Duration>,
  toasts: ToastQueue,
  install_prompt: InstallPromptSlot,
}

impl<P: Platform> MobileShell<P> {
  pub fn new(platform: P, document: Document) -> Self {
    Self {
      platform,
      document,
      gestures: GestureTracker::new(),
      gestures_wired: false,
      navigation_wired: false,
      history: History::default(),
      current: None,
      pending_navigations: VecDeque::new(),
      pending_reload: None,
      toasts: ToastQueue::default(),
      install_prompt: InstallPromptSlot::default(),
    }
  }

  /// Run every startup step. A step that fails is reported and the rest
  /// still run.
  pub fn init(&mut self) -> InitReport {
    let mut report = InitReport::default();

    let outcome = self.setup_viewport();
    report.steps.push((InitStep::Viewport, outcome));

    let device = DeviceInfo::classify(&self.platform.user_agent());
    for class in device.body_classes() {
      self.document.add_body_class(class);
    }
    report.steps.push((InitStep::Device, StepOutcome::Done));

    let outcome = self.setup_safe_area(device);
    report.steps.push((InitStep::SafeArea, outcome));

    self.gestures_wired = true;
    report.steps.push((InitStep::Gestures, StepOutcome::Done));

    self.navigation_wired = true;
    report.steps.push((InitStep::Navigation, StepOutcome::Done));

    let outcome = self.setup_notifications();
    report.steps.push((InitStep::Notifications, outcome));

    let outcome = self.register_worker();
    report.steps.push((InitStep::ServiceWorker, outcome));

    for (step, outcome) in report.failures() {
      warn!(?step, ?outcome, "shell init step failed");
    }
    info!(os = ?device.os, mobile = device.mobile, "mobile shell initialized");
    report
  }

  fn setup_viewport(&mut self) -> StepOutcome {
    if self.document.set_meta("viewport", VIEWPORT) {
      StepOutcome::Done
    } else {
      StepOutcome::Skipped("no viewport meta tag")
    }
  }

  fn setup_safe_area(&mut self, device: DeviceInfo) -> StepOutcome {
    if device.os != Os::Ios {
      return StepOutcome::Skipped("not an iOS device");
    }
    self
      .document
      .set_style_property("--safe-area-top", "env(safe-area-inset-top)");
    self
      .document
      .set_style_property("--safe-area-bottom", "env(safe-area-inset-bottom)");
    StepOutcome::Done
  }

  fn setup_notifications(&mut self) -> StepOutcome {
    if !(self.platform.supports_notifications() && self.platform.supports_service_worker()) {
      return StepOutcome::Skipped("notifications not supported");
    }
    if self.platform.request_notification_permission() == Permission::Granted {
      info!("notifications enabled");
    }
    StepOutcome::Done
  }

  fn register_worker(&mut self) -> StepOutcome {
    if !self.platform.supports_service_worker() {
      return StepOutcome::Skipped("service worker not supported");
    }
    match self.platform.register_service_worker(WORKER_SCRIPT) {
      Ok(()) => {
        info!(script = WORKER_SCRIPT, "service worker registered");
        StepOutcome::Done
      }
      Err(e) => {
        warn!(error = %e, "service worker registration failed");
        StepOutcome::Failed(e)
      }
    }
  }

  pub fn touch_start(&mut self, point: TouchPoint, scroll_y: f64) {
    if self.gestures_wired {
      self.gestures.touch_start(point, scroll_y);
    }
  }

  pub fn touch_move(&mut self, point: TouchPoint, scroll_y: f64, now: Duration) {
    if !self.gestures_wired {
      return;
    }
    if let Some(GestureEvent::PullToRefresh) = self.gestures.touch_move(point, scroll_y) {
      self.trigger_refresh(now);
    }
  }

  pub fn touch_end(&mut self) {
    self.gestures.touch_end();
  }

  fn trigger_refresh(&mut self, now: Duration) {
    debug!("pull to refresh");
    capabilities::vibrate(&mut self.platform, None);
    self.show_toast(REFRESH_MESSAGE, ToastKind::Info, now);
    if self.pending_reload.is_none() {
      self.pending_reload = Some(now + REFRESH_DELAY);
    }
  }

  /// A click on a link carrying `data-page`.
  pub fn handle_link_click(&mut self, data_page: &str, now: Duration) -> Result<(), ShellError> {
    if !self.navigation_wired {
      return Ok(());
    }
    let page = data_page.parse()?;
    self.begin_navigation(page, true, now);
    Ok(())
  }

  /// History navigation. Entries without state are ignored.
  pub fn handle_popstate(&mut self, state: Option<&str>, now: Duration) -> Result<(), ShellError> {
    let Some(state) = state else {
      return Ok(());
    };
    if !self.navigation_wired {
      return Ok(());
    }
    let page = state.parse()?;
    self.begin_navigation(page, false, now);
    Ok(())
  }

  /// Step back through the pushed history.
  pub fn go_back(&mut self, now: Duration) -> Result<(), ShellError> {
    let previous = self.history.back();
    let state = previous.map(PageId::id);
    self.handle_popstate(state, now)
  }

  /// Start the page transition; the content swap happens once
  /// [`TRANSITION_DELAY`] has elapsed.
  pub fn begin_navigation(&mut self, page: PageId, push: bool, now: Duration) {
    debug!(%page, push, "navigation started");
    self.document.add_body_class(TRANSITION_CLASS);
    self.pending_navigations.push_back(PendingNavigation {
      page,
      push,
      due: now + TRANSITION_DELAY,
    });
  }

  fn finish_navigation(&mut self, pending: PendingNavigation) {
    self
      .document
      .set_inner_html(ids::MAIN_CONTENT, pending.page.render());
    if pending.push {
      self.history.push(pending.page);
    }
    self.current = Some(pending.page);
    self.document.remove_body_class(TRANSITION_CLASS);
    info!(page = %pending.page, "navigated");
  }

  /// Run timers that are due at `now`.
  pub fn poll_timers(&mut self, now: Duration) {
    while let Some(pending) = self.pending_navigations.front().copied() {
      if now < pending.due {
        break;
      }
      self.pending_navigations.pop_front();
      self.finish_navigation(pending);
    }
    if let Some(due) = self.pending_reload {
      if now >= due {
        self.pending_reload = None;
        self.document.reload();
      }
    }
    self.toasts.prune(now);
  }

  pub fn handle_connectivity(&mut self, online: bool, now: Duration) {
    if online {
      self.show_toast(ONLINE_MESSAGE, ToastKind::Success, now);
    } else {
      self.show_toast(OFFLINE_MESSAGE, ToastKind::Warning, now);
    }
  }

  pub fn show_toast(&mut self, message: impl Into<String>, kind: ToastKind, now: Duration) {
    self.toasts.show(message, kind, now);
  }

  pub fn visible_toasts(&self, now: Duration) -> impl Iterator<Item = &Toast> {
    self.toasts.visible(now)
  }

  /// Show a notification from the page. Returns whether it was shown.
  pub fn show_notification(&mut self, title: &str, body: Option<&str>) -> Result<bool, ShellError> {
    if !self.platform.supports_notifications()
      || self.platform.notification_permission() != Permission::Granted
    {
      return Ok(false);
    }
    let notification = PageNotification {
      title: title.to_string(),
      body: body.map(str::to_string),
      icon: APP_ICON.to_string(),
      badge: APP_ICON.to_string(),
    };
    self.platform.show_notification(&notification)?;
    Ok(true)
  }

  /// The platform offered an install prompt. Keep it and reveal the button.
  pub fn capture_install_prompt(&mut self, prompt: Box<dyn InstallPrompt>) {
    self.install_prompt.capture(prompt);
    self.document.show(ids::INSTALL_BUTTON);
  }

  pub async fn add_to_home_screen(&mut self) -> Option<InstallChoice> {
    self.install_prompt.add_to_home_screen().await
  }

  pub fn install_available(&self) -> bool {
    self.install_prompt.is_available()
  }

  pub fn document(&self) -> &Document {
    &self.document
  }

  pub fn document_mut(&mut self) -> &mut Document {
    &mut self.document
  }

  pub fn platform(&self) -> &P {
    &self.platform
  }

  pub fn platform_mut(&mut self) -> &mut P {
    &mut self.platform
  }

  pub fn current_page(&self) -> Option<PageId> {
    self.current
  }

  pub fn history(&self) -> &History {
    &self.history
  }
}
