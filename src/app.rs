use crate::cli;
use crate::commands::{self, Command, CommandAction};
use crate::config::Config;
use crate::event::{Event, EventHandler, WorkerStatus};
use crate::i18n::{self, Language};
use crate::network::{self, Connectivity, NetworkCheck};
use crate::loading::{self, LoadingFrame, LoadingSequencer, LoadingTiming};
use crate::page::Document;
use crate::prefs::{PreferenceStore, SqlitePreferences};
use crate::session::{self, IdentityProvider, LocalIdentity, SessionState, UserRecord, ENTRY_PAGE};
use crate::shell::capabilities::{
  self, NetworkInfo, PageNotification, Permission, Platform, ShareData, ShareOutcome,
};
use crate::shell::{InstallChoice, InstallPrompt, MobileShell, PageId, ToastKind, TouchPoint};
use crate::error::ShellError;
use crate::ui;
use crate::worker::{HttpFetcher, NOTIFICATION_TITLE};
use chrono::Utc;
use color_eyre::Result;
use crossterm::event::{
  DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers, MouseButton,
  MouseEvent, MouseEventKind,
};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::future::Future;
use std::io::{stdout, Write};
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};

pub const TICK_RATE: Duration = Duration::from_millis(100);

/// Terminal cells are scaled to touch pixels so gesture thresholds keep
/// their meaning.
const CELL_WIDTH_PX: f64 = 8.0;
const CELL_HEIGHT_PX: f64 = 16.0;
const SCROLL_STEP_PX: f64 = 48.0;

const BREADCRUMB_DEPTH: usize = 3;

/// Which page the terminal is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  Loading,
  Account,
  Entry,
}

/// Input mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  Normal,
  Command,
}

/// Platform services of the terminal host.
pub struct TerminalPlatform {
  user_agent: String,
  permission: Permission,
  online: bool,
  network: Option<NetworkInfo>,
  event_tx: mpsc::UnboundedSender<Event>,
}

impl TerminalPlatform {
  pub fn new(user_agent: String, event_tx: mpsc::UnboundedSender<Event>) -> Self {
    Self {
      user_agent,
      permission: Permission::Default,
      online: true,
      network: None,
      event_tx,
    }
  }

  /// Record the latest reachability check. An offline check keeps the last
  /// known connection estimate.
  pub fn set_network(&mut self, check: NetworkCheck) {
    self.online = check.online;
    if check.info.is_some() {
      self.network = check.info;
    }
  }
}

impl Platform for TerminalPlatform {
  fn user_agent(&self) -> String {
    self.user_agent.clone()
  }

  fn supports_notifications(&self) -> bool {
    true
  }

  fn supports_service_worker(&self) -> bool {
    true
  }

  fn notification_permission(&self) -> Permission {
    self.permission
  }

  fn request_notification_permission(&mut self) -> Permission {
    self.permission = Permission::Granted;
    self.permission
  }

  fn show_notification(&mut self, notification: &PageNotification) -> Result<(), ShellError> {
    info!(title = %notification.title, body = ?notification.body, "notification");
    Ok(())
  }

  fn register_service_worker(&mut self, script: &str) -> Result<(), ShellError> {
    self
      .event_tx
      .send(Event::RegisterWorker(script.to_string()))
      .map_err(|e| ShellError::Platform(e.to_string()))
  }

  fn clipboard_write(&mut self, text: &str) -> Result<(), ShellError> {
    info!(text, "copied to clipboard");
    Ok(())
  }

  /// The terminal bell stands in for the vibration motor.
  fn vibrate(&mut self, pattern: &[u32]) -> bool {
    let mut out = stdout();
    let rang = out.write_all(b"\x07").and_then(|_| out.flush()).is_ok();
    debug!(?pattern, rang, "vibrate");
    rang
  }

  fn is_online(&self) -> bool {
    self.online
  }

  fn connection(&self) -> Option<NetworkInfo> {
    self.network.clone()
  }
}

/// Install prompt offered once the worker is active. It answers with
/// whatever the user picked through `install` or `dismiss`.
struct TerminalInstallPrompt {
  answer: watch::Receiver<InstallChoice>,
}

impl InstallPrompt for TerminalInstallPrompt {
  fn prompt(self: Box<Self>) -> Pin<Box<dyn Future<Output = InstallChoice> + Send>> {
    let choice = *self.answer.borrow();
    Box::pin(async move { choice })
  }
}

/// Main application state
pub struct App {
  config: Config,
  db_path: PathBuf,
  screen: Screen,
  mode: Mode,
  command_input: String,
  selected_suggestion: usize,

  shell: MobileShell<TerminalPlatform>,
  prefs: Arc<dyn PreferenceStore>,
  identity: Arc<LocalIdentity>,
  language: Language,
  user: Option<UserRecord>,

  loading: LoadingFrame,
  skip: Option<oneshot::Sender<()>>,
  started: Instant,
  redirect_at: Option<Duration>,
  reloads_seen: u32,

  /// Touch position of the current mouse drag
  touch: Option<TouchPoint>,
  scroll_y: f64,
  worker_status: Option<WorkerStatus>,
  connectivity: Connectivity,
  install_answer: watch::Sender<InstallChoice>,

  event_tx: mpsc::UnboundedSender<Event>,
  should_quit: bool,
}

impl App {
  pub fn new(
    config: Config,
    db_path: PathBuf,
    event_tx: mpsc::UnboundedSender<Event>,
  ) -> Result<Self> {
    let conn = crate::db::open(&db_path)?;
    let prefs: Arc<dyn PreferenceStore> = Arc::new(SqlitePreferences::new(conn));
    let language = i18n::load_language(prefs.as_ref())?;
    let identity = Arc::new(LocalIdentity::new(config.account.clone().map(Into::into)));

    let user_agent = config
      .user_agent
      .clone()
      .unwrap_or_else(|| concat!("futbol-total/", env!("CARGO_PKG_VERSION")).to_string());
    let platform = TerminalPlatform::new(user_agent, event_tx.clone());
    let document = Document::new(loading::LOADING_PAGE).with_meta("viewport", "width=device-width");

    Ok(Self {
      config,
      db_path,
      screen: Screen::Loading,
      mode: Mode::Normal,
      command_input: String::new(),
      selected_suggestion: 0,
      shell: MobileShell::new(platform, document),
      prefs,
      identity,
      language,
      user: None,
      loading: LoadingSequencer::default().frame(),
      skip: None,
      started: Instant::now(),
      redirect_at: None,
      reloads_seen: 0,
      touch: None,
      scroll_y: 0.0,
      worker_status: None,
      connectivity: Connectivity::default(),
      install_answer: watch::channel(InstallChoice::Accepted).0,
      event_tx,
      should_quit: false,
    })
  }

  pub async fn run(&mut self, mut events: EventHandler) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    self.start();

    // Main loop
    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      if let Some(event) = events.next().await {
        self.handle_event(event).await?;
      }
    }

    // Cleanup terminal
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
  }

  fn start(&mut self) {
    self.started = Instant::now();
    let report = self.shell.init();
    let platform = self.shell.platform();
    info!(
      steps = report.steps.len(),
      online = capabilities::is_online(platform),
      orientation = capabilities::detect_orientation(platform),
      "shell ready"
    );

    let applied =
      i18n::apply_language(self.shell.document_mut(), self.prefs.as_ref(), self.language);
    if let Err(e) = applied {
      warn!(error = %e, "could not persist language");
    }

    self.start_loading();
    self.watch_session();
    self.watch_network();
  }

  fn now(&self) -> Duration {
    self.started.elapsed()
  }

  fn start_loading(&mut self) {
    // Keep the screen awake while the intro plays
    if let Err(e) = capabilities::request_wake_lock(self.shell.platform_mut()) {
      info!(reason = %e, "screen may sleep during loading");
    }

    let (skip_tx, skip_rx) = oneshot::channel();
    self.skip = Some(skip_tx);

    let seq = LoadingSequencer::default().with_next_page(self.config.loading.next_page.clone());
    let timing = LoadingTiming {
      timeout: Duration::from_millis(self.config.loading.timeout_ms),
      ..Default::default()
    };
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      let (frame_tx, mut frame_rx) = mpsc::unbounded_channel();
      let forward_tx = tx.clone();
      let forward = tokio::spawn(async move {
        while let Some(frame) = frame_rx.recv().await {
          if forward_tx.send(Event::Loading(frame)).is_err() {
            break;
          }
        }
      });

      let outcome = loading::run(seq, timing, skip_rx, frame_tx).await;
      let _ = forward.await;
      let _ = tx.send(Event::LoadingDone(outcome));
    });
  }

  fn watch_session(&self) {
    let mut rx = self.identity.subscribe();
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      loop {
        let user = rx.borrow_and_update().clone();
        if tx.send(Event::Session(user)).is_err() {
          break;
        }
        if rx.changed().await.is_err() {
          break;
        }
      }
    });
  }

  fn watch_network(&self) {
    let fetcher = match self
      .config
      .origin_url()
      .and_then(|origin| Ok(HttpFetcher::new(origin)?))
    {
      Ok(fetcher) => fetcher,
      Err(e) => {
        warn!(error = %e, "connectivity checks disabled");
        return;
      }
    };
    tokio::spawn(network::watch(
      fetcher,
      self.config.origin.clone(),
      network::CHECK_INTERVAL,
      self.event_tx.clone(),
    ));
  }

  fn handle_network(&mut self, check: NetworkCheck) {
    let now = self.now();
    let changed = self.connectivity.observe(check.online);
    self.shell.platform_mut().set_network(check);
    if let Some(online) = changed {
      self.shell.handle_connectivity(online, now);
    }
  }

  async fn handle_event(&mut self, event: Event) -> Result<()> {
    match event {
      Event::Key(key) => self.handle_key(key).await,
      Event::Mouse(mouse) => self.handle_mouse(mouse),
      Event::Tick => self.tick(),
      Event::Loading(frame) => {
        frame.apply(self.shell.document_mut());
        self.loading = frame;
      }
      Event::LoadingDone(outcome) => {
        info!(state = ?outcome.state, target = %outcome.target, "loading finished");
        self.skip = None;
        self.shell.document_mut().navigate(&outcome.target);
        self.screen = Screen::Account;
        self.render_session();
        let now = self.now();
        self.open_page(PageId::Home, now);
      }
      Event::Session(user) => {
        self.user = user;
        if self.screen == Screen::Account {
          self.render_session();
        }
      }
      Event::Logout(outcome) => {
        let now = self.now();
        let kind = if outcome.redirect_after.is_some() {
          ToastKind::Success
        } else {
          ToastKind::Error
        };
        self.shell.show_toast(outcome.toast, kind, now);
        self.redirect_at = outcome.redirect_after.map(|delay| now + delay);
      }
      Event::RegisterWorker(script) => self.spawn_worker(script),
      Event::Worker(status) => self.handle_worker_status(status),
      Event::Network(check) => self.handle_network(check),
    }
    Ok(())
  }

  fn tick(&mut self) {
    let now = self.now();
    self.shell.poll_timers(now);

    if let Some(due) = self.redirect_at {
      if now >= due {
        self.redirect_at = None;
        self.shell.document_mut().navigate(ENTRY_PAGE);
        self.screen = Screen::Entry;
      }
    }

    // Pull to refresh reloaded the page
    let reloads = self.shell.document().reloads();
    if reloads != self.reloads_seen {
      self.reloads_seen = reloads;
      self.scroll_y = 0.0;
      if self.screen == Screen::Account {
        self.render_session();
      }
    }
  }

  fn render_session(&mut self) {
    let state = session::apply_session(
      self.shell.document_mut(),
      self.user.as_ref(),
      Utc::now(),
      self.language,
    );
    if state == SessionState::Redirected {
      self.screen = Screen::Entry;
    }
  }

  fn open_page(&mut self, page: PageId, now: Duration) {
    if let Err(e) = self.shell.handle_link_click(page.id(), now) {
      self.shell.show_toast(e.to_string(), ToastKind::Error, now);
    }
  }

  fn spawn_worker(&self, script: String) {
    let config = self.config.clone();
    let db_path = self.db_path.clone();
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      info!(%script, "starting worker");
      let status = match cli::open_worker(&config, &db_path) {
        Ok(mut worker) => match cli::install_and_activate(&mut worker).await {
          Ok((entries, purged)) => WorkerStatus::Ready {
            entries,
            purged: purged.len(),
          },
          Err(e) => WorkerStatus::Failed(e.to_string()),
        },
        Err(e) => WorkerStatus::Failed(e.to_string()),
      };
      let _ = tx.send(Event::Worker(status));
    });
  }

  fn handle_worker_status(&mut self, status: WorkerStatus) {
    let now = self.now();
    match &status {
      WorkerStatus::Ready { entries, purged } => {
        info!(entries, purged, "worker active");
        // The platform offers installation once a worker controls the page
        self.shell.capture_install_prompt(Box::new(TerminalInstallPrompt {
          answer: self.install_answer.subscribe(),
        }));
        let body = format!("{} archivos disponibles sin conexión", entries);
        if let Err(e) = self.shell.show_notification(NOTIFICATION_TITLE, Some(&body)) {
          warn!(error = %e, "could not show notification");
        }
      }
      WorkerStatus::Failed(reason) => {
        warn!(%reason, "worker unavailable");
        self.shell.show_toast("Offline mode unavailable", ToastKind::Warning, now);
      }
    }
    self.worker_status = Some(status);
  }

  async fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    match self.screen {
      Screen::Loading => match key.code {
        KeyCode::Char('s') | KeyCode::Enter | KeyCode::Esc => self.skip_loading(),
        KeyCode::Char('q') => self.should_quit = true,
        _ => {}
      },
      Screen::Entry => {
        if key.code == KeyCode::Char('q') {
          self.should_quit = true;
        }
      }
      Screen::Account => match self.mode {
        Mode::Normal => self.handle_normal_mode_key(key).await,
        Mode::Command => self.handle_command_mode_key(key).await,
      },
    }
  }

  fn skip_loading(&mut self) {
    if let Some(skip) = self.skip.take() {
      let _ = skip.send(());
    }
  }

  async fn handle_normal_mode_key(&mut self, key: KeyEvent) {
    let now = self.now();
    match key.code {
      KeyCode::Char('q') => self.should_quit = true,
      KeyCode::Char(':') => {
        self.mode = Mode::Command;
        self.command_input.clear();
      }
      KeyCode::Char('l') => self.run_action(CommandAction::Language).await,
      KeyCode::Char('o') => self.run_action(CommandAction::Logout).await,
      KeyCode::Tab | KeyCode::Right => self.cycle_page(1, now),
      KeyCode::BackTab | KeyCode::Left => self.cycle_page(-1, now),
      KeyCode::Backspace | KeyCode::Esc => self.run_action(CommandAction::Back).await,
      KeyCode::Char(c @ '1'..='4') => {
        let index = c as usize - '1' as usize;
        self.open_page(PageId::ALL[index], now);
      }
      _ => {}
    }
  }

  fn cycle_page(&mut self, delta: i32, now: Duration) {
    let current = self.shell.current_page().unwrap_or(PageId::Home);
    let index = PageId::ALL.iter().position(|p| *p == current).unwrap_or(0);
    let len = PageId::ALL.len() as i32;
    let next = (index as i32 + delta).rem_euclid(len) as usize;
    self.open_page(PageId::ALL[next], now);
  }

  async fn handle_command_mode_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        self.command_input.clear();
        self.selected_suggestion = 0;
      }
      KeyCode::Enter => {
        let command = commands::resolve(&self.command_input, self.selected_suggestion);
        self.mode = Mode::Normal;
        self.command_input.clear();
        self.selected_suggestion = 0;
        if let Some(command) = command {
          self.run_action(command.action).await;
        }
      }
      KeyCode::Tab | KeyCode::Down => {
        let suggestions = commands::get_suggestions(&self.command_input);
        if !suggestions.is_empty() {
          self.selected_suggestion = (self.selected_suggestion + 1) % suggestions.len();
        }
      }
      KeyCode::BackTab | KeyCode::Up => {
        let suggestions = commands::get_suggestions(&self.command_input);
        if !suggestions.is_empty() {
          self.selected_suggestion = if self.selected_suggestion == 0 {
            suggestions.len() - 1
          } else {
            self.selected_suggestion - 1
          };
        }
      }
      KeyCode::Backspace => {
        self.command_input.pop();
        self.selected_suggestion = 0;
      }
      KeyCode::Char(c) => {
        self.command_input.push(c);
        self.selected_suggestion = 0;
      }
      _ => {}
    }
  }

  async fn run_action(&mut self, action: CommandAction) {
    let now = self.now();
    match action {
      CommandAction::Open(page) => self.open_page(page, now),
      CommandAction::Back => {
        if let Err(e) = self.shell.go_back(now) {
          self.shell.show_toast(e.to_string(), ToastKind::Error, now);
        }
      }
      CommandAction::Install | CommandAction::DismissInstall => {
        let choice = if action == CommandAction::Install {
          InstallChoice::Accepted
        } else {
          InstallChoice::Dismissed
        };
        self.install_answer.send_replace(choice);
        self.install(now).await;
      }
      CommandAction::Share => self.share(now),
      CommandAction::Language => {
        let toggled =
          i18n::toggle_language(self.shell.document_mut(), self.prefs.as_ref(), self.language);
        match toggled {
          Ok(next) => {
            self.language = next;
            self.render_session();
          }
          Err(e) => self.shell.show_toast(e.to_string(), ToastKind::Error, now),
        }
      }
      CommandAction::Logout => {
        let identity = self.identity.clone();
        let lang = self.language;
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
          let outcome = session::logout(identity.as_ref(), lang).await;
          let _ = tx.send(Event::Logout(outcome));
        });
      }
      CommandAction::Quit => self.should_quit = true,
    }
  }

  async fn install(&mut self, now: Duration) {
    match self.shell.add_to_home_screen().await {
      Some(InstallChoice::Accepted) => {
        self.shell.show_toast("Futbol Total instalada", ToastKind::Success, now);
      }
      Some(InstallChoice::Dismissed) => {
        self.shell.show_toast("Instalación pospuesta", ToastKind::Info, now);
      }
      None => {
        self.shell.show_toast("Instalación no disponible", ToastKind::Info, now);
      }
    }
  }

  fn share(&mut self, now: Duration) {
    let page = self.shell.current_page().unwrap_or(PageId::Home);
    let url = self
      .config
      .origin_url()
      .ok()
      .and_then(|origin| origin.join(&page.hash()).ok())
      .map(String::from);
    let data = ShareData {
      title: Some(page.title().to_string()),
      text: Some(page.title().to_string()),
      url,
    };

    match capabilities::share_content(self.shell.platform_mut(), &data) {
      Ok(ShareOutcome::Shared) => info!(title = ?data.title, "shared"),
      Ok(ShareOutcome::Copied(text)) => {
        self.shell.show_toast(format!("Copiado: {}", text), ToastKind::Success, now);
      }
      Ok(ShareOutcome::Unavailable) => {
        self.shell.show_toast("No se puede compartir", ToastKind::Warning, now);
      }
      Err(e) => self.shell.show_toast(e.to_string(), ToastKind::Error, now),
    }
  }

  fn handle_mouse(&mut self, mouse: MouseEvent) {
    if self.screen != Screen::Account {
      return;
    }
    let now = self.now();
    let point = TouchPoint::new(
      f64::from(mouse.column) * CELL_WIDTH_PX,
      f64::from(mouse.row) * CELL_HEIGHT_PX,
    );

    match mouse.kind {
      MouseEventKind::Down(MouseButton::Left) => {
        self.touch = Some(point);
        self.shell.touch_start(point, self.scroll_y);
      }
      MouseEventKind::Drag(MouseButton::Left) => {
        if self.touch.is_some() {
          self.shell.touch_move(point, self.scroll_y, now);
        }
      }
      MouseEventKind::Up(MouseButton::Left) => {
        self.touch = None;
        self.shell.touch_end();
      }
      MouseEventKind::ScrollDown => self.scroll_y += SCROLL_STEP_PX,
      MouseEventKind::ScrollUp => self.scroll_y = (self.scroll_y - SCROLL_STEP_PX).max(0.0),
      _ => {}
    }
  }

  // Accessors for UI rendering
  pub fn screen(&self) -> Screen {
    self.screen
  }

  pub fn mode(&self) -> &Mode {
    &self.mode
  }

  pub fn command_input(&self) -> &str {
    &self.command_input
  }

  pub fn autocomplete_suggestions(&self) -> Vec<&'static Command> {
    commands::get_suggestions(&self.command_input)
  }

  pub fn selected_suggestion(&self) -> usize {
    self.selected_suggestion
  }

  pub fn document(&self) -> &Document {
    self.shell.document()
  }

  pub fn loading_frame(&self) -> &LoadingFrame {
    &self.loading
  }

  pub fn origin(&self) -> &str {
    &self.config.origin
  }

  pub fn current_page(&self) -> Option<PageId> {
    self.shell.current_page()
  }

  pub fn worker_status(&self) -> Option<&WorkerStatus> {
    self.worker_status.as_ref()
  }

  pub fn online(&self) -> bool {
    capabilities::is_online(self.shell.platform())
  }

  pub fn network_info(&self) -> Option<NetworkInfo> {
    capabilities::network_info(self.shell.platform())
  }

  pub fn install_available(&self) -> bool {
    self.shell.install_available()
  }

  /// Newest visible toast
  pub fn toast(&self) -> Option<(String, ToastKind)> {
    self
      .shell
      .visible_toasts(self.now())
      .last()
      .map(|t| (t.message.clone(), t.kind))
  }

  pub fn breadcrumb(&self) -> Vec<String> {
    let mut parts = vec![self.document().location().to_string()];
    if self.screen == Screen::Account {
      // Last few pages of the in-app history, newest last
      let entries = self.shell.history().entries();
      let start = entries.len().saturating_sub(BREADCRUMB_DEPTH);
      parts.extend(entries[start..].iter().map(|page| page.hash()));
    }
    parts
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::shell::controller::{OFFLINE_MESSAGE, ONLINE_MESSAGE};

  fn app() -> App {
    let (tx, _rx) = mpsc::unbounded_channel();
    App::new(Config::default(), PathBuf::from(":memory:"), tx).unwrap()
  }

  fn check(online: bool, rtt: u32) -> NetworkCheck {
    NetworkCheck {
      online,
      info: online.then(|| NetworkInfo {
        effective_type: "4g".to_string(),
        downlink: 1.5,
        rtt,
      }),
    }
  }

  #[tokio::test]
  async fn test_network_checks_drive_connectivity_toasts() {
    let mut app = app();
    assert!(app.online());
    assert!(app.network_info().is_none());

    app.handle_event(Event::Network(check(true, 40))).await.unwrap();
    assert_eq!(app.network_info().map(|i| i.rtt), Some(40));
    assert!(app.toast().is_none());

    app.handle_event(Event::Network(check(false, 0))).await.unwrap();
    assert!(!app.online());
    assert_eq!(
      app.toast(),
      Some((OFFLINE_MESSAGE.to_string(), ToastKind::Warning))
    );
    // Last estimate survives an outage
    assert_eq!(app.network_info().map(|i| i.rtt), Some(40));

    app.handle_event(Event::Network(check(true, 90))).await.unwrap();
    app.handle_event(Event::Network(check(true, 60))).await.unwrap();
    assert!(app.online());
    assert_eq!(
      app.toast(),
      Some((ONLINE_MESSAGE.to_string(), ToastKind::Success))
    );
    assert_eq!(app.shell.visible_toasts(app.now()).count(), 2);
    assert_eq!(app.network_info().map(|i| i.rtt), Some(60));
  }

  #[tokio::test]
  async fn test_dismissed_install_prompt_is_spent() {
    let mut app = app();
    app
      .handle_event(Event::Worker(WorkerStatus::Ready {
        entries: 3,
        purged: 1,
      }))
      .await
      .unwrap();
    assert!(app.install_available());

    app.run_action(CommandAction::DismissInstall).await;
    assert_eq!(
      app.toast(),
      Some(("Instalación pospuesta".to_string(), ToastKind::Info))
    );
    assert!(!app.install_available());

    app.run_action(CommandAction::Install).await;
    assert_eq!(
      app.toast(),
      Some(("Instalación no disponible".to_string(), ToastKind::Info))
    );
  }

  #[tokio::test]
  async fn test_accepted_install() {
    let mut app = app();
    app
      .handle_event(Event::Worker(WorkerStatus::Ready {
        entries: 3,
        purged: 0,
      }))
      .await
      .unwrap();
    app.run_action(CommandAction::Install).await;
    assert_eq!(
      app.toast(),
      Some(("Futbol Total instalada".to_string(), ToastKind::Success))
    );
  }
}
