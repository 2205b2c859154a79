mod components;
mod renderfns;
mod views;

use crate::app::{App, Mode, Screen};
use crate::event::WorkerStatus;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use renderfns::{draw_footer, draw_header, toast_color};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Toast
      Constraint::Length(1), // Footer
    ])
    .split(frame.area());

  let page = app
    .current_page()
    .filter(|_| app.screen() == Screen::Account)
    .map(|p| p.title())
    .unwrap_or_else(|| app.document().location());
  draw_header(frame, chunks[0], app.origin(), page, shortcuts(app));

  match app.screen() {
    Screen::Loading => views::loading::draw_loading(frame, chunks[1], app.loading_frame()),
    Screen::Account => views::account::draw_account(
      frame,
      chunks[1],
      app.document(),
      app.current_page(),
      app.install_available(),
    ),
    Screen::Entry => views::entry::draw_entry(frame, chunks[1], app.document().location()),
  }

  draw_toast(frame, chunks[2], app);
  let status = [network_span(app), worker_span(app)].into_iter().flatten().collect();
  draw_footer(frame, chunks[3], &app.breadcrumb(), status);

  if *app.mode() == Mode::Command {
    components::draw_command_overlay(
      frame,
      chunks[1],
      app.command_input(),
      &app.autocomplete_suggestions(),
      app.selected_suggestion(),
    );
  }
}

fn shortcuts(app: &App) -> &'static [(&'static str, &'static str)] {
  match app.screen() {
    Screen::Loading => &[("s", "skip"), ("q", "quit")],
    Screen::Account => &[
      (":", "command"),
      ("tab", "page"),
      ("l", "lang"),
      ("o", "logout"),
      ("q", "quit"),
    ],
    Screen::Entry => &[("q", "quit")],
  }
}

fn draw_toast(frame: &mut Frame, area: Rect, app: &App) {
  let Some((message, kind)) = app.toast() else {
    return;
  };
  let paragraph = Paragraph::new(format!(" {} ", message))
    .alignment(Alignment::Center)
    .style(Style::default().fg(Color::Black).bg(toast_color(kind)));
  frame.render_widget(paragraph, area);
}

fn network_span(app: &App) -> Option<Span<'static>> {
  if !app.online() {
    return Some(Span::styled("sin conexión", Style::default().fg(Color::Red)));
  }
  let info = app.network_info()?;
  Some(Span::styled(
    format!(
      "{} · {}ms · {:.1} Mb/s",
      info.effective_type, info.rtt, info.downlink
    ),
    Style::default().fg(Color::Cyan),
  ))
}

fn worker_span(app: &App) -> Option<Span<'static>> {
  match app.worker_status()? {
    WorkerStatus::Ready { entries, .. } => Some(Span::styled(
      format!("offline: {} cached", entries),
      Style::default().fg(Color::Green),
    )),
    WorkerStatus::Failed(_) => Some(Span::styled(
      "offline: unavailable",
      Style::default().fg(Color::Yellow),
    )),
  }
}
