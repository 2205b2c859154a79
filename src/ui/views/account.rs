use crate::page::{ids, Document};
use crate::shell::navigation::TRANSITION_CLASS;
use crate::shell::PageId;
use crate::ui::renderfns::{fragment_text, truncate};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};

/// Draw the settings panel next to the fragment navigation
pub fn draw_account(
  frame: &mut Frame,
  area: Rect,
  doc: &Document,
  current: Option<PageId>,
  install_available: bool,
) {
  let chunks = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
    .split(area);

  draw_settings(frame, chunks[0], doc, install_available);
  draw_pages(frame, chunks[1], doc, current);
}

/// Text or input value of a node
fn field(doc: &Document, id: &str) -> String {
  doc
    .text(id)
    .or_else(|| doc.value(id))
    .unwrap_or("-")
    .to_string()
}

fn draw_settings(frame: &mut Frame, area: Rect, doc: &Document, install_available: bool) {
  let title = format!(
    " {} {} ",
    field(doc, ids::SETTINGS_TITLE),
    field(doc, ids::LANGUAGE_FLAG)
  );
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Green))
    .title(title);

  let width = area.width.saturating_sub(18) as usize;
  let row = |label: &'static str, id: &str| {
    Line::from(vec![
      Span::styled(format!("{:<14}", label), Style::default().fg(Color::DarkGray)),
      Span::styled(
        truncate(&field(doc, id), width),
        Style::default().fg(Color::White),
      ),
    ])
  };

  let mut lines = vec![
    Line::from(Span::styled(
      field(doc, ids::USER_NAME),
      Style::default().fg(Color::Yellow).bold(),
    )),
    Line::from(""),
    row("Email", ids::EMAIL),
    row("Miembro desde", ids::MEMBER_SINCE),
    row("Último acceso", ids::LAST_LOGIN),
    Line::from(""),
    Line::from(vec![
      Span::styled("<o> ", Style::default().fg(Color::Cyan)),
      Span::styled(field(doc, ids::LOGOUT_BUTTON), Style::default().fg(Color::Red)),
      Span::raw("   "),
      Span::styled("<l> ", Style::default().fg(Color::Cyan)),
      Span::styled(field(doc, ids::LANGUAGE_FLAG), Style::default().fg(Color::White)),
    ]),
  ];
  if install_available && doc.is_visible(ids::INSTALL_BUTTON) {
    lines.push(Line::from(vec![
      Span::styled(":install ", Style::default().fg(Color::Cyan)),
      Span::styled("Instalar app", Style::default().fg(Color::DarkGray)),
    ]));
  }

  frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_pages(frame: &mut Frame, area: Rect, doc: &Document, current: Option<PageId>) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(3), Constraint::Min(0)])
    .split(area);

  let titles: Vec<Line> = PageId::ALL
    .iter()
    .enumerate()
    .map(|(i, p)| Line::from(format!("{} {}", i + 1, p.id())))
    .collect();
  let selected = current
    .and_then(|c| PageId::ALL.iter().position(|p| *p == c))
    .unwrap_or(0);
  let tabs = Tabs::new(titles)
    .block(Block::default().borders(Borders::ALL))
    .select(selected)
    .highlight_style(Style::default().fg(Color::Cyan).bold());
  frame.render_widget(tabs, chunks[0]);

  let body: Vec<Line> = if doc.has_body_class(TRANSITION_CLASS) {
    vec![Line::from(Span::styled("...", Style::default().fg(Color::DarkGray)))]
  } else {
    doc
      .inner_html(ids::MAIN_CONTENT)
      .map(fragment_text)
      .unwrap_or_default()
      .into_iter()
      .map(|text| Line::from(Span::styled(text, Style::default().fg(Color::White).bold())))
      .collect()
  };
  let block = Block::default()
    .borders(Borders::ALL)
    .title(format!(" #{} ", current.map(PageId::id).unwrap_or("")));
  frame.render_widget(Paragraph::new(body).block(block), chunks[1]);
}
