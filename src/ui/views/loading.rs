use crate::loading::{LoadingFrame, RING_LENGTH};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};

/// Draw the loading screen: progress gauge, phase label and skip hint
pub fn draw_loading(frame: &mut Frame, area: Rect, loading: &LoadingFrame) {
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Green))
    .title(" Futbol Total ");
  let inner = block.inner(area);
  frame.render_widget(block, area);

  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Percentage(40),
      Constraint::Length(1), // Phase label
      Constraint::Length(1),
      Constraint::Length(1), // Gauge
      Constraint::Length(1),
      Constraint::Length(1), // Ring offset and hint
      Constraint::Min(0),
    ])
    .horizontal_margin(4)
    .split(inner);

  let label = Paragraph::new(loading.label.unwrap_or_default())
    .alignment(Alignment::Center)
    .style(Style::default().fg(Color::White).bold());
  frame.render_widget(label, chunks[1]);

  let gauge = Gauge::default()
    .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
    .ratio(loading.ratio())
    .label(format!("{}%", loading.progress));
  frame.render_widget(gauge, chunks[3]);

  let ring = Paragraph::new(format!(
    "offset {:.1} / {:.1}   <s> saltar",
    loading.offset, RING_LENGTH
  ))
  .alignment(Alignment::Center)
  .style(Style::default().fg(Color::DarkGray));
  frame.render_widget(ring, chunks[5]);
}
