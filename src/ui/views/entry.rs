use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Draw the entry page shown without a session
pub fn draw_entry(frame: &mut Frame, area: Rect, location: &str) {
  let text = vec![
    Line::from(""),
    Line::from(Span::styled(
      "Futbol Total",
      Style::default().fg(Color::Green).bold(),
    )),
    Line::from(""),
    Line::from(Span::styled(
      "No hay una sesión activa.",
      Style::default().fg(Color::White),
    )),
    Line::from(Span::styled(
      format!("Página: {}", location),
      Style::default().fg(Color::DarkGray),
    )),
  ];

  let paragraph = Paragraph::new(text)
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL));
  frame.render_widget(paragraph, area);
}
