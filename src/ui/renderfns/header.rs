use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar with logo, origin, current page and shortcuts
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  origin: &str,
  page: &str,
  shortcuts: &[(&str, &str)],
) {
  let mut spans = vec![
    Span::styled(" Futbol Total ", Style::default().fg(Color::Green).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(" {} ", extract_domain(origin)),
      Style::default().fg(Color::White),
    ),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", page), Style::default().fg(Color::Yellow).bold()),
    Span::raw(" "),
  ];

  // Keys highlighted, descriptions dimmed
  for (key, label) in shortcuts {
    spans.push(Span::raw("  "));
    spans.push(Span::styled(format!("<{}>", key), Style::default().fg(Color::Cyan)));
    spans.push(Span::styled(format!(" {}", label), Style::default().fg(Color::DarkGray)));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

/// Host part of the origin URL
fn extract_domain(url: &str) -> &str {
  url
    .strip_prefix("https://")
    .or_else(|| url.strip_prefix("http://"))
    .unwrap_or(url)
    .split('/')
    .next()
    .unwrap_or(url)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_extract_domain() {
    assert_eq!(extract_domain("https://futbol.example/"), "futbol.example");
    assert_eq!(extract_domain("https://futbol.example/app/"), "futbol.example");
    assert_eq!(extract_domain("http://localhost:8080/"), "localhost:8080");
  }
}
