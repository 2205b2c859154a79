use crate::shell::ToastKind;
use ratatui::prelude::Color;

/// Truncate a string to a maximum number of characters, adding "..." if
/// truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Display color for a toast
pub fn toast_color(kind: ToastKind) -> Color {
  match kind {
    ToastKind::Success => Color::Green,
    ToastKind::Info => Color::Cyan,
    ToastKind::Warning => Color::Yellow,
    ToastKind::Error => Color::Red,
  }
}

/// Text of an HTML fragment with the tags stripped, one line per block
pub fn fragment_text(html: &str) -> Vec<String> {
  let mut lines = Vec::new();
  let mut current = String::new();
  let mut in_tag = false;

  for c in html.chars() {
    match c {
      '<' => {
        in_tag = true;
        if !current.trim().is_empty() {
          lines.push(current.trim().to_string());
        }
        current.clear();
      }
      '>' => in_tag = false,
      _ if !in_tag => current.push(c),
      _ => {}
    }
  }
  if !current.trim().is_empty() {
    lines.push(current.trim().to_string());
  }
  lines
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hola", 10), "hola");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("hola", 4), "hola");
  }

  #[test]
  fn test_truncate_multibyte() {
    assert_eq!(truncate("Configuración", 8), "Confi...");
  }

  #[test]
  fn test_toast_color() {
    assert_eq!(toast_color(ToastKind::Success), Color::Green);
    assert_eq!(toast_color(ToastKind::Error), Color::Red);
  }

  #[test]
  fn test_fragment_text() {
    let html = "<div class=\"mobile-card\"><h2>Mi Perfil</h2><div class=\"profile-content\"></div></div>";
    assert_eq!(fragment_text(html), vec!["Mi Perfil".to_string()]);
  }
}
