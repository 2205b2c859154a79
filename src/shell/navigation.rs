//! Fragment navigation between the app's in-place pages.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ShellError;

/// Delay between starting the transition and swapping the content.
pub const TRANSITION_DELAY: Duration = Duration::from_millis(150);
pub const TRANSITION_CLASS: &str = "page-transition";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
  Home,
  Matches,
  Profile,
  Settings,
}

impl PageId {
  pub const ALL: [PageId; 4] = [PageId::Home, PageId::Matches, PageId::Profile, PageId::Settings];

  pub fn id(self) -> &'static str {
    match self {
      PageId::Home => "home",
      PageId::Matches => "matches",
      PageId::Profile => "profile",
      PageId::Settings => "settings",
    }
  }

  pub fn title(self) -> &'static str {
    match self {
      PageId::Home => "Partidos de Hoy",
      PageId::Matches => "Todos los Partidos",
      PageId::Profile => "Mi Perfil",
      PageId::Settings => "Configuración",
    }
  }

  fn container_class(self) -> &'static str {
    match self {
      PageId::Home => "matches-container",
      PageId::Matches => "matches-list",
      PageId::Profile => "profile-content",
      PageId::Settings => "settings-content",
    }
  }

  /// Fragment written into the main content node.
  pub fn render(self) -> String {
    format!(
      "<div class=\"mobile-card\"><h2>{}</h2><div class=\"{}\"></div></div>",
      self.title(),
      self.container_class()
    )
  }

  /// Location hash pushed to the history.
  pub fn hash(self) -> String {
    format!("#{}", self.id())
  }
}

impl FromStr for PageId {
  type Err = ShellError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    PageId::ALL
      .into_iter()
      .find(|p| p.id() == s)
      .ok_or_else(|| ShellError::UnknownPage(s.to_string()))
  }
}

impl fmt::Display for PageId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.id())
  }
}

/// Pushed history entries, newest last.
#[derive(Debug, Default)]
pub struct History {
  entries: Vec<PageId>,
}

impl History {
  pub fn push(&mut self, page: PageId) {
    self.entries.push(page);
  }

  /// Step back one entry, returning the page that is now current.
  pub fn back(&mut self) -> Option<PageId> {
    self.entries.pop()?;
    self.entries.last().copied()
  }

  /// Oldest first.
  pub fn entries(&self) -> &[PageId] {
    &self.entries
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_known_pages() {
    for page in PageId::ALL {
      assert_eq!(page.id().parse::<PageId>(), Ok(page));
    }
  }

  #[test]
  fn test_unknown_page_rejected() {
    assert_eq!(
      "stats".parse::<PageId>(),
      Err(ShellError::UnknownPage("stats".to_string()))
    );
  }

  #[test]
  fn test_render_fragment() {
    let html = PageId::Matches.render();
    assert!(html.contains("<h2>Todos los Partidos</h2>"));
    assert!(html.contains("matches-list"));
    assert_eq!(PageId::Profile.hash(), "#profile");
  }

  #[test]
  fn test_history_back() {
    let mut history = History::default();
    history.push(PageId::Home);
    history.push(PageId::Profile);
    assert_eq!(history.back(), Some(PageId::Home));
    assert_eq!(history.back(), None);
    assert!(history.entries().is_empty());
  }
}
