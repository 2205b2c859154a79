//! In-process model of the page the client scripts manipulate.
//!
//! Every component writes to a `Document` instead of a browser DOM. The
//! terminal UI renders from the same document, and tests assert on it.

use std::collections::{BTreeMap, BTreeSet};

/// Node ids shared across components.
pub mod ids {
  pub const SETTINGS_TITLE: &str = "ajustes-title";
  pub const LOGOUT_BUTTON: &str = "logout-btn";
  pub const LANGUAGE_FLAG: &str = "language-flag";
  pub const USER_NAME: &str = "user-name";
  pub const EMAIL: &str = "email";
  pub const MEMBER_SINCE: &str = "member-since";
  pub const LAST_LOGIN: &str = "last-login";
  pub const MAIN_CONTENT: &str = "main-content";
  pub const INSTALL_BUTTON: &str = "install-button";
  pub const LOADING_MESSAGE: &str = "loading-message";
  pub const PROGRESS_TEXT: &str = "progress-text";
}

/// Page state: text nodes, input values, body classes, root style
/// properties, meta tags and the current location.
#[derive(Debug, Clone, Default)]
pub struct Document {
  texts: BTreeMap<String, String>,
  values: BTreeMap<String, String>,
  html: BTreeMap<String, String>,
  body_classes: BTreeSet<String>,
  style: BTreeMap<String, String>,
  meta: BTreeMap<String, String>,
  visible: BTreeSet<String>,
  location: String,
  reloads: u32,
}

impl Document {
  pub fn new(location: impl Into<String>) -> Self {
    Self {
      location: location.into(),
      ..Default::default()
    }
  }

  /// Add a `<meta name=..>` tag, as authored in the page markup.
  pub fn with_meta(mut self, name: &str, content: &str) -> Self {
    self.meta.insert(name.to_string(), content.to_string());
    self
  }

  pub fn set_text(&mut self, id: &str, text: impl Into<String>) {
    self.texts.insert(id.to_string(), text.into());
  }

  pub fn text(&self, id: &str) -> Option<&str> {
    self.texts.get(id).map(String::as_str)
  }

  pub fn set_value(&mut self, id: &str, value: impl Into<String>) {
    self.values.insert(id.to_string(), value.into());
  }

  pub fn value(&self, id: &str) -> Option<&str> {
    self.values.get(id).map(String::as_str)
  }

  pub fn set_inner_html(&mut self, id: &str, html: impl Into<String>) {
    self.html.insert(id.to_string(), html.into());
  }

  pub fn inner_html(&self, id: &str) -> Option<&str> {
    self.html.get(id).map(String::as_str)
  }

  pub fn add_body_class(&mut self, class: &str) {
    self.body_classes.insert(class.to_string());
  }

  pub fn remove_body_class(&mut self, class: &str) {
    self.body_classes.remove(class);
  }

  pub fn has_body_class(&self, class: &str) -> bool {
    self.body_classes.contains(class)
  }

  pub fn set_style_property(&mut self, name: &str, value: &str) {
    self.style.insert(name.to_string(), value.to_string());
  }

  #[cfg(test)]
  pub fn style_property(&self, name: &str) -> Option<&str> {
    self.style.get(name).map(String::as_str)
  }

  /// Overwrite an existing meta tag. Returns false when the page has none.
  pub fn set_meta(&mut self, name: &str, content: &str) -> bool {
    match self.meta.get_mut(name) {
      Some(existing) => {
        *existing = content.to_string();
        true
      }
      None => false,
    }
  }

  #[cfg(test)]
  pub fn meta(&self, name: &str) -> Option<&str> {
    self.meta.get(name).map(String::as_str)
  }

  pub fn show(&mut self, id: &str) {
    self.visible.insert(id.to_string());
  }

  pub fn is_visible(&self, id: &str) -> bool {
    self.visible.contains(id)
  }

  pub fn navigate(&mut self, href: &str) {
    self.location = href.to_string();
  }

  pub fn location(&self) -> &str {
    &self.location
  }

  pub fn reload(&mut self) {
    self.reloads += 1;
  }

  pub fn reloads(&self) -> u32 {
    self.reloads
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_set_meta_requires_existing_tag() {
    let mut doc = Document::new("index.html");
    assert!(!doc.set_meta("viewport", "width=device-width"));
    assert_eq!(doc.meta("viewport"), None);

    let mut doc = doc.with_meta("viewport", "width=device-width");
    assert!(doc.set_meta("viewport", "user-scalable=no"));
    assert_eq!(doc.meta("viewport"), Some("user-scalable=no"));
  }

  #[test]
  fn test_body_classes() {
    let mut doc = Document::default();
    doc.add_body_class("page-transition");
    assert!(doc.has_body_class("page-transition"));
    doc.remove_body_class("page-transition");
    assert!(!doc.has_body_class("page-transition"));
  }
}
