//! Language preference and the settings page string tables.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::error::PrefsError;
use crate::page::{ids, Document};
use crate::prefs::PreferenceStore;

/// Preference key the language is persisted under.
pub const LANGUAGE_KEY: &str = "lang";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown language code '{0}' (expected 'es' or 'en')")]
pub struct UnknownLanguage(pub String);

/// Supported interface languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Language {
  #[default]
  Es,
  En,
}

impl Language {
  pub fn code(self) -> &'static str {
    match self {
      Language::Es => "es",
      Language::En => "en",
    }
  }

  pub fn toggled(self) -> Self {
    match self {
      Language::Es => Language::En,
      Language::En => Language::Es,
    }
  }

  pub fn strings(self) -> &'static Translations {
    match self {
      Language::Es => &ES,
      Language::En => &EN,
    }
  }
}

impl FromStr for Language {
  type Err = UnknownLanguage;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "es" => Ok(Language::Es),
      "en" => Ok(Language::En),
      other => Err(UnknownLanguage(other.to_string())),
    }
  }
}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.code())
  }
}

/// Fixed string table for one language.
#[derive(Debug)]
pub struct Translations {
  pub settings_title: &'static str,
  pub logout: &'static str,
  pub logout_success: &'static str,
  pub logout_error: &'static str,
  pub flag: &'static str,
}

const ES: Translations = Translations {
  settings_title: "Ajustes de Cuenta",
  logout: "Cerrar Sesión",
  logout_success: "Sesión cerrada exitosamente",
  logout_error: "Error al cerrar sesión: ",
  flag: "🇪🇸",
};

const EN: Translations = Translations {
  settings_title: "Account Settings",
  logout: "Log Out",
  logout_success: "Successfully logged out",
  logout_error: "Error logging out: ",
  flag: "🇺🇸",
};

/// Read the persisted language, falling back to Spanish.
///
/// A stored value that is not a known code is treated as absent.
pub fn load_language(prefs: &dyn PreferenceStore) -> Result<Language, PrefsError> {
  let stored = prefs.get(LANGUAGE_KEY)?;
  Ok(
    stored
      .and_then(|code| code.parse().ok())
      .unwrap_or_default(),
  )
}

/// Write the language's strings into the page and persist it.
pub fn apply_language(
  doc: &mut Document,
  prefs: &dyn PreferenceStore,
  lang: Language,
) -> Result<(), PrefsError> {
  let strings = lang.strings();
  doc.set_text(ids::SETTINGS_TITLE, strings.settings_title);
  doc.set_text(ids::LOGOUT_BUTTON, strings.logout);
  doc.set_text(ids::LANGUAGE_FLAG, strings.flag);

  prefs.set(LANGUAGE_KEY, lang.code())?;
  debug!(lang = %lang, "language applied");
  Ok(())
}

/// Switch between Spanish and English. Returns the new language.
pub fn toggle_language(
  doc: &mut Document,
  prefs: &dyn PreferenceStore,
  current: Language,
) -> Result<Language, PrefsError> {
  let next = current.toggled();
  apply_language(doc, prefs, next)?;
  Ok(next)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::prefs::MemoryPreferences;

  #[test]
  fn test_apply_writes_table_and_persists() {
    for lang in [Language::Es, Language::En] {
      let mut doc = Document::default();
      let prefs = MemoryPreferences::new();
      apply_language(&mut doc, &prefs, lang).unwrap();

      let strings = lang.strings();
      assert_eq!(doc.text(ids::SETTINGS_TITLE), Some(strings.settings_title));
      assert_eq!(doc.text(ids::LOGOUT_BUTTON), Some(strings.logout));
      assert_eq!(doc.text(ids::LANGUAGE_FLAG), Some(strings.flag));
      assert_eq!(prefs.get(LANGUAGE_KEY).unwrap().as_deref(), Some(lang.code()));
    }
  }

  #[test]
  fn test_unknown_code_is_rejected() {
    assert_eq!(
      "fr".parse::<Language>(),
      Err(UnknownLanguage("fr".to_string()))
    );
    assert_eq!("en".parse::<Language>(), Ok(Language::En));
  }

  #[test]
  fn test_load_defaults_to_spanish() {
    let prefs = MemoryPreferences::new();
    assert_eq!(load_language(&prefs).unwrap(), Language::Es);

    prefs.set(LANGUAGE_KEY, "de").unwrap();
    assert_eq!(load_language(&prefs).unwrap(), Language::Es);

    prefs.set(LANGUAGE_KEY, "en").unwrap();
    assert_eq!(load_language(&prefs).unwrap(), Language::En);
  }

  #[test]
  fn test_toggle_flips_and_persists() {
    let mut doc = Document::default();
    let prefs = MemoryPreferences::new();
    let next = toggle_language(&mut doc, &prefs, Language::Es).unwrap();
    assert_eq!(next, Language::En);
    assert_eq!(doc.text(ids::SETTINGS_TITLE), Some("Account Settings"));
    assert_eq!(load_language(&prefs).unwrap(), Language::En);
  }
}
