//! Account session observer for the settings page.
//!
//! Reacts to the identity provider's session stream: renders the account
//! fields when a user is signed in and redirects to the entry page otherwise.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::ProviderError;
use crate::i18n::Language;
use crate::page::{ids, Document};

/// Page the settings screen falls back to without a session.
pub const ENTRY_PAGE: &str = "index.html";

/// Delay between a successful sign-out and the redirect.
pub const LOGOUT_REDIRECT_DELAY: Duration = Duration::from_millis(2000);

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Account record owned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
  pub email: String,
  #[serde(default)]
  pub metadata: UserMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
  pub creation_time: Option<DateTime<Utc>>,
  pub last_sign_in_time: Option<DateTime<Utc>>,
}

/// External identity provider boundary.
pub trait IdentityProvider: Send + Sync {
  /// Subscribe to session changes. The current value is the live session.
  fn subscribe(&self) -> watch::Receiver<Option<UserRecord>>;

  /// End the current session.
  fn sign_out(&self) -> impl Future<Output = Result<(), ProviderError>> + Send;
}

/// Identity provider backed by a locally configured account.
pub struct LocalIdentity {
  session: watch::Sender<Option<UserRecord>>,
}

impl LocalIdentity {
  pub fn new(user: Option<UserRecord>) -> Self {
    let (session, _) = watch::channel(user);
    Self { session }
  }
}

impl IdentityProvider for LocalIdentity {
  fn subscribe(&self) -> watch::Receiver<Option<UserRecord>> {
    self.session.subscribe()
  }

  async fn sign_out(&self) -> Result<(), ProviderError> {
    self.session.send_replace(None);
    Ok(())
  }
}

/// What the observer did with a session change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
  SignedIn { display_name: String },
  Redirected,
}

/// Result of the logout action, for the caller to display and schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutOutcome {
  pub toast: String,
  /// Set when the sign-out succeeded.
  pub redirect_after: Option<Duration>,
}

/// Text before the first `@` of an email address.
pub fn display_name(email: &str) -> &str {
  email.split('@').next().unwrap_or(email)
}

/// Whole days between two instants, rounded up.
fn elapsed_days(now: DateTime<Utc>, then: DateTime<Utc>) -> i64 {
  let ms = (now - then).num_milliseconds().abs();
  (ms + DAY_MS - 1) / DAY_MS
}

/// Bucketed last-login text.
pub fn last_login_label(now: DateTime<Utc>, last: DateTime<Utc>, lang: Language) -> String {
  let days = elapsed_days(now, last);
  match (days, lang) {
    (d, Language::Es) if d <= 1 => "Hoy".to_string(),
    (d, Language::En) if d <= 1 => "Today".to_string(),
    (2, Language::Es) => "Ayer".to_string(),
    (2, Language::En) => "Yesterday".to_string(),
    (d, Language::Es) if d <= 7 => format!("Hace {} días", d - 1),
    (d, Language::En) if d <= 7 => format!("{} days ago", d - 1),
    _ => calendar_date(last, lang),
  }
}

/// Month and year the account was created.
pub fn member_since_label(created: DateTime<Utc>, lang: Language) -> String {
  let month = month_name(created.month0() as usize, lang);
  match lang {
    Language::Es => format!("{} de {}", month, created.year()),
    Language::En => format!("{} {}", month, created.year()),
  }
}

fn calendar_date(at: DateTime<Utc>, lang: Language) -> String {
  match lang {
    Language::Es => format!("{}/{}/{}", at.day(), at.month(), at.year()),
    Language::En => format!("{}/{}/{}", at.month(), at.day(), at.year()),
  }
}

fn month_name(month0: usize, lang: Language) -> &'static str {
  const ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
  ];
  const EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
  ];
  match lang {
    Language::Es => ES[month0 % 12],
    Language::En => EN[month0 % 12],
  }
}

/// Render a session change into the page.
pub fn apply_session(
  doc: &mut Document,
  user: Option<&UserRecord>,
  now: DateTime<Utc>,
  lang: Language,
) -> SessionState {
  let Some(user) = user else {
    info!("no session, redirecting to {}", ENTRY_PAGE);
    doc.navigate(ENTRY_PAGE);
    return SessionState::Redirected;
  };

  let name = display_name(&user.email).to_string();
  doc.set_text(ids::USER_NAME, name.clone());
  doc.set_value(ids::EMAIL, user.email.clone());

  if let Some(created) = user.metadata.creation_time {
    doc.set_value(ids::MEMBER_SINCE, member_since_label(created, lang));
  }

  if let Some(last) = user.metadata.last_sign_in_time {
    doc.set_value(ids::LAST_LOGIN, last_login_label(now, last, lang));
  }

  SessionState::SignedIn { display_name: name }
}

/// Sign out through the provider and describe what the page should show.
pub async fn logout<P: IdentityProvider>(provider: &P, lang: Language) -> LogoutOutcome {
  let strings = lang.strings();
  match provider.sign_out().await {
    Ok(()) => {
      info!("signed out");
      LogoutOutcome {
        toast: strings.logout_success.to_string(),
        redirect_after: Some(LOGOUT_REDIRECT_DELAY),
      }
    }
    Err(e) => {
      warn!(error = %e, "sign-out failed");
      LogoutOutcome {
        toast: format!("{}{}", strings.logout_error, e.message),
        redirect_after: None,
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{Duration as ChronoDuration, TimeZone};

  struct FailingIdentity;

  impl IdentityProvider for FailingIdentity {
    fn subscribe(&self) -> watch::Receiver<Option<UserRecord>> {
      watch::channel(None).1
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
      Err(ProviderError::new("network-request-failed"))
    }
  }

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 18, 12, 0, 0).unwrap()
  }

  fn days_ago(days: i64) -> DateTime<Utc> {
    now() - ChronoDuration::days(days)
  }

  #[test]
  fn test_display_name() {
    assert_eq!(display_name("messi@futbol.com"), "messi");
    assert_eq!(display_name("a@b@c"), "a");
    assert_eq!(display_name("nobody"), "nobody");
  }

  #[test]
  fn test_last_login_buckets() {
    let es = Language::Es;
    assert_eq!(last_login_label(now(), now(), es), "Hoy");
    assert_eq!(last_login_label(now(), days_ago(1), es), "Hoy");
    assert_eq!(
      last_login_label(now(), days_ago(1) - ChronoDuration::minutes(1), es),
      "Ayer"
    );
    assert_eq!(last_login_label(now(), days_ago(2), es), "Ayer");
    assert_eq!(last_login_label(now(), days_ago(3), es), "Hace 2 días");
    assert_eq!(last_login_label(now(), days_ago(7), es), "Hace 6 días");
    assert_eq!(last_login_label(now(), days_ago(8), es), "10/10/2024");
  }

  #[test]
  fn test_last_login_english() {
    let en = Language::En;
    assert_eq!(last_login_label(now(), days_ago(1), en), "Today");
    assert_eq!(last_login_label(now(), days_ago(2), en), "Yesterday");
    assert_eq!(last_login_label(now(), days_ago(5), en), "4 days ago");
    assert_eq!(last_login_label(now(), days_ago(30), en), "9/18/2024");
  }

  #[test]
  fn test_member_since() {
    let created = Utc.with_ymd_and_hms(2023, 3, 5, 0, 0, 0).unwrap();
    assert_eq!(member_since_label(created, Language::Es), "marzo de 2023");
    assert_eq!(member_since_label(created, Language::En), "March 2023");
  }

  #[test]
  fn test_apply_session_renders_fields() {
    let mut doc = Document::new("ajustes.html");
    let user = UserRecord {
      email: "pele@futbol.com".to_string(),
      metadata: UserMetadata {
        creation_time: Some(Utc.with_ymd_and_hms(2022, 12, 1, 0, 0, 0).unwrap()),
        last_sign_in_time: Some(days_ago(2)),
      },
    };

    let state = apply_session(&mut doc, Some(&user), now(), Language::Es);
    assert_eq!(
      state,
      SessionState::SignedIn {
        display_name: "pele".to_string()
      }
    );
    assert_eq!(doc.text(ids::USER_NAME), Some("pele"));
    assert_eq!(doc.value(ids::EMAIL), Some("pele@futbol.com"));
    assert_eq!(doc.value(ids::MEMBER_SINCE), Some("diciembre de 2022"));
    assert_eq!(doc.value(ids::LAST_LOGIN), Some("Ayer"));
    assert_eq!(doc.location(), "ajustes.html");
  }

  #[test]
  fn test_apply_session_skips_missing_metadata() {
    let mut doc = Document::default();
    let user = UserRecord {
      email: "x@y.z".to_string(),
      metadata: UserMetadata::default(),
    };
    apply_session(&mut doc, Some(&user), now(), Language::Es);
    assert_eq!(doc.value(ids::MEMBER_SINCE), None);
    assert_eq!(doc.value(ids::LAST_LOGIN), None);
  }

  #[test]
  fn test_no_session_redirects() {
    let mut doc = Document::new("ajustes.html");
    let state = apply_session(&mut doc, None, now(), Language::Es);
    assert_eq!(state, SessionState::Redirected);
    assert_eq!(doc.location(), ENTRY_PAGE);
  }

  #[tokio::test]
  async fn test_logout_success_clears_session() {
    let identity = LocalIdentity::new(Some(UserRecord {
      email: "a@b.c".to_string(),
      metadata: UserMetadata::default(),
    }));
    let rx = identity.subscribe();

    let outcome = logout(&identity, Language::Es).await;
    assert_eq!(outcome.toast, "Sesión cerrada exitosamente");
    assert_eq!(outcome.redirect_after, Some(LOGOUT_REDIRECT_DELAY));
    assert!(rx.borrow().is_none());
  }

  #[tokio::test]
  async fn test_logout_failure_shows_provider_message() {
    let outcome = logout(&FailingIdentity, Language::En).await;
    assert_eq!(outcome.toast, "Error logging out: network-request-failed");
    assert_eq!(outcome.redirect_after, None);
  }
}
