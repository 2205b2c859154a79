//! Deferred add-to-home-screen prompt.

use std::future::Future;
use std::pin::Pin;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallChoice {
  Accepted,
  Dismissed,
}

/// Platform handle for the install prompt. Showing it consumes the handle.
pub trait InstallPrompt: Send {
  fn prompt(self: Box<Self>) -> Pin<Box<dyn Future<Output = InstallChoice> + Send>>;
}

/// Holds at most one captured prompt until it is used.
#[derive(Default)]
pub struct InstallPromptSlot {
  prompt: Option<Box<dyn InstallPrompt>>,
}

impl InstallPromptSlot {
  /// Capture a prompt, replacing any earlier one.
  pub fn capture(&mut self, prompt: Box<dyn InstallPrompt>) {
    self.prompt = Some(prompt);
  }

  pub fn is_available(&self) -> bool {
    self.prompt.is_some()
  }

  /// Show the captured prompt once. The slot is empty afterwards.
  pub async fn add_to_home_screen(&mut self) -> Option<InstallChoice> {
    let prompt = self.prompt.take()?;
    let choice = prompt.prompt().await;
    if choice == InstallChoice::Accepted {
      info!("user accepted app install");
    } else {
      info!("user dismissed app install");
    }
    Some(choice)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;

  struct FixedPrompt {
    choice: InstallChoice,
    shown: Arc<AtomicUsize>,
  }

  impl InstallPrompt for FixedPrompt {
    fn prompt(self: Box<Self>) -> Pin<Box<dyn Future<Output = InstallChoice> + Send>> {
      self.shown.fetch_add(1, Ordering::SeqCst);
      let choice = self.choice;
      Box::pin(async move { choice })
    }
  }

  #[tokio::test]
  async fn test_prompt_used_once() {
    let shown = Arc::new(AtomicUsize::new(0));
    let mut slot = InstallPromptSlot::default();
    slot.capture(Box::new(FixedPrompt {
      choice: InstallChoice::Accepted,
      shown: shown.clone(),
    }));
    assert!(slot.is_available());

    assert_eq!(slot.add_to_home_screen().await, Some(InstallChoice::Accepted));
    assert!(!slot.is_available());
    assert_eq!(slot.add_to_home_screen().await, None);
    assert_eq!(shown.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_empty_slot() {
    let mut slot = InstallPromptSlot::default();
    assert_eq!(slot.add_to_home_screen().await, None);
  }
}
