//! Mobile shell: device setup, gestures, fragment navigation, toasts and
//! the platform capabilities the page relies on.

pub mod capabilities;
pub mod controller;
pub mod device;
pub mod gesture;
pub mod install;
pub mod navigation;
pub mod toast;

pub use controller::MobileShell;
pub use gesture::TouchPoint;
pub use install::{InstallChoice, InstallPrompt};
pub use navigation::PageId;
pub use toast::ToastKind;
