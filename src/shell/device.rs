//! Device classification from the user agent string.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
  Ios,
  Android,
  Desktop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfo {
  pub os: Os,
  pub mobile: bool,
}

impl DeviceInfo {
  pub fn classify(user_agent: &str) -> Self {
    let os = if ["iPad", "iPhone", "iPod"]
      .iter()
      .any(|d| user_agent.contains(d))
    {
      Os::Ios
    } else if user_agent.contains("Android") {
      Os::Android
    } else {
      Os::Desktop
    };

    let lower = user_agent.to_lowercase();
    let mobile = lower.contains("mobi") || lower.contains("android");

    Self { os, mobile }
  }

  /// Classes added to `<body>`: the OS family, then the form factor.
  pub fn body_classes(&self) -> [&'static str; 2] {
    let os = match self.os {
      Os::Ios => "ios",
      Os::Android => "android",
      Os::Desktop => "desktop",
    };
    [os, if self.mobile { "mobile" } else { "desktop" }]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148";
  const ANDROID: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 Chrome/120.0 Mobile Safari/537.36";
  const DESKTOP: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/120.0 Safari/537.36";

  #[test]
  fn test_classify_iphone() {
    let info = DeviceInfo::classify(IPHONE);
    assert_eq!(info.os, Os::Ios);
    assert!(info.mobile);
    assert_eq!(info.body_classes(), ["ios", "mobile"]);
  }

  #[test]
  fn test_classify_android() {
    let info = DeviceInfo::classify(ANDROID);
    assert_eq!(info.os, Os::Android);
    assert_eq!(info.body_classes(), ["android", "mobile"]);
  }

  #[test]
  fn test_classify_desktop() {
    let info = DeviceInfo::classify(DESKTOP);
    assert_eq!(info, DeviceInfo { os: Os::Desktop, mobile: false });
  }

  #[test]
  fn test_ipad_without_mobile_token() {
    let info = DeviceInfo::classify("Mozilla/5.0 (iPad; CPU OS 12_0 like Mac OS X)");
    assert_eq!(info.body_classes(), ["ios", "desktop"]);
  }
}
