//! The native shell around the WebView: window chrome, app metadata and the
//! system browser. Which shell is present is decided once at startup.

mod system;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::HostError;

pub use system::{PackageInfo, SystemBrowser};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HostCapability {
    /// Frameless desktop window with custom window buttons.
    Desktop,
    /// Mobile native shell: no window buttons, hardware back button.
    Mobile,
    /// Plain browser: nothing beyond the page itself.
    Browser,
}

impl HostCapability {
    pub fn detect() -> Self {
        if cfg!(any(target_os = "android", target_os = "ios")) {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    pub fn has_window_controls(self) -> bool {
        matches!(self, Self::Desktop)
    }

    pub fn intercepts_back_button(self) -> bool {
        matches!(self, Self::Mobile)
    }

    pub fn opens_external(self) -> bool {
        !matches!(self, Self::Browser)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Some(Self::Desktop),
            "mobile" => Some(Self::Mobile),
            "browser" => Some(Self::Browser),
            _ => None,
        }
    }
}

impl fmt::Display for HostCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
            Self::Browser => "browser",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowCommand {
    Minimize,
    /// Maximize, or restore when already maximized.
    ToggleMaximize,
    Close,
    SetTitle(String),
    /// Begin moving a frameless window with the pointer.
    StartDrag,
}

/// Fire-and-forget window commands.
pub trait WindowControl {
    fn minimize(&self);

    fn toggle_maximize(&self);

    fn close(&self);

    fn set_title(&self, title: &str);

    fn start_drag(&self) {}

    fn apply(&self, command: WindowCommand) {
        match command {
            WindowCommand::Minimize => self.minimize(),
            WindowCommand::ToggleMaximize => self.toggle_maximize(),
            WindowCommand::Close => self.close(),
            WindowCommand::SetTitle(title) => self.set_title(&title),
            WindowCommand::StartDrag => self.start_drag(),
        }
    }
}

#[async_trait]
pub trait AppInfo: Send + Sync {
    async fn version(&self) -> Result<String, HostError>;
}

#[async_trait]
pub trait ExternalBrowser: Send + Sync {
    async fn open(&self, url: &Url) -> Result<(), HostError>;
}

/// Capabilities of the shell selected at startup.
pub struct HostShell {
    capability: HostCapability,
    window: Option<Box<dyn WindowControl>>,
    app_info: Arc<dyn AppInfo>,
    browser: Option<Arc<dyn ExternalBrowser>>,
}

impl HostShell {
    pub fn new(
        capability: HostCapability,
        window: Option<Box<dyn WindowControl>>,
        app_info: Arc<dyn AppInfo>,
        browser: Option<Arc<dyn ExternalBrowser>>,
    ) -> Self {
        Self {
            capability,
            window,
            app_info,
            browser,
        }
    }

    /// Standard wiring for `capability`: window control only on desktop, the
    /// system browser everywhere except browser-only.
    pub fn for_capability(capability: HostCapability, window: Box<dyn WindowControl>) -> Self {
        let window = capability.has_window_controls().then_some(window);
        let browser: Option<Arc<dyn ExternalBrowser>> = capability
            .opens_external()
            .then(|| Arc::new(SystemBrowser) as Arc<dyn ExternalBrowser>);
        Self::new(capability, window, Arc::new(PackageInfo), browser)
    }

    pub fn window(&self) -> Result<&dyn WindowControl, HostError> {
        self.window
            .as_deref()
            .ok_or_else(|| HostError::Unsupported(format!("window control in {} shell", self.capability)))
    }

    pub fn app_info(&self) -> Arc<dyn AppInfo> {
        Arc::clone(&self.app_info)
    }

    pub fn external_browser(&self) -> Result<Arc<dyn ExternalBrowser>, HostError> {
        self.browser
            .clone()
            .ok_or_else(|| HostError::Unsupported(format!("external browser in {} shell", self.capability)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct RecordingWindow(Rc<RefCell<Vec<WindowCommand>>>);

    impl WindowControl for RecordingWindow {
        fn minimize(&self) {
            self.0.borrow_mut().push(WindowCommand::Minimize);
        }
        fn toggle_maximize(&self) {
            self.0.borrow_mut().push(WindowCommand::ToggleMaximize);
        }
        fn close(&self) {
            self.0.borrow_mut().push(WindowCommand::Close);
        }
        fn set_title(&self, title: &str) {
            self.0.borrow_mut().push(WindowCommand::SetTitle(title.to_string()));
        }
    }

    #[test]
    fn capability_features() {
        assert!(HostCapability::Desktop.has_window_controls());
        assert!(!HostCapability::Desktop.intercepts_back_button());
        assert!(HostCapability::Desktop.opens_external());

        assert!(!HostCapability::Mobile.has_window_controls());
        assert!(HostCapability::Mobile.intercepts_back_button());
        assert!(HostCapability::Mobile.opens_external());

        assert!(!HostCapability::Browser.has_window_controls());
        assert!(!HostCapability::Browser.intercepts_back_button());
        assert!(!HostCapability::Browser.opens_external());
    }

    #[test]
    fn capability_parse_and_display() {
        for cap in [HostCapability::Desktop, HostCapability::Mobile, HostCapability::Browser] {
            assert_eq!(HostCapability::parse(&cap.to_string()), Some(cap));
        }
        assert_eq!(HostCapability::parse(" Mobile "), Some(HostCapability::Mobile));
        assert_eq!(HostCapability::parse("tv"), None);
    }

    #[cfg(not(any(target_os = "android", target_os = "ios")))]
    #[test]
    fn detects_desktop_on_desktop_targets() {
        assert_eq!(HostCapability::detect(), HostCapability::Desktop);
    }

    #[test]
    fn apply_routes_commands() {
        let window = RecordingWindow::default();
        window.apply(WindowCommand::Minimize);
        window.apply(WindowCommand::SetTitle("Docs".into()));
        window.apply(WindowCommand::Close);
        assert_eq!(
            *window.0.borrow(),
            [
                WindowCommand::Minimize,
                WindowCommand::SetTitle("Docs".into()),
                WindowCommand::Close
            ]
        );
    }

    #[test]
    fn window_control_only_on_desktop() {
        let desktop = HostShell::for_capability(HostCapability::Desktop, Box::new(RecordingWindow::default()));
        assert!(desktop.window().is_ok());
        assert!(desktop.external_browser().is_ok());

        let mobile = HostShell::for_capability(HostCapability::Mobile, Box::new(RecordingWindow::default()));
        assert!(matches!(mobile.window(), Err(HostError::Unsupported(_))));
        assert!(mobile.external_browser().is_ok());

        let browser = HostShell::for_capability(HostCapability::Browser, Box::new(RecordingWindow::default()));
        assert!(browser.window().is_err());
        assert!(matches!(browser.external_browser(), Err(HostError::Unsupported(_))));
    }

    #[tokio::test]
    async fn app_info_reports_package_version() {
        let shell = HostShell::for_capability(HostCapability::Desktop, Box::new(RecordingWindow::default()));
        let version = shell.app_info().version().await.unwrap();
        assert_eq!(version, env!("CARGO_PKG_VERSION"));
    }
}
