//! Navigation state: mirrors the WebView's history, maps user actions to
//! WebView commands and keeps the chrome consistent with what the WebView
//! can actually do.

use log::{debug, error, info, warn};
use url::Url;

use crate::browser::banner::{Banner, BannerId, BannerKind, BannerSlot};
use crate::browser::blocklist::CertificateBlocklist;
use crate::browser::chrome::{Chrome, Controls};
use crate::browser::ipc::{ChromeMessage, HostEvent};
use crate::browser::navigation::{normalize, NavigationEntry, NavigationHistory};
use crate::browser::webview::WebView;
use crate::error::NavigationError;
use crate::host::{HostCapability, WindowCommand};

/// What the host should do with a `new-window` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewWindowAction {
    OpenExternal(Url),
    LoadInPlace(Url),
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateDecision {
    /// Cancel the navigation. There is no "proceed" variant.
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackPress {
    WentBack,
    ConfirmExit,
}

/// Work for the host shell produced while handling a chrome message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRequest {
    Window(WindowCommand),
    OpenExternal(Url),
    /// The user confirmed leaving the app.
    Exit,
}

pub struct NavigationManager<W, C> {
    history: NavigationHistory,
    default_url: NavigationEntry,
    capability: HostCapability,
    webview: W,
    chrome: C,
    display_url: String,
    loading: bool,
    banners: BannerSlot,
    blocklist: CertificateBlocklist,
    /// An exit prompt is on screen and has not been superseded.
    exit_pending: bool,
}

impl<W: WebView, C: Chrome> NavigationManager<W, C> {
    pub fn new(
        default_url: NavigationEntry,
        capability: HostCapability,
        banners: BannerSlot,
        webview: W,
        chrome: C,
    ) -> Self {
        Self {
            history: NavigationHistory::new(),
            display_url: default_url.as_str().to_string(),
            default_url,
            capability,
            webview,
            chrome,
            loading: false,
            banners,
            blocklist: CertificateBlocklist::new(),
            exit_pending: false,
        }
    }

    pub fn with_blocklist(mut self, blocklist: CertificateBlocklist) -> Self {
        self.blocklist = blocklist;
        self
    }

    /// Seed the history with the configured default page.
    pub fn start(&mut self) {
        info!("starting at {}", self.default_url);
        let entry = self.default_url.clone();
        self.open(entry);
    }

    pub fn navigate_to(&mut self, raw_input: &str) -> Result<&NavigationEntry, NavigationError> {
        let entry = match normalize(raw_input) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("{e}");
                // Leave the typed text in the URL field for correction.
                self.show_error(&e);
                return Err(e);
            }
        };

        if self.blocklist.is_blocked(entry.as_str()) {
            let e = NavigationError::Certificate {
                url: entry.to_string(),
                error: "certificate rejected earlier in this session".to_string(),
            };
            warn!("{e}");
            self.show_error(&e);
            return Err(e);
        }

        Ok(self.open(entry))
    }

    fn open(&mut self, entry: NavigationEntry) -> &NavigationEntry {
        debug!("navigating to {entry}");
        self.exit_pending = false;
        self.webview.load(entry.as_str());
        self.set_display(entry.to_string());
        self.history.push(entry);
        self.sync_controls();
        self.history
            .current()
            .unwrap_or(&self.default_url)
    }

    pub fn go_back(&mut self) -> bool {
        if !self.controls().can_go_back {
            return false;
        }
        self.exit_pending = false;
        if let Some(entry) = self.history.go_back() {
            let url = entry.to_string();
            self.set_display(url);
        }
        self.webview.go_back();
        self.sync_controls();
        true
    }

    pub fn go_forward(&mut self) -> bool {
        if !self.controls().can_go_forward {
            return false;
        }
        if let Some(entry) = self.history.go_forward() {
            let url = entry.to_string();
            self.set_display(url);
        }
        self.webview.go_forward();
        self.sync_controls();
        true
    }

    pub fn reload(&mut self) {
        if self.history.current().is_some() {
            self.webview.reload();
        } else {
            let entry = self.default_url.clone();
            self.open(entry);
        }
    }

    /// The WebView landed on `new_url`. Its own history already moved, so
    /// no entry is added; the cursor follows when `new_url` is a neighbour.
    pub fn on_webview_navigated(&mut self, new_url: &str) {
        if self.display_url != new_url {
            debug!("webview navigated to {new_url}");
            if let Ok(url) = Url::parse(new_url) {
                self.history.follow(&url);
            }
            self.set_display(new_url.to_string());
        }
        self.sync_controls();
    }

    pub fn on_load_state_changed(&mut self, is_loading: bool) {
        if self.loading == is_loading {
            return;
        }
        self.loading = is_loading;
        self.chrome.set_loading(is_loading);
        if !is_loading {
            self.sync_controls();
        }
    }

    pub fn on_load_failed(&mut self, code: i32, description: &str, url: &str) -> NavigationError {
        let e = NavigationError::LoadFailure {
            code,
            description: description.to_string(),
            url: url.to_string(),
        };
        error!("{e}");
        self.show_error(&e);
        e
    }

    pub fn on_certificate_error(&mut self, url: &str, error: &str) -> CertificateDecision {
        let e = NavigationError::Certificate {
            url: url.to_string(),
            error: error.to_string(),
        };
        error!("{e}");
        if let Ok(parsed) = Url::parse(url) {
            self.blocklist.block(&parsed);
        }
        self.on_load_state_changed(false);
        self.show_error(&e);
        CertificateDecision::Block
    }

    pub fn on_new_window_requested(&mut self, url: &str) -> NewWindowAction {
        let parsed = match Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => parsed,
            _ => {
                debug!("ignoring new-window request for {url}");
                return NewWindowAction::Ignore;
            }
        };
        if self.capability.opens_external() {
            NewWindowAction::OpenExternal(parsed)
        } else {
            NewWindowAction::LoadInPlace(parsed)
        }
    }

    /// Hardware back button: step back, or ask before leaving the app.
    pub fn on_back_pressed(&mut self) -> BackPress {
        if self.go_back() {
            BackPress::WentBack
        } else {
            self.exit_pending = true;
            self.chrome.confirm_exit();
            BackPress::ConfirmExit
        }
    }

    /// Only an answer to a prompt raised by [`Self::on_back_pressed`] exits.
    fn on_exit_confirmed(&mut self) -> Option<HostRequest> {
        if self.exit_pending && self.capability.intercepts_back_button() {
            self.exit_pending = false;
            info!("exit confirmed");
            Some(HostRequest::Exit)
        } else {
            warn!("ignoring exit confirmation without a pending prompt");
            None
        }
    }

    /// False for addresses whose origin failed certificate validation.
    pub fn allows_navigation(&self, url: &str) -> bool {
        !self.blocklist.is_blocked(url)
    }

    pub fn dismiss_banner(&mut self, id: BannerId) {
        if self.banners.dismiss(id) {
            self.chrome.hide_banner(id);
        }
    }

    /// Push the full state again, e.g. after a new document re-created the
    /// page-side chrome.
    pub fn refresh_chrome(&mut self) {
        let controls = self.controls();
        self.chrome.set_address(&self.display_url);
        self.chrome.set_controls(controls);
        self.chrome.set_loading(self.loading);
        if let Some(banner) = self.banners.current() {
            self.chrome.show_banner(banner);
        }
    }

    /// Route a message from the page-side chrome. Window and system-browser
    /// work is handed back to the caller.
    pub fn handle_message(&mut self, msg: ChromeMessage) -> Option<HostRequest> {
        match msg {
            ChromeMessage::Navigate { url } => {
                let _ = self.navigate_to(&url);
            }
            ChromeMessage::Back => {
                self.go_back();
            }
            ChromeMessage::Forward => {
                self.go_forward();
            }
            ChromeMessage::Reload => self.reload(),
            ChromeMessage::Minimize => return self.window_request(WindowCommand::Minimize),
            ChromeMessage::Maximize => return self.window_request(WindowCommand::ToggleMaximize),
            ChromeMessage::Close => return self.window_request(WindowCommand::Close),
            ChromeMessage::DragWindow => return self.window_request(WindowCommand::StartDrag),
            ChromeMessage::SetTitle { title } => {
                return self.window_request(WindowCommand::SetTitle(title))
            }
            ChromeMessage::ChromeReady => self.refresh_chrome(),
            ChromeMessage::DidStartLoading => self.on_load_state_changed(true),
            ChromeMessage::DidStopLoading => self.on_load_state_changed(false),
            ChromeMessage::DidNavigate { url } => self.on_webview_navigated(&url),
            ChromeMessage::NewWindow { url } => match self.on_new_window_requested(&url) {
                NewWindowAction::OpenExternal(url) => return Some(HostRequest::OpenExternal(url)),
                NewWindowAction::LoadInPlace(url) => {
                    let _ = self.navigate_to(url.as_str());
                }
                NewWindowAction::Ignore => {}
            },
            ChromeMessage::HardwareBack => {
                if self.capability.intercepts_back_button() {
                    self.on_back_pressed();
                }
            }
            ChromeMessage::ExitConfirmed => return self.on_exit_confirmed(),
        }
        None
    }

    /// Route an engine event raised by the native layer.
    pub fn handle_host_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::LoadFailed {
                code,
                description,
                url,
            } => {
                self.on_load_failed(code, &description, &url);
            }
            HostEvent::CertificateError { url, error } => {
                let decision = self.on_certificate_error(&url, &error);
                debug!("certificate error for {url}: {decision:?}");
            }
        }
    }

    fn window_request(&self, command: WindowCommand) -> Option<HostRequest> {
        if self.capability.has_window_controls() {
            Some(HostRequest::Window(command))
        } else {
            debug!("{} shell has no window controls, ignoring {command:?}", self.capability);
            None
        }
    }

    /// Back/forward availability, trusting the WebView when it answers.
    pub fn controls(&self) -> Controls {
        Controls {
            can_go_back: self
                .webview
                .can_go_back()
                .unwrap_or_else(|| self.history.can_go_back()),
            can_go_forward: self
                .webview
                .can_go_forward()
                .unwrap_or_else(|| self.history.can_go_forward()),
        }
    }

    fn sync_controls(&mut self) {
        let controls = self.controls();
        self.chrome.set_controls(controls);
    }

    fn set_display(&mut self, url: String) {
        self.chrome.set_address(&url);
        self.display_url = url;
    }

    fn show_error(&mut self, err: &NavigationError) {
        let banner = self.banners.show(BannerKind::from(err), Banner::message_for(err));
        self.chrome.show_banner(banner);
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn display_url(&self) -> &str {
        &self.display_url
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banners.current()
    }

    pub fn webview(&self) -> &W {
        &self.webview
    }

    pub fn chrome(&self) -> &C {
        &self.chrome
    }
}
