use std::rc::Rc;

use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use tokio::runtime::{Handle, Runtime};
use wry::application::{
    dpi::LogicalSize,
    event::{Event, StartCause, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopProxy},
    window::{Window, WindowBuilder},
};
use wry::webview::WebViewBuilder;

use crate::browser::banner::{Banner, BannerId, BannerSlot};
use crate::browser::blocklist::CertificateBlocklist;
use crate::browser::chrome::{chrome_script, js_call, Chrome, ChromeOptions, Controls};
use crate::browser::ipc::{ChromeMessage, HostEvent};
use crate::browser::manager::{HostRequest, NavigationManager};
use crate::browser::webview::WebView;
use crate::config::ShellConfig;
use crate::host::{HostShell, WindowCommand, WindowControl};

/// Everything that reaches the UI thread from callbacks and async tasks.
#[derive(Debug)]
pub enum UserEvent {
    Chrome(ChromeMessage),
    /// Raised by native code only; IPC bodies never become one.
    Host(HostEvent),
    Window(WindowCommand),
    DismissBanner(BannerId),
}

/// The real WebView behind the manager's command trait.
struct WryWebView(Rc<wry::webview::WebView>);

impl WryWebView {
    fn eval(&self, script: &str) {
        if let Err(e) = self.0.evaluate_script(script) {
            warn!("script failed: {e}");
        }
    }
}

impl WebView for WryWebView {
    fn load(&mut self, url: &str) {
        let _ = self.0.load_url(url);
    }

    fn reload(&mut self) {
        self.eval("window.location.reload()");
    }

    fn go_back(&mut self) {
        self.eval("window.history.back()");
    }

    fn go_forward(&mut self) {
        self.eval("window.history.forward()");
    }
}

/// Drives the injected chrome script and runs banner timers on the tokio
/// runtime.
struct ScriptChrome {
    webview: Rc<wry::webview::WebView>,
    runtime: Handle,
    proxy: EventLoopProxy<UserEvent>,
}

impl ScriptChrome {
    fn call(&self, method: &str, arg: &impl serde::Serialize) {
        if let Err(e) = self.webview.evaluate_script(&js_call(method, arg)) {
            warn!("chrome update {method} failed: {e}");
        }
    }
}

impl Chrome for ScriptChrome {
    fn set_address(&mut self, url: &str) {
        self.call("setAddress", &url);
    }

    fn set_controls(&mut self, controls: Controls) {
        self.call("setControls", &controls);
    }

    fn set_loading(&mut self, loading: bool) {
        self.call("setLoading", &loading);
    }

    fn show_banner(&mut self, banner: &Banner) {
        self.call(
            "showBanner",
            &serde_json::json!({
                "id": banner.id.get(),
                "kind": banner.kind.as_str(),
                "message": banner.message,
            }),
        );

        let (id, ttl, proxy) = (banner.id, banner.ttl, self.proxy.clone());
        self.runtime.spawn(async move {
            tokio::time::sleep(ttl).await;
            if proxy.send_event(UserEvent::DismissBanner(id)).is_err() {
                debug!("event loop gone before banner {} expired", id.get());
            }
        });
    }

    fn hide_banner(&mut self, id: BannerId) {
        self.call("hideBanner", &id.get());
    }

    fn confirm_exit(&mut self) {
        self.call("confirmExit", &());
    }
}

/// Window control for the desktop shell. Commands are posted to the event
/// loop, which owns the window.
struct ProxyWindowControl {
    proxy: EventLoopProxy<UserEvent>,
}

impl ProxyWindowControl {
    fn send(&self, command: WindowCommand) {
        if self.proxy.send_event(UserEvent::Window(command)).is_err() {
            debug!("event loop closed, dropping window command");
        }
    }
}

impl WindowControl for ProxyWindowControl {
    fn minimize(&self) {
        self.send(WindowCommand::Minimize);
    }

    fn toggle_maximize(&self) {
        self.send(WindowCommand::ToggleMaximize);
    }

    fn close(&self) {
        self.send(WindowCommand::Close);
    }

    fn set_title(&self, title: &str) {
        self.send(WindowCommand::SetTitle(title.to_string()));
    }

    fn start_drag(&self) {
        self.send(WindowCommand::StartDrag);
    }
}

pub struct Browser {
    config: ShellConfig,
    runtime: Runtime,
}

impl Browser {
    pub fn new(config: ShellConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("webshell-host")
            .enable_all()
            .build()
            .context("Failed to start async runtime")?;
        Ok(Self { config, runtime })
    }

    pub fn run(self) -> Result<()> {
        // EventLoop must be created on the main thread (macOS requirement)
        let event_loop = EventLoop::<UserEvent>::with_user_event();
        let proxy = event_loop.create_proxy();

        let capability = self.config.capability();
        info!("using {capability} shell");
        let host = HostShell::for_capability(
            capability,
            Box::new(ProxyWindowControl {
                proxy: proxy.clone(),
            }),
        );

        let frameless = self.config.window.frameless && capability.has_window_controls();
        let w = &self.config.window;
        let window = WindowBuilder::new()
            .with_title(&w.title)
            .with_inner_size(LogicalSize::new(w.width, w.height))
            .with_min_inner_size(LogicalSize::new(w.min_width, w.min_height))
            .with_decorations(!frameless)
            .with_resizable(w.resizable)
            .build(&event_loop)
            .context("Failed to create window")?;

        let options = ChromeOptions {
            window_buttons: frameless,
            back_key: capability.intercepts_back_button(),
            ..ChromeOptions::default()
        };

        let blocklist = CertificateBlocklist::new();
        let nav_blocklist = blocklist.clone();
        let ipc_proxy = proxy.clone();
        let new_window_proxy = proxy.clone();

        let webview = WebViewBuilder::new(window)?
            .with_url("about:blank")?
            .with_devtools(self.config.devtools)
            .with_initialization_script(&chrome_script(&options))
            .with_ipc_handler(move |_, body| {
                if let Some(msg) = ChromeMessage::from_json(&body) {
                    if ipc_proxy.send_event(UserEvent::Chrome(msg)).is_err() {
                        debug!("event loop closed, dropping chrome message");
                    }
                }
            })
            .with_navigation_handler(move |url| {
                if nav_blocklist.is_blocked(&url) {
                    warn!("refusing navigation to {url}: certificate rejected earlier");
                    return false;
                }
                true
            })
            .with_new_window_req_handler(move |url| {
                if new_window_proxy
                    .send_event(UserEvent::Chrome(ChromeMessage::NewWindow { url }))
                    .is_err()
                {
                    debug!("event loop closed, dropping new-window request");
                }
                false
            })
            .build()
            .context("Failed to create webview")?;
        let webview = Rc::new(webview);

        let chrome = ScriptChrome {
            webview: webview.clone(),
            runtime: self.runtime.handle().clone(),
            proxy: proxy.clone(),
        };
        let mut manager = NavigationManager::new(
            self.config.default_entry()?,
            capability,
            BannerSlot::new(self.config.banner_timeout()),
            WryWebView(webview.clone()),
            chrome,
        )
        .with_blocklist(blocklist);

        let app_info = host.app_info();
        self.runtime.spawn(async move {
            match app_info.version().await {
                Ok(version) => info!("App version: {version}"),
                Err(e) => warn!("could not query app version: {e}"),
            }
        });

        let runtime = self.runtime;

        event_loop.run(move |event, _, control_flow| {
            *control_flow = ControlFlow::Wait;

            match event {
                Event::NewEvents(StartCause::Init) => {
                    info!("WebShell initialized");
                    manager.start();
                }
                Event::UserEvent(UserEvent::Chrome(msg)) => {
                    if let Some(request) = manager.handle_message(msg) {
                        if Self::dispatch(&host, runtime.handle(), request) {
                            *control_flow = ControlFlow::Exit;
                        }
                    }
                }
                Event::UserEvent(UserEvent::Host(event)) => manager.handle_host_event(event),
                Event::UserEvent(UserEvent::Window(command)) => {
                    if Self::apply_window_command(webview.window(), command) {
                        *control_flow = ControlFlow::Exit;
                    }
                }
                Event::UserEvent(UserEvent::DismissBanner(id)) => manager.dismiss_banner(id),
                Event::WindowEvent {
                    event: WindowEvent::CloseRequested,
                    ..
                } => {
                    *control_flow = ControlFlow::Exit;
                }
                _ => {}
            }
        });
    }

    /// Returns true when the app should exit.
    fn dispatch(host: &HostShell, runtime: &Handle, request: HostRequest) -> bool {
        match request {
            HostRequest::Exit => return true,
            HostRequest::Window(command) => match host.window() {
                Ok(window) => window.apply(command),
                Err(e) => warn!("{e}"),
            },
            HostRequest::OpenExternal(url) => match host.external_browser() {
                Ok(browser) => {
                    info!("opening {url} in the system browser");
                    runtime.spawn(async move {
                        if let Err(e) = browser.open(&url).await {
                            error!("{e}");
                        }
                    });
                }
                Err(e) => warn!("{e}"),
            },
        }
        false
    }

    /// Returns true for `Close`.
    fn apply_window_command(window: &Window, command: WindowCommand) -> bool {
        match command {
            WindowCommand::Minimize => window.set_minimized(true),
            WindowCommand::ToggleMaximize => window.set_maximized(!window.is_maximized()),
            WindowCommand::Close => return true,
            WindowCommand::SetTitle(title) => window.set_title(&title),
            WindowCommand::StartDrag => {
                if let Err(e) = window.drag_window() {
                    debug!("window drag unavailable: {e}");
                }
            }
        }
        false
    }
}
