mod banner;
mod blocklist;
mod chrome;
mod engine;
mod ipc;
mod manager;
mod navigation;
mod webview;

pub use banner::{Banner, BannerId, BannerKind, BannerSlot};
pub use blocklist::CertificateBlocklist;
pub use chrome::{Chrome, ChromeOptions, Controls};
pub use engine::{Browser, UserEvent};
pub use ipc::{ChromeMessage, HostEvent};
pub use manager::{BackPress, CertificateDecision, HostRequest, NavigationManager, NewWindowAction};
pub use navigation::{normalize, NavigationEntry, NavigationHistory};
pub use webview::WebView;
