//! Messages posted by the page-side chrome script.
//!
//! JavaScript calls `window.ipc.postMessage(JSON.stringify({op, payload}))`;
//! the WebView's IPC handler parses the body into a [`ChromeMessage`].
//! Load failures and certificate errors are [`HostEvent`]s instead: only the
//! native layer may raise them, so a page cannot forge them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "payload", rename_all = "kebab-case")]
pub enum ChromeMessage {
    // URL bar and buttons
    Navigate { url: String },
    Back,
    Forward,
    Reload,

    // Window chrome
    Minimize,
    Maximize,
    Close,
    DragWindow,
    SetTitle { title: String },

    // Page lifecycle
    ChromeReady,
    DidStartLoading,
    DidStopLoading,
    DidNavigate { url: String },
    NewWindow { url: String },

    // Mobile back button
    HardwareBack,
    ExitConfirmed,
}

/// Engine events the page cannot observe. Never parsed from IPC bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    LoadFailed {
        code: i32,
        description: String,
        url: String,
    },
    CertificateError { url: String, error: String },
}

impl ChromeMessage {
    pub fn from_json(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(msg) => Some(msg),
            Err(e) => {
                log::debug!("ignoring malformed chrome message {raw:?}: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_navigate_with_payload() {
        let msg = ChromeMessage::from_json(r#"{"op":"navigate","payload":{"url":"example.org"}}"#);
        assert_eq!(
            msg,
            Some(ChromeMessage::Navigate {
                url: "example.org".into()
            })
        );
    }

    #[test]
    fn parses_unit_ops_without_payload() {
        assert_eq!(ChromeMessage::from_json(r#"{"op":"back"}"#), Some(ChromeMessage::Back));
        assert_eq!(
            ChromeMessage::from_json(r#"{"op":"did-stop-loading"}"#),
            Some(ChromeMessage::DidStopLoading)
        );
        assert_eq!(
            ChromeMessage::from_json(r#"{"op":"hardware-back"}"#),
            Some(ChromeMessage::HardwareBack)
        );
    }

    #[test]
    fn parses_lifecycle_payloads() {
        let msg = ChromeMessage::from_json(
            r#"{"op":"did-navigate","payload":{"url":"https://example.org/#top"}}"#,
        );
        assert_eq!(
            msg,
            Some(ChromeMessage::DidNavigate {
                url: "https://example.org/#top".into()
            })
        );
    }

    #[test]
    fn pages_cannot_post_engine_errors() {
        assert_eq!(
            ChromeMessage::from_json(
                r#"{"op":"did-fail-load","payload":{"code":-105,"description":"ERR_NAME_NOT_RESOLVED","url":"https://x.invalid"}}"#,
            ),
            None
        );
        assert_eq!(
            ChromeMessage::from_json(
                r#"{"op":"certificate-error","payload":{"url":"https://www.example.com","error":"ERR_CERT_DATE_INVALID"}}"#,
            ),
            None
        );
    }

    #[test]
    fn rejects_unknown_or_malformed() {
        assert_eq!(ChromeMessage::from_json(r#"{"op":"self-destruct"}"#), None);
        assert_eq!(ChromeMessage::from_json("not json"), None);
        assert_eq!(ChromeMessage::from_json(r#"{"op":"navigate"}"#), None);
    }
}
