//! Commands the navigation manager issues to the embedded WebView.

/// The embedded browser engine, seen from the navigation manager.
///
/// Commands are fire-and-forget: their outcome arrives later as lifecycle
/// events (`did-start-loading`, `did-navigate`, ...).
pub trait WebView {
    fn load(&mut self, url: &str);

    fn reload(&mut self);

    fn go_back(&mut self);

    fn go_forward(&mut self);

    /// The engine's own answer, when it can give one. `None` means the
    /// engine does not expose its history and the local mirror is used.
    fn can_go_back(&self) -> Option<bool> {
        None
    }

    fn can_go_forward(&self) -> Option<bool> {
        None
    }
}
