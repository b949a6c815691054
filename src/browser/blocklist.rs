use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use url::Url;

/// Origins that raised a certificate error this session.
///
/// Shared between the navigation manager and the WebView's navigation
/// handler, both on the UI thread.
#[derive(Debug, Clone, Default)]
pub struct CertificateBlocklist(Rc<RefCell<HashSet<String>>>);

impl CertificateBlocklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opaque origins (`data:`, `about:`) are not tracked.
    pub fn block(&self, url: &Url) {
        let origin = url.origin();
        if !origin.is_tuple() {
            return;
        }
        let origin = origin.ascii_serialization();
        log::warn!("blocking {origin} for the rest of the session");
        self.0.borrow_mut().insert(origin);
    }

    /// Unparseable addresses are never blocked here; `normalize` rejects them.
    pub fn is_blocked(&self, url: &str) -> bool {
        let Ok(url) = Url::parse(url) else {
            return false;
        };
        let origin = url.origin();
        if !origin.is_tuple() {
            return false;
        }
        let origin = origin.ascii_serialization();
        match self.0.try_borrow() {
            Ok(set) => set.contains(&origin),
            // Mid-update on this same thread: refuse rather than guess.
            Err(_) => true,
        }
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_whole_origin() {
        let list = CertificateBlocklist::new();
        list.block(&Url::parse("https://bad.example/login").unwrap());

        assert!(list.is_blocked("https://bad.example"));
        assert!(list.is_blocked("https://bad.example/other?page=2"));
        assert!(!list.is_blocked("http://bad.example"));
        assert!(!list.is_blocked("https://good.example"));
        assert!(!list.is_blocked("not a url"));
        assert_eq!(list.len(), 1);

        list.block(&Url::parse("data:text/html,hi").unwrap());
        assert!(!list.is_blocked("data:text/html,hi"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn clones_share_state() {
        let list = CertificateBlocklist::new();
        let handle = list.clone();
        list.block(&Url::parse("https://bad.example").unwrap());
        assert!(handle.is_blocked("https://bad.example/"));
        assert!(!handle.is_empty());
    }
}
