use std::time::Duration;

use crate::error::NavigationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BannerId(u64);

impl BannerId {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    InvalidUrl,
    LoadFailure,
    Certificate,
}

impl BannerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUrl => "invalid-url",
            Self::LoadFailure => "load-failure",
            Self::Certificate => "certificate",
        }
    }
}

impl From<&NavigationError> for BannerKind {
    fn from(err: &NavigationError) -> Self {
        match err {
            NavigationError::InvalidUrl { .. } => Self::InvalidUrl,
            NavigationError::LoadFailure { .. } => Self::LoadFailure,
            NavigationError::Certificate { .. } => Self::Certificate,
        }
    }
}

/// A transient, auto-dismissing error notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub id: BannerId,
    pub kind: BannerKind,
    pub message: String,
    pub ttl: Duration,
}

impl Banner {
    /// User-facing text for a navigation failure.
    pub fn message_for(err: &NavigationError) -> String {
        match err {
            NavigationError::InvalidUrl { .. } => {
                "Invalid URL format, please check the address".to_string()
            }
            NavigationError::LoadFailure { description, .. } => {
                format!("Unable to load page: {description}")
            }
            NavigationError::Certificate { .. } => {
                "Site certificate verification failed; it cannot be accessed securely".to_string()
            }
        }
    }
}

/// Holds at most one banner. Showing a new one supersedes the old one, and
/// the old one's pending dismissal becomes a no-op.
#[derive(Debug)]
pub struct BannerSlot {
    next_id: u64,
    current: Option<Banner>,
    ttl: Duration,
}

impl BannerSlot {
    pub fn new(ttl: Duration) -> Self {
        Self {
            next_id: 1,
            current: None,
            ttl,
        }
    }

    pub fn show(&mut self, kind: BannerKind, message: impl Into<String>) -> &Banner {
        let id = BannerId(self.next_id);
        self.next_id += 1;
        self.current.insert(Banner {
            id,
            kind,
            message: message.into(),
            ttl: self.ttl,
        })
    }

    /// Returns true if `id` was the live banner and is now gone.
    pub fn dismiss(&mut self, id: BannerId) -> bool {
        match &self.current {
            Some(banner) if banner.id == id => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Option<&Banner> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_banner_supersedes_older() {
        let mut slot = BannerSlot::new(Duration::from_secs(3));
        let first = slot.show(BannerKind::InvalidUrl, "first").id;
        let second = slot.show(BannerKind::LoadFailure, "second").id;

        assert_ne!(first, second);
        assert_eq!(slot.current().unwrap().message, "second");

        // The first banner's timer fires late and must not hide the second.
        assert!(!slot.dismiss(first));
        assert_eq!(slot.current().unwrap().id, second);

        assert!(slot.dismiss(second));
        assert!(slot.current().is_none());
        assert!(!slot.dismiss(second));
    }

    #[test]
    fn banner_carries_configured_ttl() {
        let mut slot = BannerSlot::new(Duration::from_millis(1500));
        assert_eq!(slot.show(BannerKind::Certificate, "x").ttl, Duration::from_millis(1500));
    }

    #[test]
    fn messages_follow_error_kind() {
        let err = NavigationError::LoadFailure {
            code: -2,
            description: "net::ERR_FAILED".into(),
            url: "https://example.org".into(),
        };
        assert_eq!(BannerKind::from(&err), BannerKind::LoadFailure);
        assert_eq!(Banner::message_for(&err), "Unable to load page: net::ERR_FAILED");
    }
}
