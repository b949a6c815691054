use async_trait::async_trait;
use url::Url;

use super::{AppInfo, ExternalBrowser};
use crate::error::HostError;

/// Version straight from the package manifest.
pub struct PackageInfo;

#[async_trait]
impl AppInfo for PackageInfo {
    async fn version(&self) -> Result<String, HostError> {
        Ok(env!("CARGO_PKG_VERSION").to_string())
    }
}

/// The user's default browser, via the platform opener.
pub struct SystemBrowser;

#[async_trait]
impl ExternalBrowser for SystemBrowser {
    async fn open(&self, url: &Url) -> Result<(), HostError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(HostError::Unsupported(format!(
                "opening {} links externally",
                url.scheme()
            )));
        }

        let target = url.to_string();
        let result = tokio::task::spawn_blocking({
            let target = target.clone();
            move || open::that(target)
        })
        .await
        .map_err(|e| HostError::Task(e.to_string()))?;

        result.map_err(|source| HostError::OpenExternal { url: target, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn refuses_non_web_schemes() {
        let url = Url::parse("file:///etc/passwd").unwrap();
        let err = SystemBrowser.open(&url).await.unwrap_err();
        assert!(matches!(err, HostError::Unsupported(_)));
    }
}
