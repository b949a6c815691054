use std::path::PathBuf;

/// Failures of a single navigation attempt. None of these are fatal to the
/// shell; the user re-initiates.
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("invalid url `{input}`: {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("failed to load {url}: {description} (code {code})")]
    LoadFailure {
        code: i32,
        description: String,
        url: String,
    },

    #[error("certificate error for {url}: {error}")]
    Certificate { url: String, error: String },
}

impl NavigationError {
    pub fn invalid_url(input: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            input: input.into(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("not supported by this shell: {0}")]
    Unsupported(String),

    #[error("failed to open {url} externally: {source}")]
    OpenExternal {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("host task failed: {0}")]
    Task(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_error_display() {
        let err = NavigationError::invalid_url("foo bar", "invalid domain character");
        assert_eq!(
            err.to_string(),
            "invalid url `foo bar`: invalid domain character"
        );

        let err = NavigationError::LoadFailure {
            code: -105,
            description: "ERR_NAME_NOT_RESOLVED".into(),
            url: "https://nowhere.invalid".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to load https://nowhere.invalid: ERR_NAME_NOT_RESOLVED (code -105)"
        );

        let err = NavigationError::Certificate {
            url: "https://bad.example".into(),
            error: "net::ERR_CERT_AUTHORITY_INVALID".into(),
        };
        assert!(err.to_string().contains("bad.example"));
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::Read {
            path: PathBuf::from("/tmp/missing.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.to_string(), "failed to read /tmp/missing.toml: no such file");

        let err = ConfigError::Invalid("window width below minimum".into());
        assert_eq!(err.to_string(), "invalid config: window width below minimum");
    }

    #[test]
    fn host_error_display() {
        let err = HostError::Unsupported("window control".into());
        assert_eq!(err.to_string(), "not supported by this shell: window control");
    }
}
