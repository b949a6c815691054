//! Shell configuration.
//!
//! Layers, lowest to highest: built-in defaults, a TOML file, `.env.local`,
//! the process environment, command-line flags.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::browser::{normalize, NavigationEntry};
use crate::error::ConfigError;
use crate::host::HostCapability;

pub const DEFAULT_URL: &str = "https://www.example.com";
pub const ENV_FILE: &str = ".env.local";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
    /// Drop native decorations; the chrome draws its own window buttons.
    pub frameless: bool,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "WebShell".to_string(),
            width: 1280,
            height: 800,
            min_width: 800,
            min_height: 600,
            frameless: true,
            resizable: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub default_url: String,
    pub banner_timeout_ms: u64,
    pub devtools: bool,
    /// Forced host shell; detected from the target when unset.
    pub shell: Option<HostCapability>,
    pub window: WindowConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            default_url: DEFAULT_URL.to_string(),
            banner_timeout_ms: 3000,
            devtools: cfg!(debug_assertions),
            shell: None,
            window: WindowConfig::default(),
        }
    }
}

/// Values that win over every file and environment setting.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub title: Option<String>,
    pub shell: Option<HostCapability>,
}

impl ShellConfig {
    /// Load the full layered configuration.
    ///
    /// An explicit `path` must exist; the platform default path is optional.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("no config file, using defaults");
                    Self::default()
                }
            },
        };

        let mut env = read_env_file(Path::new(ENV_FILE))?;
        env.extend(std::env::vars());
        config.apply_env(|key| env.get(key).cloned())?;
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `REMOTE_URL`/`DEFAULT_URL`, `WINDOW_*`, `ENABLE_DEVTOOLS` and
    /// `WEBSHELL_SHELL`.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(url) = var("REMOTE_URL").or_else(|| var("DEFAULT_URL")) {
            self.default_url = url;
        }
        if let Some(title) = var("WINDOW_TITLE") {
            self.window.title = title;
        }
        for (key, slot) in [
            ("WINDOW_WIDTH", &mut self.window.width),
            ("WINDOW_HEIGHT", &mut self.window.height),
            ("WINDOW_MIN_WIDTH", &mut self.window.min_width),
            ("WINDOW_MIN_HEIGHT", &mut self.window.min_height),
        ] {
            if let Some(value) = var(key) {
                *slot = value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid(format!("{key}={value:?} is not a size")))?;
            }
        }
        if let Some(value) = var("WINDOW_FRAMELESS") {
            self.window.frameless = parse_flag("WINDOW_FRAMELESS", &value)?;
        }
        if let Some(value) = var("ENABLE_DEVTOOLS") {
            self.devtools = parse_flag("ENABLE_DEVTOOLS", &value)?;
        }
        if let Some(value) = var("WEBSHELL_SHELL") {
            let shell = HostCapability::parse(&value).ok_or_else(|| {
                ConfigError::Invalid(format!("WEBSHELL_SHELL={value:?} is not a known shell"))
            })?;
            self.shell = Some(shell);
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(url) = &overrides.url {
            self.default_url = url.clone();
        }
        if let Some(title) = &overrides.title {
            self.window.title = title.clone();
        }
        if let Some(shell) = overrides.shell {
            self.shell = Some(shell);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize(&self.default_url)
            .map_err(|e| ConfigError::Invalid(format!("default_url: {e}")))?;
        let w = &self.window;
        if w.width < w.min_width || w.height < w.min_height {
            return Err(ConfigError::Invalid(format!(
                "window size {}x{} is below the minimum {}x{}",
                w.width, w.height, w.min_width, w.min_height
            )));
        }
        if self.banner_timeout_ms == 0 {
            return Err(ConfigError::Invalid("banner_timeout_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn default_entry(&self) -> Result<NavigationEntry, ConfigError> {
        normalize(&self.default_url).map_err(|e| ConfigError::Invalid(format!("default_url: {e}")))
    }

    pub fn banner_timeout(&self) -> Duration {
        Duration::from_millis(self.banner_timeout_ms)
    }

    pub fn capability(&self) -> HostCapability {
        self.shell.unwrap_or_else(HostCapability::detect)
    }
}

/// `<config_dir>/webshell/config.toml`, e.g. `~/.config/webshell/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("webshell").join("config.toml"))
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid(format!("{key}={value:?} is not a boolean"))),
    }
}

/// Parse `KEY=value` lines; `#` comments and blank lines are skipped and
/// surrounding double quotes are stripped.
pub fn parse_env(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            (
                key.trim().to_string(),
                value.trim().trim_matches('"').to_string(),
            )
        })
        .collect()
}

/// A missing file is not an error.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            debug!("read environment from {}", path.display());
            Ok(parse_env(&content))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
