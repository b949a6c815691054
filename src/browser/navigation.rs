use std::collections::VecDeque;
use std::fmt;

use url::Url;

use crate::error::NavigationError;

/// A visited address. Always carries an explicit `http://` or `https://`
/// scheme and always parses as an absolute URL.
///
/// `raw` is what gets displayed and loaded; `url` is its parsed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEntry {
    raw: String,
    url: Url,
}

impl NavigationEntry {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for NavigationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl AsRef<str> for NavigationEntry {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

fn has_web_scheme(input: &str) -> bool {
    let lower = input.get(..8).unwrap_or(input).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Turn URL-bar input into a navigable entry.
///
/// Input without a scheme gets `https://` prepended; schemed input is kept
/// as typed. Anything that still is not an absolute http(s) URL with a host
/// is rejected rather than loaded.
pub fn normalize(raw_input: &str) -> Result<NavigationEntry, NavigationError> {
    let input = raw_input.trim();
    if input.is_empty() {
        return Err(NavigationError::invalid_url(raw_input, "empty address"));
    }

    let candidate = if has_web_scheme(input) {
        input.to_string()
    } else if input.contains("://") {
        return Err(NavigationError::invalid_url(
            raw_input,
            "only http and https addresses can be opened",
        ));
    } else {
        format!("https://{input}")
    };

    let url = Url::parse(&candidate).map_err(|e| NavigationError::invalid_url(raw_input, e))?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(NavigationError::invalid_url(raw_input, "missing host"));
    }

    Ok(NavigationEntry { raw: candidate, url })
}

/// Locally mirrored navigation history with a cursor.
///
/// Pushing after going back discards everything past the cursor, the way a
/// browser branches its history.
#[derive(Debug, Default)]
pub struct NavigationHistory {
    history: VecDeque<NavigationEntry>,
    current_index: usize,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self {
            history: VecDeque::new(),
            current_index: 0,
        }
    }

    pub fn push(&mut self, entry: NavigationEntry) -> &NavigationEntry {
        if !self.history.is_empty() {
            self.history.truncate(self.current_index + 1);
        }
        self.history.push_back(entry);
        self.current_index = self.history.len() - 1;
        &self.history[self.current_index]
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty() && self.current_index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        !self.history.is_empty() && self.current_index < self.history.len() - 1
    }

    pub fn go_back(&mut self) -> Option<&NavigationEntry> {
        if self.can_go_back() {
            self.current_index -= 1;
            self.history.get(self.current_index)
        } else {
            None
        }
    }

    pub fn go_forward(&mut self) -> Option<&NavigationEntry> {
        if self.can_go_forward() {
            self.current_index += 1;
            self.history.get(self.current_index)
        } else {
            None
        }
    }

    /// Move the cursor one step when `url` is the entry just behind or ahead
    /// of it. Returns whether the cursor moved.
    pub fn follow(&mut self, url: &Url) -> bool {
        let i = self.current_index;
        if self.can_go_back() && self.history[i - 1].url() == url {
            self.current_index -= 1;
            true
        } else if self.can_go_forward() && self.history[i + 1].url() == url {
            self.current_index += 1;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<&NavigationEntry> {
        self.history.get(self.current_index)
    }

    pub fn current_index(&self) -> Option<usize> {
        (!self.history.is_empty()).then_some(self.current_index)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &NavigationEntry> {
        self.history.iter()
    }
}
