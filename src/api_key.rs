//! API key resolution
//!
//! dnsdist protects its web server with an optional API key. When none is
//! passed on the command line the key is scraped from the dnsdist
//! configuration file. Callers only see [`ApiKeySource`], so the scraping
//! can be swapped for a real Lua config parser without touching them.

use regex::bytes::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::logging::SensitiveApiKey;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/dnsdist/dnsdist.conf";

// Byte mode: `.` spans non-UTF-8 bytes and `\b` is ASCII-only.
static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?-u)setWebserverConfig\(.*\{.*\bapiKey\s*=\s*"(.+?)""#).unwrap()
});

/// Something that may know the dnsdist API key
pub trait ApiKeySource {
    /// The key, or `None` when it cannot be determined
    fn api_key(&self) -> Option<String>;
}

/// Extracts the key from a `setWebserverConfig({... apiKey="..." ...})` call
/// in a dnsdist configuration file. Only the first matching statement counts.
#[derive(Debug, Clone)]
pub struct ConfigFileApiKey {
    path: PathBuf,
}

impl ConfigFileApiKey {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ConfigFileApiKey {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_PATH)
    }
}

impl ApiKeySource for ConfigFileApiKey {
    fn api_key(&self) -> Option<String> {
        let content = match std::fs::read(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(
                    path = %self.path.display(),
                    error = %e,
                    "dnsdist config not readable, sending requests without API key"
                );
                return None;
            }
        };

        let key = extract_api_key(&content);
        if key.is_none() {
            tracing::debug!(path = %self.path.display(), "no apiKey found in dnsdist config");
        }
        key
    }
}

/// First `apiKey` value set through `setWebserverConfig` in `content`
pub fn extract_api_key(content: &[u8]) -> Option<String> {
    API_KEY_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
}

/// Pick the explicit key if given, otherwise ask `source`.
///
/// Returns an empty string when no key is known, meaning requests go out
/// unauthenticated.
pub fn resolve_api_key(explicit: Option<&str>, source: &dyn ApiKeySource) -> String {
    if let Some(key) = explicit.filter(|key| !key.is_empty()) {
        return key.to_string();
    }

    match source.api_key() {
        Some(key) => {
            tracing::debug!(api_key = %SensitiveApiKey::new(&key), "using API key from dnsdist config");
            key
        }
        None => String::new(),
    }
}
