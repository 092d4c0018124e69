//! Log-safe rendering of credentials

use std::fmt;

/// Number of leading characters of a key that may appear in logs
const VISIBLE_CHARS: usize = 8;

/// Masked API key for log output
///
/// Shows the first 8 characters followed by `***`. Keys that are not longer
/// than that are masked entirely.
#[derive(Clone, Debug)]
pub struct SensitiveApiKey<'a> {
    inner: &'a str,
}

impl<'a> SensitiveApiKey<'a> {
    /// ```
    /// use dnsdist_plugin::logging::SensitiveApiKey;
    ///
    /// let masked = SensitiveApiKey::new("0123456789abcdef");
    /// assert_eq!(masked.to_string(), "01234567***");
    /// ```
    pub fn new(key: &'a str) -> Self {
        Self { inner: key }
    }
}

impl fmt::Display for SensitiveApiKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.char_indices().nth(VISIBLE_CHARS) {
            Some((cut, _)) => write!(f, "{}***", &self.inner[..cut]),
            None => write!(f, "***"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_api_key_display() {
        let sanitized = SensitiveApiKey::new("secret123-abcdef");
        assert_eq!(format!("{}", sanitized), "secret12***");
    }

    #[test]
    fn test_sensitive_api_key_short() {
        assert_eq!(SensitiveApiKey::new("secret").to_string(), "***");
        assert_eq!(SensitiveApiKey::new("12345678").to_string(), "***");
        assert_eq!(SensitiveApiKey::new("").to_string(), "***");
    }

    #[test]
    fn test_sensitive_api_key_multibyte() {
        assert_eq!(SensitiveApiKey::new("ключключключ").to_string(), "ключключ***");
    }
}
