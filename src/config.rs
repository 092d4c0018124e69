//! Plugin configuration
//!
//! Built once per invocation from command-line input and read-only afterwards.

use std::time::Duration;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: &str = "8083";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_PREFIX: &str = "dnsdist";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: String,
    pub timeout: Duration,
    pub prefix: String,
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            prefix: DEFAULT_PREFIX.to_string(),
            api_key: None,
        }
    }
}

impl Config {
    /// Build a configuration, substituting the default for an empty prefix
    /// and treating an empty API key as unset.
    pub fn new(
        host: impl Into<String>,
        port: impl Into<String>,
        timeout: Duration,
        prefix: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        let prefix = prefix.into();
        Self {
            host: host.into(),
            port: port.into(),
            timeout,
            prefix: if prefix.is_empty() {
                DEFAULT_PREFIX.to_string()
            } else {
                prefix
            },
            api_key: api_key.filter(|key| !key.is_empty()),
        }
    }

    /// URL of the dnsdist JSON statistics endpoint
    pub fn stats_url(&self) -> String {
        format!(
            "http://{}/jsonstat?command=stats",
            join_host_port(&self.host, &self.port)
        )
    }
}

/// Join host and port, bracketing IPv6 literals
fn join_host_port(host: &str, port: &str) -> String {
    if host.contains(':') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}

/// Parse a duration such as `30s`, `1m30s`, `1.5s` or `250ms`.
///
/// Accepts the units `ns`, `us`, `µs`, `ms`, `s`, `m` and `h`. A bare `0`
/// is the only unitless value allowed.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let invalid = || format!("invalid duration: {:?}", input);

    let s = input.strip_prefix('+').unwrap_or(input);
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        return Err(invalid());
    }

    let mut total_nanos: f64 = 0.0;
    let mut rest = s;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let number = &rest[..number_len];
        if number.is_empty() || number == "." || number.matches('.').count() > 1 {
            return Err(invalid());
        }
        let value: f64 = number.parse().map_err(|_| invalid())?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let scale = match &rest[..unit_len] {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            "" => return Err(format!("missing unit in duration: {:?}", input)),
            unit => return Err(format!("unknown unit {:?} in duration: {:?}", unit, input)),
        };
        rest = &rest[unit_len..];

        total_nanos += value * scale;
    }

    if !total_nanos.is_finite() || total_nanos > u64::MAX as f64 {
        return Err(invalid());
    }
    Ok(Duration::from_nanos(total_nanos.round() as u64))
}
