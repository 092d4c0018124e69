use clap::Parser;
use std::ffi::OsString;
use std::time::Duration;

use dnsdist_plugin::config::{parse_duration, Config};

#[derive(Parser, Debug)]
#[command(name = "dnsdist-plugin", about = "dnsdist metrics plugin", disable_version_flag = true)]
pub struct Cli {
    /// Show version
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    /// Metric key prefix
    #[arg(long, default_value = "dnsdist")]
    pub prefix: String,

    /// Port number
    #[arg(short = 'p', long, default_value = "8083")]
    pub port: String,

    /// Hostname
    #[arg(short = 'H', long = "hostname", default_value = "127.0.0.1")]
    pub host: String,

    /// Timeout
    #[arg(long, default_value = "30s", value_parser = parse_duration)]
    pub timeout: Duration,

    /// api key
    #[arg(long = "api-key", env = "DNSDIST_API_KEY")]
    pub api_key: Option<String>,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config::new(
            self.host.clone(),
            self.port.clone(),
            self.timeout,
            self.prefix.clone(),
            self.api_key.clone(),
        )
    }

    /// Whether `-v`/`--version` appears among `args`, for reporting the
    /// version even when the rest of the command line fails to parse
    pub fn version_requested<I, S>(args: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        args.into_iter()
            .skip(1)
            .map(Into::<OsString>::into)
            .take_while(|arg| arg != "--")
            .any(|arg| {
                let arg = arg.to_string_lossy();
                arg == "--version"
                    || (arg.starts_with('-')
                        && !arg.starts_with("--")
                        && arg[1..].chars().all(|c| c.is_ascii_alphabetic())
                        && arg[1..].contains('v'))
            })
    }
}
