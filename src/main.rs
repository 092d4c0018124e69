use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use std::process::ExitCode;

mod cli;

use dnsdist_plugin::{
    api_key::{resolve_api_key, ConfigFileApiKey},
    init_tracing,
    logging::SensitiveApiKey,
    output,
    plugin::DnsdistPlugin,
};

const STATUS_OK: u8 = 0;
const STATUS_WARNING: u8 = 1;

fn print_version() {
    let argv0 = std::env::args_os()
        .next()
        .map(|arg| arg.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dnsdist-plugin".to_string());
    println!("{} {}", argv0, env!("CARGO_PKG_VERSION"));
    println!("Compiler: rustc {}", env!("CARGO_PKG_RUST_VERSION"));
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = match cli::Cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if cli::Cli::version_requested(std::env::args_os()) {
                print_version();
                return ExitCode::from(STATUS_OK);
            }
            if matches!(e.kind(), ErrorKind::DisplayHelp) {
                let _ = e.print();
                return ExitCode::from(STATUS_OK);
            }
            eprintln!("{}", e);
            return ExitCode::from(STATUS_WARNING);
        }
    };

    if args.version {
        print_version();
        return ExitCode::from(STATUS_OK);
    }

    init_tracing();

    match run(args).await {
        Ok(()) => ExitCode::from(STATUS_OK),
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::from(STATUS_WARNING)
        }
    }
}

async fn run(args: cli::Cli) -> Result<()> {
    let config = args.config();
    let api_key = resolve_api_key(config.api_key.as_deref(), &ConfigFileApiKey::default());

    tracing::debug!(
        url = %config.stats_url(),
        timeout = ?config.timeout,
        authenticated = !api_key.is_empty(),
        api_key = %SensitiveApiKey::new(&api_key),
        "starting dnsdist plugin"
    );

    let plugin = DnsdistPlugin::new(&config, api_key)?;
    output::run(&plugin, &mut std::io::stdout().lock()).await
}
