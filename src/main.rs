//! lain-auth - toggle LAIN auth and bootstrap SSO app groups.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lain_auth::cli::output;
use lain_auth::cli::{execute, Cli};
use lain_auth::error::Error;

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("LAIN_AUTH_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("lain_auth=debug")
        } else {
            EnvFilter::new("lain_auth=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    match execute(cli) {
        Ok(exit) => std::process::exit(exit.code()),
        Err(e) => {
            let suggestion = match &e {
                Error::LoginFailed(_) => Some("check the SSO client id, secret and your credentials"),
                Error::DirectoryUnavailable(_) => {
                    Some("run without --check-all to provision the core apps only")
                }
                Error::ConfigReadFailed { .. } => {
                    Some("set CONSOLE_ETCD_HOST, or SSO_GROUP_NAME_PREFIX and SSO_GROUP_FULLNAME_PREFIX")
                }
                Error::TomlParse(_) => Some("fix the settings file or pass --config"),
                _ => None,
            };

            output::error(&e.to_string());
            if let Some(hint) = suggestion {
                output::hint(hint);
            }
            std::process::exit(1);
        }
    }
}
