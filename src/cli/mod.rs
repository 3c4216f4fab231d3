//! Command-line interface.

pub mod close;
pub mod init;
pub mod open;
pub mod output;
pub mod status;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::config::Settings;
use crate::core::constants;
use crate::core::container::DockerCli;
use crate::core::pause::ThreadSleeper;
use crate::core::scope::{AuthScopeController, Restart, RestartPolicy, ToggleReport};
use crate::core::store::Etcd;
use crate::core::types::{AuthScope, ScopeSelector};
use crate::error::Result;

/// lain-auth - toggle LAIN auth and bootstrap SSO app groups.
#[derive(Parser)]
#[command(
    name = "lain-auth",
    about = "Toggle console and registry auth for a LAIN cluster",
    version
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (defaults to <config dir>/lain-auth/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Create SSO groups for LAIN apps
    Init(InitArgs),

    /// Enable auth
    Open(OpenArgs),

    /// Disable auth
    Close {
        /// Which auth to close
        #[arg(short, long, value_enum, default_value_t = ScopeArg::All)]
        scope: ScopeArg,
    },

    /// Show whether auth is enabled
    Status {
        /// Which auth to show
        #[arg(short, long, value_enum, default_value_t = ScopeArg::All)]
        scope: ScopeArg,
    },
}

/// Arguments for `init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Client id registered in SSO
    #[arg(short = 'c', long)]
    pub cid: Option<String>,

    /// Client secret registered in SSO
    #[arg(short, long)]
    pub secret: Option<String>,

    /// Redirect uri registered in SSO
    #[arg(short, long)]
    pub redirect_uri: Option<String>,

    /// SSO server url
    #[arg(short = 'u', long)]
    pub sso_url: Option<String>,

    /// Create groups for every app known to the console instead of the core apps
    #[arg(short = 'a', long)]
    pub check_all: bool,

    /// SSO user to log in as (prompted if omitted)
    #[arg(long)]
    pub username: Option<String>,

    /// SSO password (prompted if omitted)
    #[arg(long, env = "LAIN_SSO_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Arguments for `open`.
#[derive(Args, Debug)]
pub struct OpenArgs {
    /// Which auth to open
    #[arg(short, long, value_enum, default_value_t = ScopeArg::All)]
    pub scope: ScopeArg,

    /// Auth type for the console
    #[arg(short = 't', long = "type", default_value = constants::CONSOLE_AUTH_TYPE)]
    pub kind: String,

    /// Auth url for the console (defaults to the SSO url)
    #[arg(short, long)]
    pub url: Option<String>,

    /// Realm in which the registry authenticates
    #[arg(short, long, default_value = constants::REGISTRY_REALM)]
    pub realm: String,

    /// Name of the registry token issuer
    #[arg(short, long, default_value = constants::REGISTRY_ISSUER)]
    pub issuer: String,

    /// Service name registry tokens are issued for
    #[arg(long, default_value = constants::REGISTRY_SERVICE)]
    pub service: String,
}

/// Scope selection on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeArg {
    Console,
    Registry,
    All,
}

impl From<ScopeArg> for ScopeSelector {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Console => ScopeSelector::One(AuthScope::Console),
            ScopeArg::Registry => ScopeSelector::One(AuthScope::Registry),
            ScopeArg::All => ScopeSelector::All,
        }
    }
}

/// How a command that completed should exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Everything applied.
    Success,
    /// At least one scope or app failed.
    Failure,
    /// Everything applied, but a restart has to be done by hand.
    Partial,
}

impl Exit {
    pub fn code(self) -> i32 {
        match self {
            Exit::Success => 0,
            Exit::Failure => 1,
            Exit::Partial => 2,
        }
    }
}

/// Controller wired to etcd and the docker CLI.
pub type LiveController = AuthScopeController<Etcd, DockerCli, ThreadSleeper>;

/// Build the scope controller for `settings`.
pub fn scope_controller(settings: &Settings) -> Result<LiveController> {
    let store = Etcd::new(
        &settings.etcd.authority,
        &settings.etcd.namespace,
        settings.request_timeout(),
    )?;
    let docker = DockerCli::new(&settings.docker.binary, &settings.docker.host)
        .with_timeout(settings.docker_timeout());

    Ok(AuthScopeController::new(
        store,
        docker,
        ThreadSleeper,
        RestartPolicy::from_settings(settings),
    ))
}

/// Execute a command.
pub fn execute(cli: Cli) -> Result<Exit> {
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::Init(args) => init::execute(&settings, args),
        Command::Open(args) => open::execute(&settings, args),
        Command::Close { scope } => close::execute(&settings, scope.into()),
        Command::Status { scope } => status::execute(&settings, scope.into()),
    }
}

/// Print the per-scope results of an open/close and pick the exit status.
pub fn summarize(report: &ToggleReport) -> Exit {
    for (scope, result) in &report.results {
        match result {
            Ok(change) => match &change.restart {
                Restart::Failed(e) => {
                    output::warn(&format!(
                        "{} auth {}, but {}",
                        output::name(scope.as_str()),
                        report.action.done(),
                        e
                    ));
                }
                _ => output::success(&format!(
                    "{} auth {}",
                    output::name(scope.as_str()),
                    report.action.done()
                )),
            },
            Err(e) => output::error(&format!(
                "{} auth {} failed: {}",
                output::name(scope.as_str()),
                report.action,
                e
            )),
        }
    }

    if report.has_failures() {
        Exit::Failure
    } else if report.has_warnings() {
        output::hint("the registry still runs with its previous auth settings until it is restarted");
        Exit::Partial
    } else {
        Exit::Success
    }
}
