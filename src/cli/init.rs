//! Init command - create SSO groups for LAIN apps.

use dialoguer::{Input, Password};
use std::cell::OnceCell;
use tracing::info;
use zeroize::Zeroizing;

use crate::cli::{output, Exit, InitArgs};
use crate::core::config::Settings;
use crate::core::directory::{AppDirectory, ConsoleDirectory, StaticDirectory};
use crate::core::pause::ThreadSleeper;
use crate::core::provision::{GroupNaming, GroupProvisioner, ProvisionReport};
use crate::core::sso::{Credentials, HttpSso};
use crate::core::store::{self, Etcd};
use crate::core::validation;
use crate::error::{Error, Result};

/// Log in to SSO, then create one group per app.
pub fn execute(settings: &Settings, args: InitArgs) -> Result<Exit> {
    let sso_url = args.sso_url.clone().unwrap_or_else(|| settings.sso.url.clone());
    validation::validate_url("sso url", &sso_url)?;

    let sso = HttpSso::new(
        &sso_url,
        settings.request_timeout(),
        settings.sso.accept_invalid_certs,
    )?;

    let credentials = credentials(settings, &args)?;
    let token = sso.login(&credentials)?;

    let etcd = Etcd::new(
        &settings.etcd.authority,
        &settings.etcd.namespace,
        settings.request_timeout(),
    )?;

    // Read at most once, and only if something needs it.
    let domain: OnceCell<String> = OnceCell::new();
    let cluster_domain = || -> Result<String> {
        if let Some(d) = domain.get() {
            return Ok(d.clone());
        }
        let d = store::cluster_domain(&etcd)?;
        Ok(domain.get_or_init(|| d).clone())
    };

    let naming = GroupNaming::from_config(&settings.groups, &cluster_domain)?;

    let directory: Box<dyn AppDirectory> = if args.check_all {
        let console = match &settings.console.base_url {
            Some(url) => ConsoleDirectory::new(url, settings.request_timeout())?,
            None => ConsoleDirectory::for_domain(&cluster_domain()?, settings.request_timeout())?,
        };
        Box::new(console)
    } else {
        Box::new(StaticDirectory::new(settings.groups.default_apps.clone()))
    };

    let provisioner =
        GroupProvisioner::new(&sso, ThreadSleeper, naming, settings.provision_delay());
    let report = provisioner.run(&token, directory.as_ref())?;

    Ok(summarize(&report))
}

/// Fill in credentials from flags, settings, and prompts.
fn credentials(settings: &Settings, args: &InitArgs) -> Result<Credentials> {
    let prompt_failed =
        |e: dialoguer::Error| Error::LoginFailed(format!("cannot read credentials: {}", e));

    let username = match &args.username {
        Some(u) => u.clone(),
        None => Input::<String>::new()
            .with_prompt("SSO email")
            .interact_text()
            .map_err(prompt_failed)?,
    };

    let password = match &args.password {
        Some(p) => Zeroizing::new(p.clone()),
        None => Zeroizing::new(
            Password::new()
                .with_prompt("SSO password")
                .interact()
                .map_err(prompt_failed)?,
        ),
    };

    Ok(Credentials {
        client_id: args
            .cid
            .clone()
            .unwrap_or_else(|| settings.sso.client_id.clone()),
        client_secret: Zeroizing::new(
            args.secret
                .clone()
                .unwrap_or_else(|| settings.sso.client_secret.clone()),
        ),
        redirect_uri: args
            .redirect_uri
            .clone()
            .unwrap_or_else(|| settings.sso.redirect_uri.clone()),
        username,
        password,
    })
}

/// Print per-app outcomes and pick the exit status.
fn summarize(report: &ProvisionReport) -> Exit {
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(()) => output::success(&format!(
                "created sso group for app {}",
                output::name(&outcome.app.name)
            )),
            Err(e) => output::error(&format!(
                "sso group for app {} not created: {}",
                output::name(&outcome.app.name),
                e
            )),
        }
    }

    let failed = report.failed().count();
    info!(
        created = report.outcomes.len() - failed,
        failed,
        "provisioning finished"
    );

    if failed > 0 {
        output::hint("groups are named after the app only, so rerunning init is safe");
        Exit::Failure
    } else {
        Exit::Success
    }
}
