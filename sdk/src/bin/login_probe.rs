//! Log in against a live account and print a summary of the loaded session.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use moysklad_sdk::config::SdkSettings;
use moysklad_sdk::domain::{Auth, DataService};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `login-probe` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "login-probe",
    about = "Log in to the remote API and summarise the session data",
    version
)]
struct CliArgs {
    /// Account login, e.g. `admin@shop`.
    #[arg(long, value_name = "login", conflicts_with = "token")]
    username: Option<String>,
    /// Account password.
    #[arg(long, value_name = "password", requires = "username")]
    password: Option<String>,
    /// Bearer access token used instead of a password.
    #[arg(long, value_name = "token")]
    token: Option<String>,
}

impl CliArgs {
    fn auth(&self) -> Result<Auth> {
        match (&self.username, &self.password, &self.token) {
            (_, _, Some(token)) => Auth::token(token).wrap_err("invalid access token"),
            (Some(username), Some(password), None) => {
                Auth::basic(username, password).wrap_err("invalid credentials")
            }
            _ => Err(eyre!("pass --username and --password, or --token")),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let auth = args.auth()?;

    // Flags belong to the probe; settings come from the environment and files.
    let settings = SdkSettings::load_from_iter([OsString::from("login-probe")])
        .wrap_err("load sdk settings")?;
    let transport = settings
        .http_transport()
        .wrap_err("build http transport")?;
    let service = DataService::new(Arc::new(transport), Arc::new(DefaultClock));

    let session = service.log_in(&auth).await.wrap_err("log in")?;
    info!(
        employee = %session.employee.name,
        currencies = session.currencies.len(),
        groups = session.groups.len(),
        metadata_kinds = session.create_shared.len(),
        price_types = session.price_types.len(),
        counterparty_tags = session.counterparty_tags.len(),
        "logged in"
    );
    Ok(())
}
