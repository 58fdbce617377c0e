//! Command dispatch
//!
//! Each verb module turns parsed arguments into accessor calls and prints
//! the result. Errors travel up as `anyhow::Error` with context; only
//! `main` decides how to report them.

mod config;
mod create;
mod delete;
mod get;
mod put;
mod raw;
mod set;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::client::VcdClient;
use crate::config::{default_config_path, Config, Site};

pub use create::network_spec;

/// Runs the parsed command line to completion.
pub async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    match cli.command {
        Commands::Config { action } => config::run(&config_path, action),
        Commands::Get(args) => {
            let (site, client) = connect(&config_path).await?;
            match (args.resource, args.path) {
                (Some(resource), _) => get::run(&client, &site, resource).await,
                (None, Some(path)) => raw::get(&client, &path).await,
                (None, None) => Err(missing_target("get")),
            }
        }
        Commands::Create { resource } => {
            let (_, client) = connect(&config_path).await?;
            create::run(&client, resource).await
        }
        Commands::Set { resource } => {
            let (_, client) = connect(&config_path).await?;
            set::run(&client, resource).await
        }
        Commands::Delete(args) => {
            let (_, client) = connect(&config_path).await?;
            match (args.resource, args.path) {
                (Some(resource), _) => delete::run(&client, resource).await,
                (None, Some(path)) => raw::delete(&client, &path).await,
                (None, None) => Err(missing_target("delete")),
            }
        }
        Commands::Post(args) => {
            let (_, client) = connect(&config_path).await?;
            raw::send(&client, reqwest::Method::POST, &args.path, &args.body).await
        }
        Commands::Put(args) => {
            let (_, client) = connect(&config_path).await?;
            match (args.resource, args.path) {
                (Some(resource), _) => put::run(&client, resource).await,
                (None, Some(path)) => raw::send(&client, reqwest::Method::PUT, &path, &args.body).await,
                (None, None) => Err(missing_target("put")),
            }
        }
    }
}

/// Loads the current site and logs in to it.
async fn connect(config_path: &Path) -> Result<(Site, VcdClient)> {
    let config = Config::load(config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    let site = config.current_site()?.clone();
    debug!("Using site {} ({})", site.name, site.endpoint);

    let mut client = VcdClient::new(&site)?;
    client
        .login()
        .await
        .with_context(|| format!("Failed to log in to {}", site.endpoint))?;
    Ok((site, client))
}

fn missing_target(verb: &str) -> anyhow::Error {
    crate::error::VcdError::invalid_input(format!(
        "`{}` needs a resource or an API path, see `vcdctl {} --help`",
        verb, verb
    ))
    .into()
}
