//! Raw passthrough: send a request to any API path and print the body as is

use anyhow::{Context, Result};
use reqwest::Method;
use tracing::warn;

use crate::cli::RawBody;
use crate::client::VcdClient;
use crate::validation::{parse_header, validate_api_path};

pub(super) async fn get(client: &VcdClient, path: &str) -> Result<()> {
    passthrough(client, Method::GET, path, Vec::new(), None).await
}

pub(super) async fn delete(client: &VcdClient, path: &str) -> Result<()> {
    passthrough(client, Method::DELETE, path, Vec::new(), None).await
}

pub(super) async fn send(
    client: &VcdClient,
    method: Method,
    path: &str,
    args: &RawBody,
) -> Result<()> {
    let headers = args
        .header
        .iter()
        .map(|h| parse_header(h))
        .collect::<Result<Vec<_>, _>>()?;
    let body = match &args.file {
        Some(file) => Some(
            std::fs::read(file)
                .with_context(|| format!("Failed to read request body from {}", file.display()))?,
        ),
        None => None,
    };
    passthrough(client, method, path, headers, body).await
}

async fn passthrough(
    client: &VcdClient,
    method: Method,
    path: &str,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
) -> Result<()> {
    validate_api_path(path)?;
    let header_refs: Vec<(&str, &str)> = headers
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();

    let res = client.request(method.clone(), path, &header_refs, body).await?;
    if !res.status.is_success() {
        warn!("{} {} returned {}", method, path, res.status);
    }
    println!("{}", res.text());
    Ok(())
}
