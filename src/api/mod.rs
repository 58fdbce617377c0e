//! Resource accessors
//!
//! Each accessor composes a request path, calls the session client and
//! decodes the body into typed records. Accessors are stateless: the only
//! state they share is the bearer token held by `VcdClient`.

pub mod edge;
pub mod network;
pub mod org;
pub mod provider;
pub mod task;
pub mod vapp;
pub mod vdc;

use serde::de::DeserializeOwned;

use crate::client::VcdClient;
use crate::error::VcdResult;
use crate::models::CloudPage;
use crate::paging::{fetch_all_pages, QueryPath};

pub const CLOUDAPI: &str = "/cloudapi/1.0.0";

/// Fetches every page of a CloudAPI collection.
pub(crate) async fn cloud_collection<T: DeserializeOwned>(
    client: &VcdClient,
    query: QueryPath,
    what: &str,
) -> VcdResult<Vec<T>> {
    fetch_all_pages(move |page, size| {
        let path = query.clone().page(page).page_size(size).build();
        async move { client.get_json::<CloudPage<T>>(&path, what).await }
    })
    .await
}

/// Fetches the first page of a filtered CloudAPI query, for lookups that
/// expect at most one match.
pub(crate) async fn cloud_filtered<T: DeserializeOwned>(
    client: &VcdClient,
    query: QueryPath,
    what: &str,
) -> VcdResult<Vec<T>> {
    let page: CloudPage<T> = client.get_json(&query.build(), what).await?;
    Ok(page.values)
}
