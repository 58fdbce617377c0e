//! Org VDC accessors

use reqwest::Method;
use tracing::info;

use super::org::get_org;
use super::provider::{get_network_pool, get_provider_vdc, get_storage_policy};
use crate::client::{Response, VcdClient};
use crate::error::VcdResult;
use crate::models::{derive_ids, CreateVdcParams, OrgVdc, OrgVdcPage, Reference};
use crate::paging::{fetch_all_pages, find_one, sort_by_name, QueryPath};

pub const CREATE_VDC_CONTENT_TYPE: &str = "application/vnd.vmware.admin.createVdcParams+xml";

/// Every org VDC across all pages of the admin query, sorted by name.
pub async fn list_vdcs(client: &VcdClient) -> VcdResult<Vec<OrgVdc>> {
    let mut vdcs = fetch_all_pages(|page, size| {
        let path = QueryPath::new("/api/query")
            .param("type", "adminOrgVdc")
            .page(page)
            .page_size(size)
            .build();
        async move { client.get_xml::<OrgVdcPage>(&path, "org vdc query").await }
    })
    .await?;
    derive_ids(&mut vdcs);
    sort_by_name(&mut vdcs, |v| v.name.as_str());
    Ok(vdcs)
}

/// Exact name match over the full VDC list.
pub async fn find_vdc(client: &VcdClient, name: &str) -> VcdResult<OrgVdc> {
    let vdcs = list_vdcs(client).await?;
    find_one(vdcs, "org vdc", name, |v| v.name == name)
}

/// Options for a new Flex allocation VDC.
#[derive(Debug, Clone)]
pub struct NewVdcOptions<'a> {
    pub name: &'a str,
    pub org: &'a str,
    pub provider_vdc: &'a str,
    pub storage_policy: &'a str,
    pub network_pool: &'a str,
}

/// Resolves every reference the VDC needs, then posts `CreateVdcParams`.
///
/// Returns the raw response, whose body is the creation task.
pub async fn create_vdc(client: &VcdClient, opts: &NewVdcOptions<'_>) -> VcdResult<Response> {
    let org = get_org(client, opts.org).await?;
    let provider_vdc = get_provider_vdc(client, opts.provider_vdc).await?;
    let policy = get_storage_policy(client, opts.storage_policy, opts.provider_vdc).await?;
    let network_pool = get_network_pool(client, opts.network_pool).await?;

    let storage_profile = Reference {
        href: format!(
            "{}/api/admin/pvdcStorageProfile/{}",
            client.endpoint(),
            policy.urn.rsplit(':').next().unwrap_or_default()
        ),
        name: policy.name,
        id: policy.urn,
    };
    let params = CreateVdcParams::flex(opts.name, provider_vdc, storage_profile, network_pool);

    let path = format!("/api/admin/org/{}/vdcsparams", org.id);
    let res = client
        .send_xml(Method::POST, &path, CREATE_VDC_CONTENT_TYPE, &params)
        .await?;
    info!("Requested org vdc {} in org {}", opts.name, org.name);
    Ok(res)
}
