//! Organization accessors

use reqwest::Method;
use tracing::info;

use super::CLOUDAPI;
use crate::client::VcdClient;
use crate::error::VcdResult;
use crate::models::{derive_ids, HrefRecord, NewOrg, Org, OrgList, OrgRecords};
use crate::paging::{expect_single, sort_by_name, Filter, QueryPath};
use crate::validation::validate_filter_value;

/// Name of the provider organization.
pub const SYSTEM_ORG: &str = "System";

/// All organizations visible to the session, sorted by name.
pub async fn list_orgs(client: &VcdClient) -> VcdResult<Vec<Org>> {
    let list: OrgList = client.get_xml("/api/org", "organization list").await?;
    let mut orgs = list.orgs;
    derive_ids(&mut orgs);
    sort_by_name(&mut orgs, |o| o.name.as_str());
    Ok(orgs)
}

/// Server-filtered lookup of one organization by exact name.
pub async fn get_org(client: &VcdClient, name: &str) -> VcdResult<Org> {
    validate_filter_value("org", name)?;
    let path = QueryPath::new("/api/admin/orgs/query")
        .filter(&Filter::new().eq("name", name))
        .build();
    let records: OrgRecords = client.get_xml(&path, "organization query").await?;
    let mut org = expect_single(records.records, "org", name)?;
    org.derive_id();
    Ok(org)
}

/// Name of the org whose href equals `href`, or an empty string.
pub fn org_name_for_href<'a>(orgs: &'a [Org], href: &str) -> &'a str {
    orgs.iter()
        .find(|o| o.href == href)
        .map(|o| o.name.as_str())
        .unwrap_or_default()
}

/// Creates an organization whose display name equals its name.
pub async fn create_org(client: &VcdClient, name: &str) -> VcdResult<()> {
    validate_filter_value("org", name)?;
    let payload = NewOrg {
        name: name.to_string(),
        display_name: name.to_string(),
    };
    client
        .send_json(Method::POST, &format!("{}/orgs", CLOUDAPI), &payload)
        .await?;
    info!("Created org {}", name);
    Ok(())
}

pub async fn delete_org(client: &VcdClient, name: &str) -> VcdResult<()> {
    let org = get_org(client, name).await?;
    let path = format!("{}/orgs/urn:vcloud:org:{}", CLOUDAPI, org.id);
    client.send_empty(Method::DELETE, &path).await?;
    info!("Deleted org {} ({})", org.name, org.id);
    Ok(())
}
