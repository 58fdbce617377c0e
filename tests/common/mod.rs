#![allow(dead_code)]

use anyhow::Result;
use httpmock::prelude::*;
use httpmock::Mock;

use vcdctl::client::{VcdClient, ACCESS_TOKEN_HEADER, SESSION_PATH};
use vcdctl::config::Site;

pub const TOKEN: &str = "test-token";
pub const ACCEPT: &str = "application/*;version=37.1";

pub fn site_for(server: &MockServer) -> Site {
    Site::new("mock", server.base_url(), "administrator", "secret", "acme")
}

pub async fn mock_login(server: &MockServer) -> Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(POST).path(SESSION_PATH);
            then.status(200).header(ACCESS_TOKEN_HEADER, TOKEN);
        })
        .await
}

/// A client that has logged in against `server`.
pub async fn logged_in(server: &MockServer) -> Result<VcdClient> {
    mock_login(server).await;
    let mut client = VcdClient::new(&site_for(server))?;
    client.login().await?;
    Ok(client)
}

/// XML body of an `OrgList`.
pub fn org_list(orgs: &[(&str, &str)]) -> String {
    let entries: String = orgs
        .iter()
        .map(|(name, id)| {
            format!(
                r#"<Org href="https://vcd.example.com/api/org/{}" name="{}" type="application/vnd.vmware.vcloud.org+xml"/>"#,
                id, name
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><OrgList xmlns="http://www.vmware.com/vcloud/v1.5">{}</OrgList>"#,
        entries
    )
}

/// XML body of an org query returning the given records.
pub fn org_records(orgs: &[(&str, &str)]) -> String {
    let entries: String = orgs
        .iter()
        .map(|(name, id)| {
            format!(
                r#"<OrgRecord name="{}" displayName="{}" href="https://vcd.example.com/api/org/{}" isEnabled="true"/>"#,
                name, name, id
            )
        })
        .collect();
    format!(
        r#"<QueryResultRecords xmlns="http://www.vmware.com/vcloud/v1.5" total="{}" pageSize="25" page="1">{}</QueryResultRecords>"#,
        orgs.len(),
        entries
    )
}

/// XML body of one page of the admin VDC query.
pub fn vdc_page(page: u32, page_size: u32, total: u32, names: &[String]) -> String {
    let records: String = names
        .iter()
        .map(|name| {
            format!(
                r#"<AdminVdcRecord name="{0}" href="https://vcd.example.com/api/admin/vdc/id-{0}" orgName="acme" isEnabled="true" numberOfVApps="1" numberOfVMs="2"/>"#,
                name
            )
        })
        .collect();
    format!(
        r#"<QueryResultRecords xmlns="http://www.vmware.com/vcloud/v1.5" name="adminOrgVdc" page="{}" pageSize="{}" total="{}">{}</QueryResultRecords>"#,
        page, page_size, total, records
    )
}
