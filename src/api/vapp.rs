//! vApp accessors: listing, lookup, networks, VMs, power and lease

use chrono::{DateTime, FixedOffset, Utc};
use reqwest::Method;
use tracing::info;

use super::org::{list_orgs, org_name_for_href};
use crate::client::{Response, VcdClient};
use crate::error::{VcdError, VcdResult};
use crate::models::{
    derive_ids, LeaseSettingsSection, LeaseSettingsUpdate, NetworkConfigSection, VApp,
    VAppDetails, VAppNetwork, VAppPage, Vm,
};
use crate::paging::{fetch_all_pages, sort_by_name, QueryPath};

pub const LEASE_CONTENT_TYPE: &str = "application/vnd.vmware.vcloud.leaseSettingsSection+xml";

/// Default deployment lease extension, one day.
pub const DEFAULT_LEASE_SECONDS: u64 = 86_400;

/// Every vApp across all query pages, with org names joined in, sorted by
/// name.
pub async fn list_vapps(client: &VcdClient) -> VcdResult<Vec<VApp>> {
    let mut vapps = fetch_all_pages(|page, size| {
        let path = QueryPath::new("/api/vApps/query")
            .page(page)
            .page_size(size)
            .build();
        async move { client.get_xml::<VAppPage>(&path, "vApp query").await }
    })
    .await?;

    let orgs = list_orgs(client).await?;
    derive_ids(&mut vapps);
    for vapp in vapps.iter_mut() {
        vapp.org_name = org_name_for_href(&orgs, &vapp.org_href).to_string();
    }
    sort_by_name(&mut vapps, |v| v.name.as_str());
    Ok(vapps)
}

/// How a vApp argument is matched against the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    /// Name or id must equal the argument.
    Exact,
    /// First vApp, in name order, whose name contains the argument.
    Substring,
}

pub fn select_vapp(vapps: Vec<VApp>, key: &str, mode: NameMatch) -> VcdResult<VApp> {
    vapps
        .into_iter()
        .find(|v| match mode {
            NameMatch::Exact => v.name == key || v.id == key,
            NameMatch::Substring => v.name.contains(key),
        })
        .ok_or_else(|| VcdError::not_found("vApp", key))
}

pub async fn find_vapp(client: &VcdClient, key: &str, mode: NameMatch) -> VcdResult<VApp> {
    let vapps = list_vapps(client).await?;
    select_vapp(vapps, key, mode)
}

pub async fn vapp_networks(client: &VcdClient, vapp_id: &str) -> VcdResult<Vec<VAppNetwork>> {
    let section: NetworkConfigSection = client
        .get_xml(
            &format!("/api/vApp/{}/networkConfigSection", vapp_id),
            "vApp network config",
        )
        .await?;
    let mut networks = section.configs;
    sort_by_name(&mut networks, |n| n.name.as_str());
    Ok(networks)
}

/// VMs of a vApp sorted by name, each with its NICs in index order.
pub async fn vapp_vms(client: &VcdClient, vapp_id: &str) -> VcdResult<Vec<Vm>> {
    let details: VAppDetails = client
        .get_xml(&format!("/api/vApp/{}", vapp_id), "vApp")
        .await?;
    let mut vms = details.children.vms;
    for vm in vms.iter_mut() {
        vm.network_connection_section
            .connections
            .sort_by_key(|c| c.index);
    }
    sort_by_name(&mut vms, |v| v.name.as_str());
    Ok(vms)
}

pub async fn vapp_lease(client: &VcdClient, vapp_id: &str) -> VcdResult<LeaseSettingsSection> {
    client
        .get_xml(
            &format!("/api/vApp/{}/leaseSettingsSection", vapp_id),
            "vApp lease settings",
        )
        .await
}

pub async fn power_on(client: &VcdClient, vapp_id: &str) -> VcdResult<Response> {
    let res = client
        .send_empty(
            Method::POST,
            &format!("/api/vApp/{}/power/action/powerOn", vapp_id),
        )
        .await?;
    info!("Power on requested for vApp {}", vapp_id);
    Ok(res)
}

/// Replaces the deployment lease, keeping the storage lease unchanged.
pub async fn set_lease(client: &VcdClient, vapp_id: &str, seconds: u64) -> VcdResult<Response> {
    let current = vapp_lease(client, vapp_id).await?;
    let update = LeaseSettingsUpdate::extend(&current, seconds);
    let res = client
        .send_xml(
            Method::PUT,
            &format!("/api/vApp/{}/leaseSettingsSection", vapp_id),
            LEASE_CONTENT_TYPE,
            &update,
        )
        .await?;
    info!("Deployment lease of vApp {} set to {}s", vapp_id, seconds);
    Ok(res)
}

/// Renews the deployment lease at its current length.
///
/// The current section is sent back without its expiration, which makes
/// the server restart the lease clock. Returns the renewed length.
pub async fn renew_lease(client: &VcdClient, vapp_id: &str) -> VcdResult<u64> {
    let current = vapp_lease(client, vapp_id).await?;
    let seconds: u64 = current
        .deployment_lease_seconds
        .trim()
        .parse()
        .map_err(|e| VcdError::decode("deployment lease seconds", e))?;
    let update = LeaseSettingsUpdate::extend(&current, seconds);
    client
        .send_xml(
            Method::PUT,
            &format!("/api/vApp/{}/leaseSettingsSection", vapp_id),
            LEASE_CONTENT_TYPE,
            &update,
        )
        .await?;
    info!("Deployment lease of vApp {} renewed for {}s", vapp_id, seconds);
    Ok(seconds)
}

/// Deployment lease expiry and the hours left until it, relative to `now`.
///
/// `None` when the section carries no expiration (e.g. powered-off vApps).
pub fn lease_expiration(
    lease: &LeaseSettingsSection,
    now: DateTime<Utc>,
) -> VcdResult<Option<(DateTime<FixedOffset>, f64)>> {
    let raw = match lease.deployment_lease_expiration.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(None),
    };
    let expires = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| VcdError::decode("deployment lease expiration", e))?;
    let hours_left = (expires.with_timezone(&Utc) - now).num_seconds() as f64 / 3600.0;
    Ok(Some((expires, hours_left)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vapp(name: &str, id: &str) -> VApp {
        VApp {
            name: name.into(),
            id: id.into(),
            ..Default::default()
        }
    }

    #[test]
    fn exact_match_ignores_substrings() {
        let vapps = vec![vapp("web-frontend", "vapp-1"), vapp("web", "vapp-2")];
        let found = select_vapp(vapps.clone(), "web", NameMatch::Exact).unwrap();
        assert_eq!(found.id, "vapp-2");

        let err = select_vapp(vapps.clone(), "front", NameMatch::Exact).unwrap_err();
        assert!(err.is_not_found());

        let by_id = select_vapp(vapps, "vapp-1", NameMatch::Exact).unwrap();
        assert_eq!(by_id.name, "web-frontend");
    }

    #[test]
    fn substring_match_takes_first_in_order() {
        let vapps = vec![vapp("db-primary", "1"), vapp("web-frontend", "2")];
        let found = select_vapp(vapps.clone(), "front", NameMatch::Substring).unwrap();
        assert_eq!(found.id, "2");
        assert!(select_vapp(vapps, "cache", NameMatch::Substring).is_err());
    }

    #[test]
    fn lease_hours_left() {
        let lease = LeaseSettingsSection {
            deployment_lease_expiration: Some("2024-03-01T12:00:00.000Z".into()),
            ..Default::default()
        };
        let now = DateTime::parse_from_rfc3339("2024-03-01T06:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let (expires, hours) = lease_expiration(&lease, now).unwrap().unwrap();
        assert_eq!(expires.to_rfc3339(), "2024-03-01T12:00:00+00:00");
        assert!((hours - 6.0).abs() < f64::EPSILON);

        let none = LeaseSettingsSection::default();
        assert!(lease_expiration(&none, now).unwrap().is_none());

        let bad = LeaseSettingsSection {
            deployment_lease_expiration: Some("tomorrow".into()),
            ..Default::default()
        };
        assert!(lease_expiration(&bad, now).is_err());
    }
}
