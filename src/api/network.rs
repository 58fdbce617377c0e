//! Org VDC network accessors
//!
//! Listing goes through the legacy API: the admin VDC record names its
//! networks by href and each network's configuration needs its own request.
//! Single lookups, creation and connection changes use the CloudAPI, where
//! networks are addressed by URN.

use futures::future::try_join_all;
use reqwest::Method;
use tracing::{debug, info};

use super::edge::get_edge;
use super::provider::get_external_network;
use super::vdc::find_vdc;
use super::{cloud_filtered, CLOUDAPI};
use crate::client::VcdClient;
use crate::error::{VcdError, VcdResult};
use crate::models::{
    derive_ids, AdminVdc, ConnectionInfo, ConnectionType, EntityRef, IpRange, IpRanges,
    NetworkKind, NewVdcNetwork, OrgVdcNetwork, Subnet, Subnets, VdcNetworkRecord,
};
use crate::paging::{expect_single, href_id, sort_by_name, Filter, QueryPath};
use crate::validation::{validate_filter_value, GatewayCidr};

/// Networks available to the VDC with id `vdc_id`, sorted by name.
///
/// Detail requests are issued concurrently; the first failure aborts the
/// listing.
pub async fn list_vdc_networks(client: &VcdClient, vdc_id: &str) -> VcdResult<Vec<OrgVdcNetwork>> {
    let vdc: AdminVdc = client
        .get_xml(&format!("/api/admin/vdc/{}", vdc_id), "admin vdc")
        .await?;
    debug!(
        "VDC {} has {} networks",
        vdc_id,
        vdc.available_networks.networks.len()
    );

    let fetches = vdc.available_networks.networks.iter().map(|reference| {
        let path = format!("/api/admin/network/{}", href_id(&reference.href));
        async move { client.get_xml::<OrgVdcNetwork>(&path, "vdc network").await }
    });
    let mut networks = try_join_all(fetches).await?;

    derive_ids(&mut networks);
    sort_by_name(&mut networks, |n| n.name.as_str());
    Ok(networks)
}

/// CloudAPI record of network `name` in the VDC with id `vdc_id`.
pub async fn get_vdc_network(
    client: &VcdClient,
    name: &str,
    vdc_id: &str,
) -> VcdResult<VdcNetworkRecord> {
    validate_filter_value("vdc network", name)?;
    let query = QueryPath::new(format!("{}/orgVdcNetworks", CLOUDAPI)).filter(
        &Filter::new()
            .eq("name", name)
            .eq("orgVdc.id", format!("urn:vcloud:vdc:{}", vdc_id)),
    );
    let networks = cloud_filtered(client, query, "vdc network query").await?;
    expect_single(networks, "vdc network", name)
}

/// Addressing of a new isolated or routed network.
#[derive(Debug, Clone, PartialEq)]
pub struct SubnetSpec {
    pub gateway: GatewayCidr,
    pub dns1: Option<String>,
    pub dns2: Option<String>,
    pub dns_suffix: Option<String>,
    pub ip_ranges: Vec<IpRange>,
}

impl SubnetSpec {
    pub fn new(gateway: GatewayCidr) -> Self {
        Self {
            gateway,
            dns1: None,
            dns2: None,
            dns_suffix: None,
            ip_ranges: Vec::new(),
        }
    }

    pub fn to_subnets(&self) -> Subnets {
        let ip_ranges = if self.ip_ranges.is_empty() {
            None
        } else {
            Some(IpRanges {
                values: self.ip_ranges.clone(),
            })
        };
        Subnets {
            values: vec![Subnet {
                gateway: self.gateway.address.to_string(),
                prefix_length: self.gateway.prefix_length,
                dns_suffix: self.dns_suffix.clone(),
                dns_server1: self.dns1.clone(),
                dns_server2: self.dns2.clone(),
                ip_ranges,
                enabled: None,
            }],
        }
    }
}

/// What kind of network to create, with the inputs that kind needs.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkSpec {
    /// Bridged to the named external network.
    Direct { parent: String, shared: bool },
    Isolated { subnet: SubnetSpec },
    /// Routed through the named edge gateway of the same VDC.
    NatRouted {
        subnet: SubnetSpec,
        edge: String,
        distributed: bool,
    },
}

#[derive(Debug, Clone)]
pub struct NewNetworkOptions {
    pub name: String,
    pub vdc: String,
    pub description: Option<String>,
    pub spec: NetworkSpec,
}

/// Resolves the references `spec` names and posts the new network.
///
/// Returns the payload that was sent.
pub async fn create_vdc_network(
    client: &VcdClient,
    opts: &NewNetworkOptions,
) -> VcdResult<NewVdcNetwork> {
    validate_filter_value("vdc network", &opts.name)?;
    let vdc = find_vdc(client, &opts.vdc).await?;

    let kind = match &opts.spec {
        NetworkSpec::Direct { parent, shared } => {
            let external = get_external_network(client, parent).await?;
            NetworkKind::Direct {
                parent_network_id: external.entity_ref(),
                shared: *shared,
            }
        }
        NetworkSpec::Isolated { subnet } => NetworkKind::Isolated {
            subnets: subnet.to_subnets(),
        },
        NetworkSpec::NatRouted {
            subnet,
            edge,
            distributed,
        } => {
            let edge = get_edge(client, edge, &vdc.name).await?;
            NetworkKind::NatRouted {
                subnets: subnet.to_subnets(),
                connection: ConnectionInfo {
                    router_ref: EntityRef::named(edge.name.clone(), edge.urn()),
                    connection_type_value: ConnectionType::for_distributed(*distributed),
                    connected: true,
                },
            }
        }
    };

    let payload = NewVdcNetwork {
        name: opts.name.clone(),
        description: opts.description.clone(),
        owner_ref: EntityRef::named(vdc.name.clone(), vdc.urn()),
        kind,
    };
    client
        .send_json(Method::POST, &format!("{}/orgVdcNetworks", CLOUDAPI), &payload)
        .await?;
    info!(
        "Created {} network {} in {}",
        payload.kind.type_name(),
        payload.name,
        vdc.name
    );
    Ok(payload)
}

/// Target state of `set_network_connection`.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeConnection {
    Connect { edge: String, distributed: bool },
    Disconnect,
}

/// Connects a network to an edge gateway or detaches it.
///
/// The current record is fetched and PUT back whole, so fields this tool
/// does not model are preserved.
pub async fn set_network_connection(
    client: &VcdClient,
    name: &str,
    vdc_name: &str,
    target: &EdgeConnection,
) -> VcdResult<VdcNetworkRecord> {
    let vdc = find_vdc(client, vdc_name).await?;
    let mut record = get_vdc_network(client, name, &vdc.id).await?;

    match target {
        EdgeConnection::Connect { edge, distributed } => {
            let edge = get_edge(client, edge, vdc_name).await?;
            record.connect(
                EntityRef::urn(edge.urn()),
                ConnectionType::for_distributed(*distributed),
            );
        }
        EdgeConnection::Disconnect => record.disconnect(),
    }

    let urn = record_urn(&record)?;
    client
        .send_json(Method::PUT, &format!("{}/orgVdcNetworks/{}", CLOUDAPI, urn), &record)
        .await?;
    info!("Updated connection of network {} ({})", record.name, record.network_type);
    Ok(record)
}

pub async fn delete_vdc_network(client: &VcdClient, name: &str, vdc_name: &str) -> VcdResult<()> {
    let vdc = find_vdc(client, vdc_name).await?;
    let record = get_vdc_network(client, name, &vdc.id).await?;
    let urn = record_urn(&record)?;
    client
        .send_empty(Method::DELETE, &format!("{}/orgVdcNetworks/{}", CLOUDAPI, urn))
        .await?;
    info!("Deleted network {} from {}", name, vdc_name);
    Ok(())
}

fn record_urn(record: &VdcNetworkRecord) -> VcdResult<String> {
    record
        .urn
        .clone()
        .filter(|urn| !urn.is_empty())
        .ok_or_else(|| VcdError::decode("vdc network", format!("network '{}' has no id", record.name)))
}
