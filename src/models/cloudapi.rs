//! Record types of the JSON CloudAPI (`/cloudapi/1.0.0/...`)
//!
//! CloudAPI resources carry URN ids, so nothing here derives ids from hrefs.
//! Fields the API treats differently when absent are `Option`s that are
//! skipped on serialization, never zero-valued defaults.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::paging::Paged;

/// One page of a CloudAPI collection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudPage<T> {
    #[serde(default)]
    pub result_total: u32,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,
}

impl<T> Paged for CloudPage<T> {
    type Item = T;

    fn page(&self) -> u32 {
        self.page
    }
    fn page_size(&self) -> u32 {
        self.page_size
    }
    fn total(&self) -> u32 {
        self.result_total
    }
    fn into_items(self) -> Vec<T> {
        self.values
    }
}

/// `{ "name": ..., "id": "urn:..." }` reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityRef {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "id", default)]
    pub urn: String,
}

impl EntityRef {
    pub fn urn(urn: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            urn: urn.into(),
        }
    }

    pub fn named(name: impl Into<String>, urn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            urn: urn.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrg {
    pub name: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpRange {
    pub start_address: String,
    pub end_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IpRanges {
    #[serde(default)]
    pub values: Vec<IpRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subnet {
    pub gateway: String,
    pub prefix_length: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_server1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_server2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_ranges: Option<IpRanges>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subnets {
    #[serde(default)]
    pub values: Vec<Subnet>,
}

/// How a routed network attaches to its edge gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionType {
    Internal,
    Distributed,
    NonDistributed,
}

impl ConnectionType {
    pub fn for_distributed(distributed: bool) -> Self {
        if distributed {
            Self::Internal
        } else {
            Self::NonDistributed
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    pub router_ref: EntityRef,
    pub connection_type_value: ConnectionType,
    pub connected: bool,
}

/// Type-specific part of a new VDC network, tagged by `networkType`.
///
/// Each variant carries only the fields that apply to it, so the fields of
/// the other types are absent from the JSON rather than empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "networkType")]
pub enum NetworkKind {
    #[serde(rename = "DIRECT", rename_all = "camelCase")]
    Direct {
        parent_network_id: EntityRef,
        shared: bool,
    },
    #[serde(rename = "ISOLATED")]
    Isolated { subnets: Subnets },
    #[serde(rename = "NAT_ROUTED")]
    NatRouted {
        subnets: Subnets,
        connection: ConnectionInfo,
    },
}

impl NetworkKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Direct { .. } => "DIRECT",
            Self::Isolated { .. } => "ISOLATED",
            Self::NatRouted { .. } => "NAT_ROUTED",
        }
    }
}

/// Body of `POST /cloudapi/1.0.0/orgVdcNetworks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVdcNetwork {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub owner_ref: EntityRef,
    #[serde(flatten)]
    pub kind: NetworkKind,
}

/// A VDC network as returned by the CloudAPI.
///
/// Unknown fields are kept in `extra` so a record can be modified and PUT
/// back without losing data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VdcNetworkRecord {
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    pub urn: Option<String>,
    pub name: String,
    pub network_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnets: Option<Subnets>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_vdc: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_ref: Option<EntityRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VdcNetworkRecord {
    /// Routes the network through `edge`.
    pub fn connect(&mut self, edge: EntityRef, connection_type: ConnectionType) {
        self.connection = Some(ConnectionInfo {
            router_ref: edge,
            connection_type_value: connection_type,
            connected: true,
        });
        self.network_type = "NAT_ROUTED".to_string();
    }

    /// Detaches the network from its edge, leaving it isolated.
    pub fn disconnect(&mut self) {
        self.connection = None;
        self.network_type = "ISOLATED".to_string();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UplinkSubnet {
    pub gateway: String,
    pub prefix_length: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_server1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_server2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_ranges: Option<IpRanges>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_ip: Option<String>,
    #[serde(default)]
    pub auto_allocate_ip_ranges: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_ip_count: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UplinkSubnets {
    #[serde(default)]
    pub values: Vec<UplinkSubnet>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeGatewayUplink {
    pub uplink_id: String,
    #[serde(default)]
    pub uplink_name: String,
    #[serde(default)]
    pub subnets: UplinkSubnets,
    #[serde(default)]
    pub dedicated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vrf_lite_backed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backing_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkBacking {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "backingId", default)]
    pub backing_id: String,
    #[serde(default)]
    pub backing_type: String,
    #[serde(default)]
    pub network_provider: EntityRef,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkBackings {
    #[serde(default)]
    pub values: Vec<NetworkBacking>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeClusterRef {
    pub edge_cluster_ref: EntityRef,
    #[serde(default)]
    pub backing_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeClusterConfig {
    pub primary_edge_cluster: EdgeClusterRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_edge_cluster: Option<EdgeClusterRef>,
}

/// Edge gateway as listed, and as posted when creating one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeGateway {
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    pub urn: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub edge_gateway_uplinks: Vec<EdgeGatewayUplink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distributed_routing_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_vdc_network_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_backing: Option<NetworkBacking>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_cluster_config: Option<EdgeClusterConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_ref: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_vdc: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_ref: Option<EntityRef>,
}

impl EdgeGateway {
    pub fn urn(&self) -> &str {
        self.urn.as_deref().unwrap_or_default()
    }

    pub fn owner_name(&self) -> &str {
        self.owner_ref.as_ref().map(|r| r.name.as_str()).unwrap_or_default()
    }

    pub fn network_provider_name(&self) -> &str {
        self.gateway_backing
            .as_ref()
            .map(|b| b.network_provider.name.as_str())
            .unwrap_or_default()
    }

    pub fn edge_cluster_name(&self) -> &str {
        self.edge_cluster_config
            .as_ref()
            .map(|c| c.primary_edge_cluster.edge_cluster_ref.name.as_str())
            .unwrap_or_default()
    }
}

/// Tier-0 backed external network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderGateway {
    #[serde(rename = "id")]
    pub urn: String,
    pub name: String,
    #[serde(default)]
    pub subnets: UplinkSubnets,
    #[serde(default)]
    pub network_backings: NetworkBackings,
}

impl ProviderGateway {
    pub fn first_backing(&self) -> Option<&NetworkBacking> {
        self.network_backings.values.first()
    }

    pub fn first_subnet(&self) -> Option<&UplinkSubnet> {
        self.subnets.values.first()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalNetwork {
    #[serde(rename = "id")]
    pub urn: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub subnets: UplinkSubnets,
}

impl ExternalNetwork {
    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::named(self.name.clone(), self.urn.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoragePolicy {
    #[serde(rename = "id")]
    pub urn: String,
    pub name: String,
}
