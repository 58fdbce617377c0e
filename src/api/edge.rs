//! Edge gateway accessors

use std::net::IpAddr;

use reqwest::Method;
use tracing::info;

use super::provider::get_provider_gateway;
use super::vdc::find_vdc;
use super::{cloud_collection, cloud_filtered, CLOUDAPI};
use crate::client::VcdClient;
use crate::error::{VcdError, VcdResult};
use crate::models::{
    EdgeGateway, EdgeGatewayUplink, EntityRef, IpRange, IpRanges, OrgVdc, ProviderGateway,
    UplinkSubnet, UplinkSubnets,
};
use crate::paging::{expect_single, Filter, QueryPath};
use crate::validation::validate_filter_value;

/// Edge gateways of the VDC named `vdc_name`, sorted by name server-side.
pub async fn list_edges(client: &VcdClient, vdc_name: &str) -> VcdResult<Vec<EdgeGateway>> {
    validate_filter_value("org vdc", vdc_name)?;
    let query = QueryPath::new(format!("{}/edgeGateways", CLOUDAPI))
        .filter(&Filter::new().eq("orgVdc.name", vdc_name))
        .param("sortAsc", "name");
    cloud_collection(client, query, "edge gateway list").await
}

pub async fn get_edge(client: &VcdClient, name: &str, vdc_name: &str) -> VcdResult<EdgeGateway> {
    validate_filter_value("edge gateway", name)?;
    validate_filter_value("org vdc", vdc_name)?;
    let query = QueryPath::new(format!("{}/edgeGateways", CLOUDAPI))
        .filter(&Filter::new().eq("name", name).eq("orgVdc.name", vdc_name));
    let edges = cloud_filtered(client, query, "edge gateway query").await?;
    expect_single(edges, "edge gateway", &format!("{} at {}", name, vdc_name))
}

#[derive(Debug, Clone)]
pub struct NewEdgeOptions {
    pub name: String,
    pub vdc: String,
    pub provider_gateway: String,
    pub description: Option<String>,
    /// Fixed uplink address; one is allocated automatically when absent.
    pub primary_ip: Option<String>,
}

/// Builds the payload of a new edge gateway uplinked to `gateway`.
///
/// The uplink subnet is the provider gateway's first subnet.
pub fn edge_payload(
    opts: &NewEdgeOptions,
    vdc: &OrgVdc,
    gateway: &ProviderGateway,
) -> VcdResult<EdgeGateway> {
    let subnet = gateway.first_subnet().ok_or_else(|| {
        VcdError::invalid_input(format!("provider gateway '{}' has no subnets", gateway.name))
    })?;

    if let Some(ip) = &opts.primary_ip {
        ip.parse::<IpAddr>().map_err(|_| {
            VcdError::invalid_input(format!("primary IP '{}' is not an IP address", ip))
        })?;
    }

    let uplink_subnet = UplinkSubnet {
        gateway: subnet.gateway.clone(),
        prefix_length: subnet.prefix_length,
        dns_suffix: subnet.dns_suffix.clone(),
        dns_server1: subnet.dns_server1.clone(),
        dns_server2: subnet.dns_server2.clone(),
        ip_ranges: opts.primary_ip.as_ref().map(|ip| IpRanges {
            values: vec![IpRange {
                start_address: ip.clone(),
                end_address: ip.clone(),
            }],
        }),
        primary_ip: opts.primary_ip.clone(),
        auto_allocate_ip_ranges: opts.primary_ip.is_none(),
        total_ip_count: opts.primary_ip.is_none().then_some(1),
    };

    Ok(EdgeGateway {
        name: opts.name.clone(),
        description: opts.description.clone(),
        edge_gateway_uplinks: vec![EdgeGatewayUplink {
            uplink_id: gateway.urn.clone(),
            uplink_name: gateway.name.clone(),
            subnets: UplinkSubnets {
                values: vec![uplink_subnet],
            },
            dedicated: false,
            ..Default::default()
        }],
        owner_ref: Some(EntityRef::named(vdc.name.clone(), vdc.urn())),
        ..Default::default()
    })
}

pub async fn create_edge(client: &VcdClient, opts: &NewEdgeOptions) -> VcdResult<EdgeGateway> {
    validate_filter_value("edge gateway", &opts.name)?;
    let vdc = find_vdc(client, &opts.vdc).await?;
    let gateway = get_provider_gateway(client, &opts.provider_gateway).await?;
    let payload = edge_payload(opts, &vdc, &gateway)?;

    client
        .send_json(Method::POST, &format!("{}/edgeGateways", CLOUDAPI), &payload)
        .await?;
    info!("Requested edge gateway {} on {}", opts.name, gateway.name);
    Ok(payload)
}
