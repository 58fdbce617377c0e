//! Provider-side lookups: provider VDCs, network pools, storage policies,
//! external networks and provider gateways

use super::{cloud_collection, cloud_filtered, CLOUDAPI};
use crate::client::VcdClient;
use crate::error::VcdResult;
use crate::models::{
    ExternalNetwork, NetworkPoolRecords, ProviderGateway, ProviderVdcRecords, Reference,
    StoragePolicy,
};
use crate::paging::{expect_single, href_id, Filter, QueryPath};
use crate::validation::validate_filter_value;

const TIER0_BACKING: (&str, &str) = ("networkBackings.values.backingTypeValue", "NSXT_TIER0");

fn with_urn(mut reference: Reference, kind: &str) -> Reference {
    reference.id = format!("urn:vcloud:{}:{}", kind, href_id(&reference.href));
    reference
}

pub async fn get_provider_vdc(client: &VcdClient, name: &str) -> VcdResult<Reference> {
    validate_filter_value("provider vdc", name)?;
    let path = QueryPath::new("/api/admin/extension/providerVdcReferences/query")
        .filter(&Filter::new().eq("name", name))
        .build();
    let records: ProviderVdcRecords = client.get_xml(&path, "provider vdc query").await?;
    let reference = expect_single(records.records, "provider vdc", name)?;
    Ok(with_urn(reference, "providervdc"))
}

pub async fn get_network_pool(client: &VcdClient, name: &str) -> VcdResult<Reference> {
    validate_filter_value("network pool", name)?;
    let path = QueryPath::new("/api/admin/extension/networkPoolReferences/query")
        .filter(&Filter::new().eq("name", name))
        .build();
    let records: NetworkPoolRecords = client.get_xml(&path, "network pool query").await?;
    let reference = expect_single(records.records, "network pool", name)?;
    Ok(with_urn(reference, "networkpool"))
}

/// Storage policy `name` offered by provider VDC `provider_vdc`.
pub async fn get_storage_policy(
    client: &VcdClient,
    name: &str,
    provider_vdc: &str,
) -> VcdResult<StoragePolicy> {
    validate_filter_value("storage policy", name)?;
    validate_filter_value("provider vdc", provider_vdc)?;
    let query = QueryPath::new(format!("{}/pvdcStoragePolicies", CLOUDAPI)).filter(
        &Filter::new()
            .eq("name", name)
            .eq("providerVdcRef.name", provider_vdc),
    );
    let policies = cloud_filtered(client, query, "storage policy query").await?;
    expect_single(policies, "storage policy", &format!("{} at {}", name, provider_vdc))
}

pub async fn list_external_networks(client: &VcdClient) -> VcdResult<Vec<ExternalNetwork>> {
    let query = QueryPath::new(format!("{}/externalNetworks", CLOUDAPI)).param("sortAsc", "name");
    cloud_collection(client, query, "external network list").await
}

pub async fn get_external_network(client: &VcdClient, name: &str) -> VcdResult<ExternalNetwork> {
    validate_filter_value("external network", name)?;
    let query = QueryPath::new(format!("{}/externalNetworks", CLOUDAPI))
        .filter(&Filter::new().eq("name", name));
    let networks = cloud_filtered(client, query, "external network query").await?;
    expect_single(networks, "external network", name)
}

/// External networks backed by an NSX-T Tier-0 router.
pub async fn list_provider_gateways(client: &VcdClient) -> VcdResult<Vec<ProviderGateway>> {
    let query = QueryPath::new(format!("{}/externalNetworks", CLOUDAPI))
        .filter(&Filter::new().eq(TIER0_BACKING.0, TIER0_BACKING.1))
        .param("sortAsc", "name");
    cloud_collection(client, query, "provider gateway list").await
}

pub async fn get_provider_gateway(client: &VcdClient, name: &str) -> VcdResult<ProviderGateway> {
    validate_filter_value("provider gateway", name)?;
    let query = QueryPath::new(format!("{}/externalNetworks", CLOUDAPI)).filter(
        &Filter::new()
            .eq(TIER0_BACKING.0, TIER0_BACKING.1)
            .eq("name", name),
    );
    let gateways = cloud_filtered(client, query, "provider gateway query").await?;
    expect_single(gateways, "provider gateway", name)
}
