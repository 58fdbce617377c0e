//! Record types of the legacy XML API (`/api/...`)
//!
//! Most record data lives in XML attributes (`@name`). Ids are never taken
//! from the wire: records expose a full `href` and `HrefRecord::derive_id`
//! fills `id` from its last path segment.

use serde::{Deserialize, Serialize};

use crate::paging::{href_id, Paged};
use crate::xml::{EXTENSION_NAMESPACE, OVF_NAMESPACE, VCLOUD_NAMESPACE};

/// A record whose id is derived from its href.
pub trait HrefRecord {
    fn href(&self) -> &str;
    fn set_id(&mut self, id: String);

    fn derive_id(&mut self) {
        let id = href_id(self.href()).to_string();
        self.set_id(id);
    }
}

/// Fills `id` on every record of a list.
pub fn derive_ids<T: HrefRecord>(records: &mut [T]) {
    for record in records.iter_mut() {
        record.derive_id();
    }
}

macro_rules! href_record {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl HrefRecord for $ty {
                fn href(&self) -> &str {
                    &self.href
                }
                fn set_id(&mut self, id: String) {
                    self.id = id;
                }
            }
        )+
    };
}

href_record!(Org, OrgVdc, VApp, OrgVdcNetwork);

/// `(name, href, id)` cross-reference used throughout the XML API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "@href", default, skip_serializing_if = "String::is_empty")]
    pub href: String,
    #[serde(rename = "@name", default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "@id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrgList {
    #[serde(rename = "Org", default)]
    pub orgs: Vec<Org>,
}

/// Also used for `OrgRecord` query results, which carry the same attributes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Org {
    #[serde(rename = "@href", default)]
    pub href: String,
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(skip)]
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrgRecords {
    #[serde(rename = "OrgRecord", default)]
    pub records: Vec<Org>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrgVdcPage {
    #[serde(rename = "@page", default)]
    pub page: u32,
    #[serde(rename = "@pageSize", default)]
    pub page_size: u32,
    #[serde(rename = "@total", default)]
    pub total: u32,
    #[serde(rename = "AdminVdcRecord", default)]
    pub records: Vec<OrgVdc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrgVdc {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@href", default)]
    pub href: String,
    #[serde(skip)]
    pub id: String,
    #[serde(rename = "@isEnabled", default)]
    pub is_enabled: String,
    #[serde(rename = "@orgName", default)]
    pub org_name: String,
    #[serde(rename = "@providerVdcName", default)]
    pub provider_vdc_name: String,
    #[serde(rename = "@vcName", default)]
    pub vc_name: String,
    #[serde(rename = "@networkProviderType", default)]
    pub network_provider_type: String,
    #[serde(rename = "@numberOfVApps", default)]
    pub number_of_vapps: u32,
    #[serde(rename = "@numberOfVMs", default)]
    pub number_of_vms: u32,
    #[serde(rename = "@numberOfVAppTemplates", default)]
    pub number_of_vapp_templates: u32,
}

impl OrgVdc {
    /// URN form of the VDC id used by the CloudAPI.
    pub fn urn(&self) -> String {
        format!("urn:vcloud:vdc:{}", self.id)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminVdc {
    #[serde(rename = "AvailableNetworks", default)]
    pub available_networks: AvailableNetworks,
}

#[derive(Debug, Default, Deserialize)]
pub struct AvailableNetworks {
    #[serde(rename = "Network", default)]
    pub networks: Vec<Reference>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrgVdcNetwork {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@href", default)]
    pub href: String,
    #[serde(rename = "@id", default)]
    pub urn: String,
    #[serde(skip)]
    pub id: String,
    #[serde(rename = "Configuration", default)]
    pub configuration: NetworkConfiguration,
    #[serde(rename = "IsShared", default)]
    pub is_shared: String,
}

/// Network-level configuration shared by VDC and vApp networks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkConfiguration {
    #[serde(rename = "IpScopes", default)]
    pub ip_scopes: IpScopes,
    #[serde(rename = "ParentNetwork", default)]
    pub parent_network: Option<Reference>,
    #[serde(rename = "FenceMode", default)]
    pub fence_mode: String,
}

impl NetworkConfiguration {
    /// First IP scope, or an empty one when the network has none.
    pub fn primary_scope(&self) -> IpScope {
        self.ip_scopes.scopes.first().cloned().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IpScopes {
    #[serde(rename = "IpScope", default)]
    pub scopes: Vec<IpScope>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IpScope {
    #[serde(rename = "IsInherited", default)]
    pub is_inherited: String,
    #[serde(rename = "Gateway", default)]
    pub gateway: String,
    #[serde(rename = "Netmask", default)]
    pub netmask: String,
    #[serde(rename = "SubnetPrefixLength", default)]
    pub subnet_prefix_length: String,
    #[serde(rename = "Dns1", default)]
    pub dns1: String,
    #[serde(rename = "Dns2", default)]
    pub dns2: String,
    #[serde(rename = "DnsSuffix", default)]
    pub dns_suffix: String,
    #[serde(rename = "IsEnabled", default)]
    pub is_enabled: String,
}

impl IpScope {
    /// `gateway/prefix`, as shown in listings.
    pub fn cidr(&self) -> String {
        format!("{}/{}", self.gateway, self.subnet_prefix_length)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NetworkConfigSection {
    #[serde(rename = "NetworkConfig", default)]
    pub configs: Vec<VAppNetwork>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VAppNetwork {
    #[serde(rename = "@networkName", default)]
    pub name: String,
    #[serde(rename = "Configuration", default)]
    pub configuration: NetworkConfiguration,
}

#[derive(Debug, Default, Deserialize)]
pub struct VAppPage {
    #[serde(rename = "@page", default)]
    pub page: u32,
    #[serde(rename = "@pageSize", default)]
    pub page_size: u32,
    #[serde(rename = "@total", default)]
    pub total: u32,
    #[serde(rename = "VAppRecord", default)]
    pub records: Vec<VApp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VApp {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@href", default)]
    pub href: String,
    #[serde(skip)]
    pub id: String,
    #[serde(rename = "@isEnabled", default)]
    pub is_enabled: String,
    #[serde(rename = "@status", default)]
    pub status: String,
    #[serde(rename = "@org", default)]
    pub org_href: String,
    /// Filled by joining `org_href` against the org list.
    #[serde(skip)]
    pub org_name: String,
    #[serde(rename = "@vdcName", default)]
    pub vdc_name: String,
    #[serde(rename = "@numberOfVMs", default)]
    pub number_of_vms: u32,
    #[serde(rename = "@taskStatusName", default)]
    pub task_status_name: String,
    #[serde(rename = "@taskStatus", default)]
    pub task_status: String,
}

macro_rules! paged_query {
    ($($page:ty => $item:ty),+ $(,)?) => {
        $(
            impl Paged for $page {
                type Item = $item;
                fn page(&self) -> u32 {
                    self.page
                }
                fn page_size(&self) -> u32 {
                    self.page_size
                }
                fn total(&self) -> u32 {
                    self.total
                }
                fn into_items(self) -> Vec<$item> {
                    self.records
                }
            }
        )+
    };
}

paged_query!(OrgVdcPage => OrgVdc, VAppPage => VApp);

#[derive(Debug, Default, Deserialize)]
pub struct VAppDetails {
    #[serde(rename = "Children", default)]
    pub children: VmList,
}

#[derive(Debug, Default, Deserialize)]
pub struct VmList {
    #[serde(rename = "Vm", default)]
    pub vms: Vec<Vm>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Vm {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@id", default)]
    pub urn: String,
    #[serde(rename = "@href", default)]
    pub href: String,
    #[serde(rename = "NetworkConnectionSection", default)]
    pub network_connection_section: NetworkConnectionSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkConnectionSection {
    #[serde(rename = "PrimaryNetworkConnectionIndex", default)]
    pub primary_index: Option<u32>,
    #[serde(rename = "NetworkConnection", default)]
    pub connections: Vec<NetworkConnection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkConnection {
    #[serde(rename = "@network", default)]
    pub network: String,
    #[serde(rename = "NetworkConnectionIndex", default)]
    pub index: u32,
    #[serde(rename = "IpAddress", default)]
    pub ip_address: String,
    #[serde(rename = "IpType", default)]
    pub ip_type: String,
    #[serde(rename = "IsConnected", default)]
    pub is_connected: String,
    #[serde(rename = "MACAddress", default)]
    pub mac_address: String,
    #[serde(rename = "IpAddressAllocationMode", default)]
    pub allocation_mode: String,
    #[serde(rename = "NetworkAdapterType", default)]
    pub adapter_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaseSettingsSection {
    #[serde(rename = "@href", default)]
    pub href: String,
    #[serde(rename = "@type", default)]
    pub media_type: String,
    #[serde(rename = "DeploymentLeaseInSeconds", default)]
    pub deployment_lease_seconds: String,
    #[serde(rename = "StorageLeaseInSeconds", default)]
    pub storage_lease_seconds: String,
    #[serde(rename = "DeploymentLeaseExpiration", default)]
    pub deployment_lease_expiration: Option<String>,
    #[serde(rename = "StorageLeaseExpiration", default)]
    pub storage_lease_expiration: Option<String>,
}

/// Body of `PUT /api/vApp/{id}/leaseSettingsSection`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename = "LeaseSettingsSection")]
pub struct LeaseSettingsUpdate {
    #[serde(rename = "@xmlns")]
    pub xmlns: &'static str,
    #[serde(rename = "@xmlns:ovf")]
    pub xmlns_ovf: &'static str,
    #[serde(rename = "@href", skip_serializing_if = "String::is_empty")]
    pub href: String,
    #[serde(rename = "@type", skip_serializing_if = "String::is_empty")]
    pub media_type: String,
    #[serde(rename = "@ovf:required")]
    pub ovf_required: bool,
    #[serde(rename = "ovf:Info")]
    pub info: &'static str,
    #[serde(rename = "DeploymentLeaseInSeconds")]
    pub deployment_lease_seconds: u64,
    #[serde(rename = "StorageLeaseInSeconds")]
    pub storage_lease_seconds: String,
}

impl LeaseSettingsUpdate {
    /// New deployment lease, keeping the current storage lease.
    pub fn extend(current: &LeaseSettingsSection, deployment_lease_seconds: u64) -> Self {
        Self {
            xmlns: VCLOUD_NAMESPACE,
            xmlns_ovf: OVF_NAMESPACE,
            href: current.href.clone(),
            media_type: current.media_type.clone(),
            ovf_required: false,
            info: "Lease settings section",
            deployment_lease_seconds,
            storage_lease_seconds: current.storage_lease_seconds.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskList {
    #[serde(rename = "Task", default)]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Task {
    #[serde(rename = "@operation", default)]
    pub operation: String,
    #[serde(rename = "@operationName", default)]
    pub operation_name: String,
    #[serde(rename = "@status", default)]
    pub status: String,
    #[serde(rename = "@startTime", default)]
    pub start_time: String,
    #[serde(rename = "@endTime", default)]
    pub end_time: String,
    #[serde(rename = "@href", default)]
    pub href: String,
    #[serde(rename = "@id", default)]
    pub urn: String,
    #[serde(rename = "Organization", default)]
    pub org: Reference,
    #[serde(rename = "User", default)]
    pub user: Reference,
    #[serde(rename = "Owner", default)]
    pub owner: Reference,
    #[serde(rename = "Error", default)]
    pub error: Option<TaskError>,
    #[serde(rename = "VcTaskList", default)]
    pub vc_task_list: Option<VcTaskList>,
}

impl Task {
    pub fn id(&self) -> &str {
        href_id(&self.href)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskError {
    #[serde(rename = "@stackTrace", default)]
    pub stack_trace: String,
    #[serde(rename = "@majorErrorCode", default)]
    pub major_error_code: String,
    #[serde(rename = "@minorErrorCode", default)]
    pub minor_error_code: String,
    #[serde(rename = "TenantError", default)]
    pub tenant_error: TenantError,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TenantError {
    #[serde(rename = "@message", default)]
    pub message: String,
    #[serde(rename = "@majorErrorCode", default)]
    pub major_error_code: String,
    #[serde(rename = "@minorErrorCode", default)]
    pub minor_error_code: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VcTaskList {
    #[serde(rename = "VcTask", default)]
    pub tasks: Vec<VcTask>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VcTask {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@description", default)]
    pub description: String,
    #[serde(rename = "@status", default)]
    pub status: String,
    #[serde(rename = "@objectType", default)]
    pub object_type: String,
    #[serde(rename = "@objectName", default)]
    pub object_name: String,
    #[serde(rename = "@objectMoref", default)]
    pub object_moref: String,
    #[serde(rename = "@startTime", default)]
    pub start_time: String,
    #[serde(rename = "@endTime", default)]
    pub end_time: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProviderVdcRecords {
    #[serde(rename = "VMWProviderVdcRecord", default)]
    pub records: Vec<Reference>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NetworkPoolRecords {
    #[serde(rename = "NetworkPoolRecord", default)]
    pub records: Vec<Reference>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CapacityWithUsage {
    #[serde(rename = "Units")]
    pub units: &'static str,
    #[serde(rename = "Allocated")]
    pub allocated: u64,
    #[serde(rename = "Limit")]
    pub limit: u64,
    #[serde(rename = "Reserved")]
    pub reserved: u64,
}

impl CapacityWithUsage {
    pub fn unlimited(units: &'static str) -> Self {
        Self {
            units,
            allocated: 0,
            limit: 0,
            reserved: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComputeCapacity {
    #[serde(rename = "Cpu")]
    pub cpu: CapacityWithUsage,
    #[serde(rename = "Memory")]
    pub memory: CapacityWithUsage,
}

#[derive(Debug, Clone, Serialize)]
pub struct VdcStorageProfileParams {
    #[serde(rename = "Enabled")]
    pub enabled: bool,
    #[serde(rename = "Units")]
    pub units: &'static str,
    #[serde(rename = "Limit")]
    pub limit: u64,
    #[serde(rename = "Default")]
    pub default: bool,
    #[serde(rename = "ProviderVdcStorageProfile")]
    pub provider_vdc_storage_profile: Reference,
}

/// Body of `POST /api/admin/org/{id}/vdcsparams` (Flex allocation model).
#[derive(Debug, Clone, Serialize)]
#[serde(rename = "CreateVdcParams")]
pub struct CreateVdcParams {
    #[serde(rename = "@xmlns")]
    pub xmlns: &'static str,
    #[serde(rename = "@xmlns:extension_v1.5")]
    pub xmlns_extension: &'static str,
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "AllocationModel")]
    pub allocation_model: &'static str,
    #[serde(rename = "ComputeCapacity")]
    pub compute_capacity: ComputeCapacity,
    #[serde(rename = "IsEnabled")]
    pub is_enabled: bool,
    #[serde(rename = "VdcStorageProfile")]
    pub storage_profile: VdcStorageProfileParams,
    #[serde(rename = "ResourceGuaranteedMemory")]
    pub resource_guaranteed_memory: f64,
    #[serde(rename = "ResourceGuaranteedCpu")]
    pub resource_guaranteed_cpu: f64,
    #[serde(rename = "IsThinProvision")]
    pub is_thin_provision: bool,
    #[serde(rename = "NetworkPoolReference")]
    pub network_pool: Reference,
    #[serde(rename = "ProviderVdcReference")]
    pub provider_vdc: Reference,
    #[serde(rename = "UsesFastProvisioning")]
    pub uses_fast_provisioning: bool,
    #[serde(rename = "VmDiscoveryEnabled")]
    pub vm_discovery_enabled: bool,
    #[serde(rename = "IncludeMemoryOverhead")]
    pub include_memory_overhead: bool,
}

impl CreateVdcParams {
    pub fn flex(
        name: impl Into<String>,
        provider_vdc: Reference,
        storage_profile: Reference,
        network_pool: Reference,
    ) -> Self {
        Self {
            xmlns: VCLOUD_NAMESPACE,
            xmlns_extension: EXTENSION_NAMESPACE,
            name: name.into(),
            allocation_model: "Flex",
            compute_capacity: ComputeCapacity {
                cpu: CapacityWithUsage::unlimited("MHz"),
                memory: CapacityWithUsage::unlimited("MB"),
            },
            is_enabled: true,
            storage_profile: VdcStorageProfileParams {
                enabled: true,
                units: "MB",
                limit: 0,
                default: true,
                provider_vdc_storage_profile: storage_profile,
            },
            resource_guaranteed_memory: 0.0,
            resource_guaranteed_cpu: 0.0,
            is_thin_provision: true,
            network_pool,
            provider_vdc,
            uses_fast_provisioning: false,
            vm_discovery_enabled: false,
            include_memory_overhead: false,
        }
    }
}
