use anyhow::{Context, Result};
use chrono::{Local, Utc};

use crate::api::edge::{get_edge, list_edges};
use crate::api::network::list_vdc_networks;
use crate::api::org::list_orgs;
use crate::api::provider::{list_external_networks, list_provider_gateways};
use crate::api::task::{get_task, latest_task, list_tasks, TaskScope};
use crate::api::vapp::{
    find_vapp, lease_expiration, list_vapps, vapp_lease, vapp_networks, vapp_vms, NameMatch,
};
use crate::api::vdc::{find_vdc, list_vdcs};
use crate::cli::GetCommand;
use crate::client::VcdClient;
use crate::config::Site;
use crate::models::{Task, UplinkSubnet, VApp};
use crate::output::{print_fields, print_table, truncate};
use crate::paging::href_id;

const POWERED_OFF: &str = "POWERED_OFF";

pub(super) async fn run(client: &VcdClient, site: &Site, resource: GetCommand) -> Result<()> {
    match resource {
        GetCommand::Org => {
            let rows = list_orgs(client)
                .await?
                .into_iter()
                .map(|o| vec![o.name, o.id, o.href])
                .collect();
            print_table(&["Name", "Id", "Href"], rows);
        }
        GetCommand::OrgVdc => {
            let rows = list_vdcs(client)
                .await?
                .into_iter()
                .map(|v| {
                    vec![
                        v.name,
                        v.id,
                        v.is_enabled,
                        v.org_name,
                        v.provider_vdc_name,
                        v.vc_name,
                        v.network_provider_type,
                        v.number_of_vapps.to_string(),
                        v.number_of_vms.to_string(),
                        v.number_of_vapp_templates.to_string(),
                    ]
                })
                .collect();
            print_table(
                &[
                    "Name", "Id", "IsEnabled", "Org", "ProviderVdc", "Vc", "NetworkType", "VApps",
                    "VMs", "VAppTemplates",
                ],
                rows,
            );
        }
        GetCommand::VdcNetwork { vdc } => {
            let vdc = find_vdc(client, &vdc).await?;
            let networks = list_vdc_networks(client, &vdc.id)
                .await
                .with_context(|| format!("Failed to list networks of {}", vdc.name))?;
            let rows = networks
                .into_iter()
                .map(|n| {
                    let scope = n.configuration.primary_scope();
                    vec![
                        n.name,
                        n.id,
                        vdc.org_name.clone(),
                        vdc.name.clone(),
                        scope.cidr(),
                        scope.dns1,
                        scope.dns2,
                        scope.dns_suffix,
                        n.configuration.fence_mode,
                        n.is_shared,
                        scope.is_inherited,
                    ]
                })
                .collect();
            print_table(
                &[
                    "Name", "Id", "Org", "Vdc", "DefaultGateway", "Dns1", "Dns2", "DnsSuffix",
                    "FenceMode", "IsShared", "IsIpScopeInherited",
                ],
                rows,
            );
        }
        GetCommand::Edge { vdc } => {
            let vdc = find_vdc(client, &vdc).await?;
            let rows = list_edges(client, &vdc.name)
                .await?
                .into_iter()
                .map(|e| {
                    vec![
                        e.name.clone(),
                        e.urn().to_string(),
                        vdc.org_name.clone(),
                        vdc.name.clone(),
                        e.owner_name().to_string(),
                        e.network_provider_name().to_string(),
                        e.edge_cluster_name().to_string(),
                        e.edge_gateway_uplinks.len().to_string(),
                    ]
                })
                .collect();
            print_table(
                &["Name", "Id", "Org", "Vdc", "Owner", "NetworkProvider", "EdgeCluster", "IfCount"],
                rows,
            );
        }
        GetCommand::EdgeNetwork { orgvdc, edge } => {
            let edge = get_edge(client, &edge, &orgvdc).await?;
            let rows = edge
                .edge_gateway_uplinks
                .into_iter()
                .map(|u| {
                    let subnet = u.subnets.values.first().cloned().unwrap_or_default();
                    vec![
                        u.uplink_name,
                        u.uplink_id,
                        u.backing_type.unwrap_or_default(),
                        u.dedicated.to_string(),
                        u.connected.unwrap_or_default().to_string(),
                        u.vrf_lite_backed.unwrap_or_default().to_string(),
                        subnet.primary_ip.clone().unwrap_or_default(),
                        format!("{}/{}", subnet.gateway, subnet.prefix_length),
                    ]
                })
                .collect();
            print_table(
                &[
                    "Name", "Id", "BackingType", "Dedicated", "Connected", "Vrf", "PrimaryIp",
                    "GatewayAddress",
                ],
                rows,
            );
        }
        GetCommand::ProviderGateway => {
            let rows = list_provider_gateways(client)
                .await?
                .into_iter()
                .map(|gw| {
                    let backing = gw.first_backing().cloned().unwrap_or_default();
                    let subnet = gw.first_subnet().cloned().unwrap_or_default();
                    vec![
                        gw.name,
                        gw.urn,
                        backing.name,
                        backing.network_provider.name,
                        subnet.gateway.clone(),
                        ip_ranges(&subnet),
                    ]
                })
                .collect();
            print_table(
                &["Name", "Id", "Tier0", "NetworkProvider", "Gateway", "IpRange"],
                rows,
            );
        }
        GetCommand::ExternalNetwork => {
            let rows = list_external_networks(client)
                .await?
                .into_iter()
                .map(|xn| {
                    let subnet = xn.subnets.values.first().cloned().unwrap_or_default();
                    vec![
                        xn.name,
                        xn.urn,
                        format!("{}/{}", subnet.gateway, subnet.prefix_length),
                        ip_ranges(&subnet),
                        xn.description.unwrap_or_default(),
                    ]
                })
                .collect();
            print_table(&["Name", "Id", "Gateway", "IpRange", "Description"], rows);
        }
        GetCommand::Vapp {
            name: Some(name),
            ..
        } => {
            let vapp = find_vapp(client, &name, NameMatch::Substring).await?;
            show_vapp(client, &vapp).await?;
        }
        GetCommand::Vapp {
            name: None,
            showlease,
        } => {
            let mut rows = Vec::new();
            for vapp in list_vapps(client).await? {
                let mut row = vec![
                    truncate(&vapp.name, 42),
                    vapp.id.clone(),
                    vapp.status.clone(),
                    vapp.org_name.clone(),
                    vapp.vdc_name.clone(),
                    vapp.number_of_vms.to_string(),
                ];
                if showlease {
                    row.push(lease_summary(client, &vapp).await?.unwrap_or_default());
                }
                rows.push(row);
            }
            let mut titles = vec!["Name", "Id", "Status", "Org", "Vdc", "VMs"];
            if showlease {
                titles.push("LeaseExpiration");
            }
            print_table(&titles, rows);
        }
        GetCommand::VappNetwork { vapp } => {
            let vapp = find_vapp(client, &vapp, NameMatch::Exact).await?;
            let vdc = find_vdc(client, &vapp.vdc_name).await?;
            let vdc_networks = list_vdc_networks(client, &vdc.id).await?;

            let rows = vapp_networks(client, &vapp.id)
                .await?
                .into_iter()
                .map(|n| {
                    let scope = n.configuration.primary_scope();
                    let parent = n.configuration.parent_network.clone().unwrap_or_default();
                    let parent_fence_mode = vdc_networks
                        .iter()
                        .find(|v| {
                            (!parent.href.is_empty() && href_id(&parent.href) == v.id)
                                || (!parent.id.is_empty() && parent.id == v.urn)
                        })
                        .map(|v| v.configuration.fence_mode.clone())
                        .unwrap_or_default();
                    vec![
                        n.name,
                        scope.is_inherited.clone(),
                        scope.is_enabled.clone(),
                        scope.cidr(),
                        parent.name,
                        parent.id,
                        parent_fence_mode,
                    ]
                })
                .collect();
            print_table(
                &[
                    "Name", "IsInherited", "IsEnabled", "DefaultGateway", "ParentName", "ParentId",
                    "ParentFenceMode",
                ],
                rows,
            );
        }
        GetCommand::VappVm { vapp } => {
            let vapp = find_vapp(client, &vapp, NameMatch::Exact).await?;
            let rows = vapp_vms(client, &vapp.id)
                .await?
                .into_iter()
                .map(|vm| vec![vm.name, vm.urn, vm.href])
                .collect();
            print_table(&["Name", "Urn", "Href"], rows);
        }
        GetCommand::VappVmNetwork { vapp } => {
            let vapp = find_vapp(client, &vapp, NameMatch::Exact).await?;
            let mut rows = Vec::new();
            for vm in vapp_vms(client, &vapp.id).await? {
                for nic in &vm.network_connection_section.connections {
                    rows.push(vec![
                        vm.name.clone(),
                        vm.urn.clone(),
                        nic.index.to_string(),
                        nic.is_connected.clone(),
                        nic.adapter_type.clone(),
                        nic.network.clone(),
                        nic.allocation_mode.clone(),
                        nic.ip_address.clone(),
                        nic.mac_address.clone(),
                    ]);
                }
            }
            print_table(
                &[
                    "Vm", "VmId", "Index", "IsConnected", "Type", "Network", "Mode", "IpAddress",
                    "MacAddress",
                ],
                rows,
            );
        }
        GetCommand::Task { org, id, latest } => {
            let scope = task_scope(site, org);
            if let Some(id) = id {
                show_task(&get_task(client, &id).await?);
            } else if latest {
                show_task(&latest_task(client, &scope).await?);
            } else {
                let rows = list_tasks(client, &scope)
                    .await?
                    .into_iter()
                    .take(scope.row_limit())
                    .map(|t| {
                        vec![
                            t.org.name.clone(),
                            t.operation.clone(),
                            t.id().to_string(),
                            t.status.clone(),
                            t.owner.name.clone(),
                            t.user.name.clone(),
                            t.start_time.clone(),
                            t.end_time.clone(),
                        ]
                    })
                    .collect();
                print_table(
                    &["Org", "Operation", "Id", "Status", "Object", "User", "Start", "End"],
                    rows,
                );
            }
        }
    }
    Ok(())
}

/// An explicit org, else the site's org, else every org.
fn task_scope(site: &Site, org: Option<String>) -> TaskScope {
    let name = org.unwrap_or_else(|| site.orgname.clone());
    if name.is_empty() {
        TaskScope::AllOrgs
    } else {
        TaskScope::Org {
            name,
            include_system: site.includes_system_tasks(),
        }
    }
}

fn ip_ranges(subnet: &UplinkSubnet) -> String {
    subnet
        .ip_ranges
        .as_ref()
        .map(|r| {
            r.values
                .iter()
                .map(|ip| format!("{}-{}", ip.start_address, ip.end_address))
                .collect::<Vec<_>>()
                .join(",")
        })
        .unwrap_or_default()
}

/// `MM/DD HH:MM (N.Nh left)` for running vApps.
async fn lease_summary(client: &VcdClient, vapp: &VApp) -> Result<Option<String>> {
    if vapp.status == POWERED_OFF {
        return Ok(None);
    }
    let lease = vapp_lease(client, &vapp.id).await?;
    Ok(lease_expiration(&lease, Utc::now())?.map(|(expires, hours_left)| {
        format!(
            "{} ({:.1}h left)",
            expires.with_timezone(&Local).format("%m/%d %H:%M"),
            hours_left
        )
    }))
}

async fn show_vapp(client: &VcdClient, vapp: &VApp) -> Result<()> {
    let mut entries = vec![
        ("Id", vapp.id.clone()),
        ("vAppName", vapp.name.clone()),
        ("OrgName", vapp.org_name.clone()),
        ("VdcName", vapp.vdc_name.clone()),
        ("Status", vapp.status.clone()),
        ("NumOfVms", vapp.number_of_vms.to_string()),
    ];
    if let Some(lease) = lease_summary(client, vapp).await? {
        entries.push(("Lease", lease));
    }
    entries.push((
        "RecentTask",
        format!("{} ({})", vapp.task_status_name, vapp.task_status),
    ));
    println!();
    print_fields(&entries);
    println!();
    Ok(())
}

fn show_task(task: &Task) {
    let mut entries = vec![
        ("Org", task.org.name.clone()),
        ("Operation", task.operation.clone()),
        ("Status", task.status.clone()),
        ("Time", format!("{} - {}", task.start_time, task.end_time)),
        ("Object", format!("{} ({})", task.owner.name, task.owner.href)),
        ("User", task.user.name.clone()),
    ];
    if let Some(error) = &task.error {
        entries.push(("Error", error.tenant_error.message.clone()));
        entries.push((
            "ErrorCode",
            format!(
                "{} - {}",
                error.tenant_error.major_error_code, error.tenant_error.minor_error_code
            ),
        ));
        entries.push(("Trace", error.stack_trace.clone()));
    }
    print_fields(&entries);

    let vc_tasks = task
        .vc_task_list
        .as_ref()
        .map(|l| l.tasks.as_slice())
        .unwrap_or_default();
    if !vc_tasks.is_empty() {
        println!("VcTasks:");
        let rows = vc_tasks
            .iter()
            .map(|vt| {
                vec![
                    vt.description.clone(),
                    vt.status.clone(),
                    vt.object_type.clone(),
                    vt.object_name.clone(),
                    vt.object_moref.clone(),
                    vt.start_time.clone(),
                    vt.end_time.clone(),
                ]
            })
            .collect();
        print_table(
            &["Operation", "Status", "ObjectType", "ObjectName", "ObjectId", "Start", "End"],
            rows,
        );
    }
}
