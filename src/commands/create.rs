use anyhow::{Context, Result};

use crate::api::edge::{create_edge, NewEdgeOptions};
use crate::api::network::{create_vdc_network, NetworkSpec, NewNetworkOptions, SubnetSpec};
use crate::api::org::create_org;
use crate::api::vdc::{create_vdc, NewVdcOptions};
use crate::cli::{CreateCommand, CreateNetworkArgs, NetworkTypeArg};
use crate::client::VcdClient;
use crate::error::VcdError;
use crate::validation::{parse_gateway_cidr, parse_ip_range};

pub(super) async fn run(client: &VcdClient, resource: CreateCommand) -> Result<()> {
    match resource {
        CreateCommand::Org { name } => {
            create_org(client, &name)
                .await
                .with_context(|| format!("Failed to create org {}", name))?;
            println!("org \"{}\" created", name);
        }
        CreateCommand::OrgVdc {
            name,
            org,
            provider_vdc,
            storage_policy,
            network_pool,
        } => {
            let opts = NewVdcOptions {
                name: &name,
                org: &org,
                provider_vdc: &provider_vdc,
                storage_policy: &storage_policy,
                network_pool: &network_pool,
            };
            let res = create_vdc(client, &opts)
                .await
                .with_context(|| format!("Failed to create org vdc {}", name))?;
            println!("{}", res.text());
        }
        CreateCommand::VdcNetwork(args) => {
            let opts = NewNetworkOptions {
                name: args.name.clone(),
                vdc: args.orgvdc.clone(),
                description: args.description.clone(),
                spec: network_spec(&args)?,
            };
            let created = create_vdc_network(client, &opts)
                .await
                .with_context(|| format!("Failed to create network {}", args.name))?;
            println!(
                "{} network \"{}\" created in {}",
                created.kind.type_name(),
                created.name,
                args.orgvdc
            );
        }
        CreateCommand::Edge {
            name,
            orgvdc,
            provider_gateway,
            primary_ip,
            description,
        } => {
            let opts = NewEdgeOptions {
                name,
                vdc: orgvdc,
                provider_gateway,
                description,
                primary_ip,
            };
            create_edge(client, &opts)
                .await
                .with_context(|| format!("Failed to create edge gateway {}", opts.name))?;
            println!("edge gateway \"{}\" requested in {}", opts.name, opts.vdc);
        }
    }
    Ok(())
}

/// Validates the network arguments and turns them into a `NetworkSpec`.
///
/// Options that do not apply to the chosen type are rejected rather than
/// silently dropped.
pub fn network_spec(args: &CreateNetworkArgs) -> Result<NetworkSpec, VcdError> {
    match args.network_type {
        NetworkTypeArg::Direct => {
            if args.gateway.is_some() || !args.ip_ranges.is_empty() || args.edge.is_some() {
                return Err(VcdError::invalid_input(
                    "a direct network takes its addressing from --parent; \
                     --gateway, --ip-range and --edge do not apply",
                ));
            }
            let parent = args
                .parent
                .clone()
                .ok_or_else(|| VcdError::invalid_input("a direct network needs --parent"))?;
            Ok(NetworkSpec::Direct {
                parent,
                shared: args.shared,
            })
        }
        NetworkTypeArg::Isolated => {
            if args.edge.is_some() || args.parent.is_some() {
                return Err(VcdError::invalid_input(
                    "--edge and --parent do not apply to an isolated network",
                ));
            }
            Ok(NetworkSpec::Isolated {
                subnet: subnet_spec(args)?,
            })
        }
        NetworkTypeArg::NatRouted => {
            if args.parent.is_some() {
                return Err(VcdError::invalid_input(
                    "--parent does not apply to a nat-routed network",
                ));
            }
            let edge = args
                .edge
                .clone()
                .ok_or_else(|| VcdError::invalid_input("a nat-routed network needs --edge"))?;
            Ok(NetworkSpec::NatRouted {
                subnet: subnet_spec(args)?,
                edge,
                distributed: args.distributed,
            })
        }
    }
}

fn subnet_spec(args: &CreateNetworkArgs) -> Result<SubnetSpec, VcdError> {
    let gateway = args
        .gateway
        .as_deref()
        .ok_or_else(|| VcdError::invalid_input("--gateway is required for this network type"))?;
    let mut spec = SubnetSpec::new(parse_gateway_cidr(gateway)?);
    spec.dns1 = args.dns1.clone();
    spec.dns2 = args.dns2.clone();
    spec.dns_suffix = args.dns_suffix.clone();
    spec.ip_ranges = args
        .ip_ranges
        .iter()
        .map(|r| parse_ip_range(r))
        .collect::<Result<_, _>>()?;
    Ok(spec)
}
