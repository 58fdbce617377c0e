use anyhow::{Context, Result};

use crate::api::network::{set_network_connection, EdgeConnection};
use crate::api::vapp::{find_vapp, power_on, set_lease, NameMatch};
use crate::cli::{PowerCommand, SetCommand};
use crate::client::VcdClient;
use crate::error::VcdError;

pub(super) async fn run(client: &VcdClient, resource: SetCommand) -> Result<()> {
    match resource {
        SetCommand::VdcNetwork {
            name,
            orgvdc,
            edge,
            connected,
            distributed,
        } => {
            let target = if connected {
                let edge = edge.ok_or_else(|| {
                    VcdError::invalid_input("--edge is required to connect a network")
                })?;
                EdgeConnection::Connect { edge, distributed }
            } else {
                EdgeConnection::Disconnect
            };
            let record = set_network_connection(client, &name, &orgvdc, &target)
                .await
                .with_context(|| format!("Failed to update network {}", name))?;
            println!("network \"{}\" is now {}", record.name, record.network_type);
        }
        SetCommand::Power {
            action: PowerCommand::On { vapp },
        } => {
            let vapp = find_vapp(client, &vapp, NameMatch::Substring).await?;
            power_on(client, &vapp.id)
                .await
                .with_context(|| format!("Failed to power on {}", vapp.name))?;
            println!("power on requested for \"{}\" ({})", vapp.name, vapp.id);
        }
        SetCommand::Lease { vapp, leasetime } => {
            let vapp = find_vapp(client, &vapp, NameMatch::Exact).await?;
            set_lease(client, &vapp.id, leasetime)
                .await
                .with_context(|| format!("Failed to set lease of {}", vapp.name))?;
            println!("deployment lease of \"{}\" set to {}s", vapp.name, leasetime);
        }
    }
    Ok(())
}
