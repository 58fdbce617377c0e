use anyhow::{Context, Result};

use crate::api::network::delete_vdc_network;
use crate::api::org::delete_org;
use crate::cli::DeleteCommand;
use crate::client::VcdClient;

pub(super) async fn run(client: &VcdClient, resource: DeleteCommand) -> Result<()> {
    match resource {
        DeleteCommand::Org { name } => {
            delete_org(client, &name)
                .await
                .with_context(|| format!("Failed to delete org {}", name))?;
            println!("org \"{}\" deleted", name);
        }
        DeleteCommand::VdcNetwork { name, orgvdc } => {
            delete_vdc_network(client, &name, &orgvdc)
                .await
                .with_context(|| format!("Failed to delete network {} from {}", name, orgvdc))?;
            println!("network \"{}\" deleted from {}", name, orgvdc);
        }
    }
    Ok(())
}
