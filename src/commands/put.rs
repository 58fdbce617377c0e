use anyhow::{Context, Result};

use crate::api::vapp::{find_vapp, renew_lease, NameMatch};
use crate::cli::PutCommand;
use crate::client::VcdClient;

pub(super) async fn run(client: &VcdClient, resource: PutCommand) -> Result<()> {
    match resource {
        PutCommand::Lease { vapp } => {
            let vapp = find_vapp(client, &vapp, NameMatch::Exact).await?;
            let seconds = renew_lease(client, &vapp.id)
                .await
                .with_context(|| format!("Failed to renew lease of {}", vapp.name))?;
            println!("deployment lease of \"{}\" renewed for {}s", vapp.name, seconds);
        }
    }
    Ok(())
}
