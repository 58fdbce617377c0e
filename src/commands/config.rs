use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::ConfigCommand;
use crate::config::{Config, Site};
use crate::output::print_table;

pub(super) fn run(path: &Path, action: ConfigCommand) -> Result<()> {
    let mut config = Config::load(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    let message = match action {
        ConfigCommand::GetSites => {
            let rows = config
                .sites
                .iter()
                .map(|s| {
                    let marker = if s.name == config.current_site { "*" } else { "" };
                    vec![
                        marker.to_string(),
                        s.name.clone(),
                        s.endpoint.clone(),
                        s.user.clone(),
                        s.orgname.clone(),
                        s.api_version().to_string(),
                    ]
                })
                .collect();
            print_table(&["Current", "Name", "Endpoint", "User", "Org", "ApiVersion"], rows);
            return Ok(());
        }
        ConfigCommand::SetSite {
            name,
            endpoint,
            user,
            password,
            orgname,
            apiversion,
            insecure,
            include_system_tasks,
        } => {
            let mut site = Site::new(name, endpoint, user, &password, orgname);
            site.apiversion = apiversion.unwrap_or_default();
            site.insecure = insecure;
            site.include_system_tasks = include_system_tasks;
            let message = format!("site \"{}\" saved", site.name);
            config.upsert_site(site);
            message
        }
        ConfigCommand::UseSite { name } => {
            config.use_site(&name)?;
            format!("current site is \"{}\"", name)
        }
        ConfigCommand::DeleteSite { name } => {
            config.remove_site(&name)?;
            format!("site \"{}\" deleted", name)
        }
    };

    config
        .save(path)
        .with_context(|| format!("Failed to save config to {}", path.display()))?;
    println!("{}", message);
    Ok(())
}
