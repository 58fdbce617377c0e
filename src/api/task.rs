//! Task accessors

use std::cmp::Reverse;

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use super::org::{get_org, list_orgs, SYSTEM_ORG};
use crate::client::VcdClient;
use crate::error::{VcdError, VcdResult};
use crate::models::{Task, TaskList};

/// Which organizations a task listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskScope {
    /// One org, optionally together with the provider's "System" org.
    Org { name: String, include_system: bool },
    AllOrgs,
}

impl TaskScope {
    /// Rows shown in a task table for this scope.
    pub fn row_limit(&self) -> usize {
        match self {
            Self::Org { .. } => 5,
            Self::AllOrgs => 10,
        }
    }
}

/// Tasks of every org in `scope`, newest first.
pub async fn list_tasks(client: &VcdClient, scope: &TaskScope) -> VcdResult<Vec<Task>> {
    let org_ids = match scope {
        TaskScope::Org {
            name,
            include_system,
        } => {
            let mut ids = vec![get_org(client, name).await?.id];
            if *include_system && name != SYSTEM_ORG {
                ids.push(get_org(client, SYSTEM_ORG).await?.id);
            }
            ids
        }
        TaskScope::AllOrgs => list_orgs(client)
            .await?
            .into_iter()
            .map(|o| o.id)
            .collect(),
    };

    let mut tasks = Vec::new();
    for id in &org_ids {
        let list: TaskList = client
            .get_xml(&format!("/api/tasksList/{}", id), "task list")
            .await?;
        debug!("Org {} has {} tasks", id, list.tasks.len());
        tasks.extend(list.tasks);
    }
    sort_newest_first(&mut tasks);
    Ok(tasks)
}

pub async fn get_task(client: &VcdClient, id: &str) -> VcdResult<Task> {
    client.get_xml(&format!("/api/task/{}", id), "task").await
}

/// Full record of the most recent task in `scope`.
pub async fn latest_task(client: &VcdClient, scope: &TaskScope) -> VcdResult<Task> {
    let tasks = list_tasks(client, scope).await?;
    let newest = tasks.first().ok_or_else(|| {
        let name = match scope {
            TaskScope::Org { name, .. } => name.as_str(),
            TaskScope::AllOrgs => "all orgs",
        };
        VcdError::not_found("latest task", name)
    })?;
    get_task(client, newest.id()).await
}

/// Sorts by start time, newest first.
///
/// Timestamps that do not parse as RFC 3339 sort after every parsed one,
/// newest-looking string first among themselves.
pub fn sort_newest_first(tasks: &mut [Task]) {
    tasks.sort_by_cached_key(|t| (Reverse(start_key(&t.start_time)), Reverse(t.start_time.clone())));
}

fn start_key(start_time: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(start_time).ok()
}
