use gitprovider::gitlab::GitLabClient;
use gitprovider::platform::{DeployKeyInfo, TeamAccessInfo, Updatable};
use serde_json::json;

use crate::commands::shared::{CommandResult, get_repository, print_json, report};
use crate::{DeployKeyAction, TeamAccessAction};

pub(crate) async fn handle_team_access(
    action: TeamAccessAction,
    client: &GitLabClient,
) -> CommandResult {
    match action {
        TeamAccessAction::List { target } => {
            let repo = get_repository(client, &target).await?;
            let access: Vec<TeamAccessInfo> = repo
                .team_access()
                .list()
                .await?
                .iter()
                .map(|a| a.get())
                .collect();
            print_json(&access)?;
        }
        TeamAccessAction::Reconcile {
            target,
            team,
            permission,
        } => {
            let repo = get_repository(client, &target).await?;
            let desired = TeamAccessInfo {
                name: team.clone(),
                permission,
            };
            let (_, action_taken) = repo.team_access().reconcile(desired).await?;
            report(&format!("{} team {team}", repo.repository().full_path()), action_taken);
        }
    }
    Ok(())
}

pub(crate) async fn handle_deploy_key(
    action: DeployKeyAction,
    client: &GitLabClient,
) -> CommandResult {
    match action {
        DeployKeyAction::List { target } => {
            let repo = get_repository(client, &target).await?;
            let keys: Vec<_> = repo
                .deploy_keys()
                .list()
                .await?
                .iter()
                .map(|k| {
                    let info = k.get();
                    json!({
                        "name": info.name,
                        "read_only": info.read_only_or_default(),
                        "key": info.canonical_key(),
                    })
                })
                .collect();
            print_json(&keys)?;
        }
        DeployKeyAction::Reconcile {
            target,
            name,
            key_file,
            read_write,
        } => {
            let key = std::fs::read(&key_file)
                .map_err(|e| format!("failed to read {}: {e}", key_file.display()))?;
            let repo = get_repository(client, &target).await?;
            let desired = DeployKeyInfo {
                name: name.clone(),
                key,
                read_only: Some(!read_write),
            };
            let (_, action_taken) = repo.deploy_keys().reconcile(desired).await?;
            report(&format!("{} deploy key {name}", repo.repository().full_path()), action_taken);
        }
    }
    Ok(())
}
