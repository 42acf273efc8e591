use gitprovider::gitlab::GitLabClient;
use gitprovider::platform::{
    Deletable, OrganizationRef, RepositoryCreateOptions, RepositoryInfo, RepositoryRef,
    TransportType, Updatable, UserRef,
};
use serde_json::json;

use crate::RepoAction;
use crate::commands::shared::{CommandResult, get_repository, print_json, report, repository_ref};

pub(crate) async fn handle_repo(action: RepoAction, client: &GitLabClient) -> CommandResult {
    match action {
        RepoAction::Get { target } => {
            let repo = get_repository(client, &target).await?;
            print_json(&json!({
                "repository": repo.repository().full_path(),
                "web_url": repo.project().web_url,
                "clone_url": repo.repository().clone_url(TransportType::Ssh),
                "info": repo.get(),
            }))?;
        }
        RepoAction::List { owner, user } => {
            let owner = owner.trim_matches('/');
            let repos = if user {
                client
                    .user_repositories()
                    .list(&UserRef::new(client.domain(), owner))
                    .await?
            } else {
                client
                    .org_repositories()
                    .list(&OrganizationRef::from_full_path(client.domain(), owner))
                    .await?
            };
            for repo in repos {
                println!("{}", repo.repository().full_path());
            }
        }
        RepoAction::Reconcile {
            target,
            description,
            default_branch,
            visibility,
            auto_init,
        } => {
            let desired = RepositoryInfo {
                description,
                default_branch,
                visibility,
            };
            let options = auto_init.then(|| RepositoryCreateOptions {
                auto_init: Some(true),
                license_template: None,
            });

            let (repo, action_taken) = match repository_ref(client.domain(), &target)? {
                RepositoryRef::Org(r) => {
                    client
                        .org_repositories()
                        .reconcile(&r, desired, options)
                        .await?
                }
                RepositoryRef::User(r) => {
                    client
                        .user_repositories()
                        .reconcile(&r, desired, options)
                        .await?
                }
            };
            report(&repo.repository().full_path(), action_taken);
        }
        RepoAction::Delete { target } => {
            let repo = get_repository(client, &target).await?;
            repo.delete().await?;
            println!("{}: deleted", repo.repository().full_path());
        }
    }

    Ok(())
}
