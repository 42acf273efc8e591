use gitprovider::gitlab::{GitLabClient, Repository};
use gitprovider::platform::{
    ClientOptions, OrgRepositoryRef, OrganizationRef, RepositoryRef, UserRef, UserRepositoryRef,
};
use serde::Serialize;

use crate::RepoTarget;
use crate::config;

pub(crate) type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Build a client from the configured token.
pub(crate) fn client(
    config: &config::Config,
    options: ClientOptions,
) -> Result<GitLabClient, Box<dyn std::error::Error>> {
    let token = config.gitlab_token().ok_or(
        "GITPROVIDER_GITLAB_TOKEN must be set in environment, .env file, or config file",
    )?;
    Ok(GitLabClient::new(&token, options)?)
}

/// Split `owner/.../name` into a repository reference on `domain`.
pub(crate) fn repository_ref(
    domain: &str,
    target: &RepoTarget,
) -> Result<RepositoryRef, Box<dyn std::error::Error>> {
    let path = target.repo.trim_matches('/');
    let (owner, name) = path
        .rsplit_once('/')
        .filter(|(owner, name)| !owner.is_empty() && !name.is_empty())
        .ok_or_else(|| format!("repository must be given as owner/name, got {:?}", target.repo))?;

    Ok(if target.user {
        if owner.contains('/') {
            return Err(format!("user repositories have a single owner segment: {path}").into());
        }
        UserRepositoryRef::new(UserRef::new(domain, owner), name).into()
    } else {
        OrgRepositoryRef::new(OrganizationRef::from_full_path(domain, owner), name).into()
    })
}

pub(crate) async fn get_repository(
    client: &GitLabClient,
    target: &RepoTarget,
) -> Result<Repository, Box<dyn std::error::Error>> {
    let repository = match repository_ref(client.domain(), target)? {
        RepositoryRef::Org(r) => client.org_repositories().get(&r).await?,
        RepositoryRef::User(r) => client.user_repositories().get(&r).await?,
    };
    Ok(repository)
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print the outcome of a reconcile.
pub(crate) fn report(resource: &str, action_taken: bool) {
    if action_taken {
        println!("{resource}: changed");
    } else {
        println!("{resource}: up to date");
    }
}
