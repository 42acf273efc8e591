use gitprovider::gitlab::GitLabClient;
use gitprovider::platform::OrganizationRef;

use crate::OrgAction;
use crate::commands::shared::{CommandResult, print_json};

pub(crate) async fn handle_org(action: OrgAction, client: &GitLabClient) -> CommandResult {
    let orgs = client.organizations();
    let org_ref =
        |path: &str| OrganizationRef::from_full_path(client.domain(), path.trim_matches('/'));

    match action {
        OrgAction::List => {
            for org in orgs.list().await? {
                println!("{}", org.organization().full_path());
            }
        }
        OrgAction::Get { path } => {
            let org = orgs.get(&org_ref(&path)).await?;
            print_json(&org.get())?;
        }
        OrgAction::Children { path } => {
            for child in orgs.children(&org_ref(&path)).await? {
                println!("{}", child.organization().full_path());
            }
        }
        OrgAction::Teams { path } => {
            let org = orgs.get(&org_ref(&path)).await?;
            print_json(&org.teams().list().await?)?;
        }
    }

    Ok(())
}
