use gitprovider::gitlab::GitLabClient;

use crate::FilesAction;
use crate::commands::shared::{CommandResult, get_repository};

pub(crate) async fn handle_files(action: FilesAction, client: &GitLabClient) -> CommandResult {
    match action {
        FilesAction::Get {
            target,
            path,
            branch,
        } => {
            let repo = get_repository(client, &target).await?;
            for file in repo.files().get(&path, &branch).await? {
                println!("==> {} <==", file.path.unwrap_or_default());
                println!("{}", file.content.unwrap_or_default());
            }
        }
    }
    Ok(())
}
