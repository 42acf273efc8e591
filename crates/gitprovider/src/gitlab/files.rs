use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::client::{GitLabClient, encode};
use super::error::GitLabError;
use super::types::{GitLabFile, GitLabTreeEntry};
use crate::platform::{self, File};

/// File downloads from one project.
#[derive(Clone)]
pub struct FilesClient {
    client: GitLabClient,
    project_id: u64,
}

impl FilesClient {
    pub(crate) fn new(client: GitLabClient, project_id: u64) -> Self {
        Self { client, project_id }
    }

    /// Every file directly inside directory `path` on `branch`, in listing
    /// order. Subdirectories are skipped.
    pub async fn get(&self, path: &str, branch: &str) -> platform::Result<Vec<File>> {
        let tree_path = format!(
            "/projects/{}/repository/tree?path={}&ref={}",
            self.project_id,
            encode(path),
            encode(branch)
        );
        let entries: Vec<GitLabTreeEntry> = self.client.get_paged(&tree_path).await?;

        let mut files = Vec::new();
        for entry in entries.into_iter().filter(|e| e.kind == "blob") {
            let file_path = format!(
                "/projects/{}/repository/files/{}?ref={}",
                self.project_id,
                encode(&entry.path),
                encode(branch)
            );
            let file: GitLabFile = self.client.get(&file_path).await?;
            files.push(File {
                path: Some(entry.path),
                name: Some(entry.name),
                content: Some(decode_content(&file)?),
            });
        }

        tracing::debug!(path, branch, count = files.len(), "downloaded files");
        Ok(files)
    }
}

fn decode_content(file: &GitLabFile) -> Result<String, GitLabError> {
    if file.encoding != "base64" {
        return Ok(file.content.clone());
    }
    let bytes = STANDARD
        .decode(file.content.trim())
        .map_err(|e| GitLabError::Content(format!("{}: {e}", file.file_path)))?;
    String::from_utf8(bytes).map_err(|e| GitLabError::Content(format!("{}: {e}", file.file_path)))
}
