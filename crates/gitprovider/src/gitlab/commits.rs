use super::client::{GitLabClient, encode};
use super::types::{CommitAction, CreateCommit, GitLabCommit};
use super::GitLabObject;
use crate::platform::{self, ApiObject, CommitInfo, File, Object, ProviderError};

/// Largest page GitLab serves.
const MAX_PER_PAGE: u32 = 100;

/// A commit as returned by GitLab.
#[derive(Debug, Clone)]
pub struct Commit {
    commit: GitLabCommit,
}

impl Commit {
    pub fn get(&self) -> CommitInfo {
        CommitInfo {
            sha: self.commit.id.clone(),
            tree_sha: None,
            author: self.commit.author_name.clone(),
            message: self.commit.message.clone(),
            created_at: self.commit.created_at,
            url: self.commit.web_url.clone(),
        }
    }
}

impl Object for Commit {
    fn api_object(&self) -> ApiObject {
        ApiObject::GitLab(GitLabObject::Commit(self.commit.clone()))
    }
}

/// Commits of one project.
#[derive(Clone)]
pub struct CommitsClient {
    client: GitLabClient,
    project_id: u64,
}

impl CommitsClient {
    pub(crate) fn new(client: GitLabClient, project_id: u64) -> Self {
        Self { client, project_id }
    }

    fn path(&self) -> String {
        format!("/projects/{}/repository/commits", self.project_id)
    }

    /// One page of the branch history, newest first.
    ///
    /// `page` is 1-based; 0 is read as the first page.
    pub async fn list_page(
        &self,
        branch: &str,
        per_page: u32,
        page: u32,
    ) -> platform::Result<Vec<Commit>> {
        let path = format!(
            "{}?ref_name={}&per_page={}&page={}",
            self.path(),
            encode(branch),
            per_page.clamp(1, MAX_PER_PAGE),
            page.max(1)
        );
        let commits: Vec<GitLabCommit> = self.client.get(&path).await?;
        Ok(commits.into_iter().map(|commit| Commit { commit }).collect())
    }

    /// Commit `files` to `branch` in one commit.
    ///
    /// A file with content is created; a file without content is deleted.
    pub async fn create(
        &self,
        branch: &str,
        message: &str,
        files: Vec<File>,
    ) -> platform::Result<Commit> {
        if files.is_empty() {
            return Err(ProviderError::invalid_argument("a commit needs at least one file"));
        }

        let actions = files
            .into_iter()
            .map(|file| {
                let file_path = file.path.ok_or_else(|| {
                    ProviderError::invalid_argument("every committed file needs a path")
                })?;
                let action = if file.content.is_some() { "create" } else { "delete" };
                Ok(CommitAction {
                    action: action.to_string(),
                    file_path,
                    content: file.content,
                })
            })
            .collect::<platform::Result<Vec<_>>>()?;

        let body = CreateCommit {
            branch: branch.to_string(),
            commit_message: message.to_string(),
            actions,
        };
        let commit: GitLabCommit = self.client.post(&self.path(), &body).await?;
        tracing::info!(branch, sha = %commit.id, project = self.project_id, "created commit");
        Ok(Commit { commit })
    }
}
