use super::client::{GitLabClient, encode};
use super::types::{CreateBranch, GitLabBranch, GitLabCommit};
use crate::platform::{self, BranchInfo, ProviderError};

impl From<GitLabBranch> for BranchInfo {
    fn from(branch: GitLabBranch) -> Self {
        Self {
            name: branch.name,
            sha: branch.commit.id,
        }
    }
}

/// Branches of one project.
#[derive(Clone)]
pub struct BranchesClient {
    client: GitLabClient,
    project_id: u64,
}

impl BranchesClient {
    pub(crate) fn new(client: GitLabClient, project_id: u64) -> Self {
        Self { client, project_id }
    }

    fn path(&self) -> String {
        format!("/projects/{}/repository/branches", self.project_id)
    }

    pub async fn get(&self, name: &str) -> platform::Result<BranchInfo> {
        let branch: GitLabBranch = self
            .client
            .get(&format!("{}/{}", self.path(), encode(name)))
            .await?;
        Ok(branch.into())
    }

    pub async fn list(&self) -> platform::Result<Vec<BranchInfo>> {
        let branches: Vec<GitLabBranch> = self.client.get_paged(&self.path()).await?;
        Ok(branches.into_iter().map(BranchInfo::from).collect())
    }

    /// Create branch `name` pointing at commit `from_sha`.
    ///
    /// The commit is resolved first; an unknown sha is a validation error
    /// and no branch is created.
    pub async fn create(&self, name: &str, from_sha: &str) -> platform::Result<BranchInfo> {
        if name.trim().is_empty() {
            return Err(ProviderError::invalid_argument("branch name must not be empty"));
        }

        let commit_path = format!(
            "/projects/{}/repository/commits/{}",
            self.project_id,
            encode(from_sha)
        );
        if let Err(e) = self.client.get::<GitLabCommit>(&commit_path).await {
            let e = ProviderError::from(e);
            return Err(if e.is_not_found() {
                ProviderError::validation(format!("{from_sha} does not resolve to a commit"))
            } else {
                e
            });
        }

        let branch: GitLabBranch = self
            .client
            .post(
                &self.path(),
                &CreateBranch {
                    branch: name.to_string(),
                    from: from_sha.to_string(),
                },
            )
            .await?;
        tracing::info!(branch = name, sha = from_sha, project = self.project_id, "created branch");
        Ok(branch.into())
    }
}
