use super::client::GitLabClient;
use super::types::{CreateMergeRequest, GitLabMergeRequest};
use super::GitLabObject;
use crate::platform::{self, ApiObject, Object, PullRequestInfo};

/// A merge request.
#[derive(Debug, Clone)]
pub struct PullRequest {
    merge_request: GitLabMergeRequest,
}

impl PullRequest {
    pub fn get(&self) -> PullRequestInfo {
        let mr = &self.merge_request;
        PullRequestInfo {
            number: mr.iid,
            title: mr.title.clone(),
            description: mr.description.clone().unwrap_or_default(),
            source_branch: mr.source_branch.clone(),
            target_branch: mr.target_branch.clone(),
            web_url: mr.web_url.clone(),
            merged: mr.state == "merged",
        }
    }
}

impl Object for PullRequest {
    fn api_object(&self) -> ApiObject {
        ApiObject::GitLab(GitLabObject::MergeRequest(self.merge_request.clone()))
    }
}

/// Merge requests of one project.
#[derive(Clone)]
pub struct PullRequestsClient {
    client: GitLabClient,
    project_id: u64,
}

impl PullRequestsClient {
    pub(crate) fn new(client: GitLabClient, project_id: u64) -> Self {
        Self { client, project_id }
    }

    fn path(&self) -> String {
        format!("/projects/{}/merge_requests", self.project_id)
    }

    /// Open a merge request from `branch` into `base_branch`.
    pub async fn create(
        &self,
        title: &str,
        branch: &str,
        base_branch: &str,
        description: &str,
    ) -> platform::Result<PullRequest> {
        let body = CreateMergeRequest {
            source_branch: branch.to_string(),
            target_branch: base_branch.to_string(),
            title: title.to_string(),
            description: description.to_string(),
        };
        let merge_request: GitLabMergeRequest = self.client.post(&self.path(), &body).await?;
        tracing::info!(iid = merge_request.iid, branch, base_branch, "opened merge request");
        Ok(PullRequest { merge_request })
    }

    pub async fn list(&self) -> platform::Result<Vec<PullRequest>> {
        let merge_requests: Vec<GitLabMergeRequest> = self.client.get_paged(&self.path()).await?;
        Ok(merge_requests
            .into_iter()
            .map(|merge_request| PullRequest { merge_request })
            .collect())
    }

    /// The merge request with project-scoped number `number`.
    pub async fn get(&self, number: u64) -> platform::Result<PullRequest> {
        let merge_request = self
            .client
            .get(&format!("{}/{number}", self.path()))
            .await?;
        Ok(PullRequest { merge_request })
    }
}
