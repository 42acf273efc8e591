//! GitLab backend.
//!
//! # Module Structure
//!
//! - [`error`] - Error types and classification into [`crate::ProviderError`]
//! - [`types`] - Wire types for responses and request bodies
//! - [`spec`] - Spec projections and field mapping to and from neutral info
//! - [`client`] - Client creation and request plumbing
//! - `rest` - `gitlab::api` client over the transport chain
//! - one module per resource family, each with a `*Client` entry point and,
//!   where GitLab state is mutable, a handle implementing
//!   [`crate::platform::Reconcilable`]
//!
//! # Example
//!
//! ```ignore
//! use gitprovider::gitlab::GitLabClient;
//! use gitprovider::platform::{ClientOptions, RepositoryPermission, TeamAccessInfo};
//!
//! let client = GitLabClient::new(&token, ClientOptions::default())?;
//! let repo = client.org_repositories().get(&repo_ref).await?;
//! let (access, created) = repo
//!     .team_access()
//!     .reconcile(TeamAccessInfo::new("acme/ops", RepositoryPermission::Push))
//!     .await?;
//! ```

mod branches;
mod client;
mod commits;
mod deploy_keys;
mod error;
mod files;
mod organizations;
mod pull_requests;
mod repositories;
mod rest;
pub mod spec;
mod team_access;
mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use branches::BranchesClient;
pub use client::{GitLabClient, PROVIDER_ID};
pub use commits::{Commit, CommitsClient};
pub use deploy_keys::{DeployKey, DeployKeysClient};
pub use error::GitLabError;
pub use files::FilesClient;
pub use organizations::{Organization, OrganizationsClient, TeamsClient};
pub use pull_requests::{PullRequest, PullRequestsClient};
pub use repositories::{OrgRepositoriesClient, Repository, UserRepositoriesClient};
pub use team_access::{TeamAccess, TeamAccessClient};
pub use types::{
    GitLabBranch, GitLabCommit, GitLabDeployKey, GitLabFile, GitLabGroup, GitLabMember,
    GitLabMergeRequest, GitLabNamespace, GitLabProject, GitLabSharedGroup, GitLabTreeEntry,
    GitLabUser,
};

/// The GitLab wire object behind a handle.
#[derive(Debug, Clone)]
pub enum GitLabObject {
    Project(Box<GitLabProject>),
    Group(GitLabGroup),
    GroupShare(GitLabSharedGroup),
    DeployKey(GitLabDeployKey),
    Branch(GitLabBranch),
    Commit(GitLabCommit),
    MergeRequest(GitLabMergeRequest),
}
