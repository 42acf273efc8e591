//! GitLab API data types.
//!
//! Response types keep only the fields this crate reads. Request bodies
//! skip absent fields so GitLab leaves the matching attribute untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// GitLab project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitLabProject {
    pub id: u64,
    pub name: String,
    /// Project path (slug).
    pub path: String,
    /// Full path including namespace (e.g., "group/subgroup/project").
    #[serde(default)]
    pub path_with_namespace: String,
    pub description: Option<String>,
    pub default_branch: Option<String>,
    /// Visibility level: "public", "private", or "internal".
    #[serde(default = "default_visibility")]
    pub visibility: String,
    pub namespace: Option<GitLabNamespace>,
    #[serde(default)]
    pub web_url: String,
    pub ssh_url_to_repo: Option<String>,
    pub http_url_to_repo: Option<String>,
    /// Groups this project is shared with.
    #[serde(default)]
    pub shared_with_groups: Vec<GitLabSharedGroup>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_activity_at: Option<DateTime<Utc>>,
}

fn default_visibility() -> String {
    "private".to_string()
}

/// GitLab namespace (group or user).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitLabNamespace {
    pub id: u64,
    pub name: String,
    pub path: String,
    /// Full path (e.g., "group/subgroup").
    pub full_path: String,
    /// Kind: "group" or "user".
    pub kind: String,
}

/// GitLab group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitLabGroup {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub path: String,
    /// Full path (e.g., "parent/child").
    pub full_path: String,
    pub description: Option<String>,
    #[serde(default = "default_visibility")]
    pub visibility: String,
    pub parent_id: Option<u64>,
}

/// GitLab user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitLabUser {
    pub id: u64,
    pub username: String,
    pub name: Option<String>,
}

/// Member of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitLabMember {
    pub id: u64,
    pub username: String,
    pub access_level: u32,
}

/// A group a project is shared with, as listed on the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitLabSharedGroup {
    pub group_id: u64,
    pub group_name: String,
    pub group_full_path: String,
    pub group_access_level: u32,
}

/// GitLab deploy key enabled on a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitLabDeployKey {
    pub id: u64,
    pub title: String,
    pub key: String,
    #[serde(default)]
    pub can_push: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// GitLab branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitLabBranch {
    pub name: String,
    pub commit: GitLabCommit,
    #[serde(default)]
    pub protected: bool,
    #[serde(default)]
    pub default: bool,
}

/// GitLab commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitLabCommit {
    pub id: String,
    #[serde(default)]
    pub short_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub author_name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub web_url: Option<String>,
    #[serde(default)]
    pub parent_ids: Vec<String>,
}

/// GitLab merge request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitLabMergeRequest {
    pub id: u64,
    /// Project-scoped number.
    pub iid: u64,
    pub title: String,
    pub description: Option<String>,
    pub source_branch: String,
    pub target_branch: String,
    /// "opened", "closed", "locked" or "merged".
    pub state: String,
    #[serde(default)]
    pub web_url: String,
    pub merged_at: Option<DateTime<Utc>>,
}

/// Entry in a repository tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitLabTreeEntry {
    pub id: String,
    pub name: String,
    /// "blob" or "tree".
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
}

/// A single repository file with its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitLabFile {
    pub file_name: String,
    pub file_path: String,
    /// "base64" or "text".
    #[serde(default)]
    pub encoding: String,
    pub content: String,
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateProject {
    pub name: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub visibility: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initialize_with_readme: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditProject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareProject {
    pub group_id: u64,
    pub group_access: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateDeployKey {
    pub title: String,
    pub key: String,
    pub can_push: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditDeployKey {
    pub title: String,
    pub can_push: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateBranch {
    pub branch: String,
    #[serde(rename = "ref")]
    pub from: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateCommit {
    pub branch: String,
    pub commit_message: String,
    pub actions: Vec<CommitAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitAction {
    /// "create" or "delete".
    pub action: String,
    pub file_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateMergeRequest {
    pub source_branch: String,
    pub target_branch: String,
    pub title: String,
    pub description: String,
}
