use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{ProviderError, Result};

/// Repository visibility (public, internal, or private).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryVisibility {
    Public,
    Internal,
    Private,
}

impl RepositoryVisibility {
    pub fn as_str(self) -> &'static str {
        match self {
            RepositoryVisibility::Public => "public",
            RepositoryVisibility::Internal => "internal",
            RepositoryVisibility::Private => "private",
        }
    }
}

impl fmt::Display for RepositoryVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepositoryVisibility {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "public" => Ok(Self::Public),
            "internal" => Ok(Self::Internal),
            "private" => Ok(Self::Private),
            other => Err(ProviderError::invalid_argument(format!(
                "unknown repository visibility: {other}"
            ))),
        }
    }
}

/// Permission level granted to a team on a repository, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryPermission {
    Pull,
    Triage,
    Push,
    Maintain,
    Admin,
}

impl RepositoryPermission {
    pub fn as_str(self) -> &'static str {
        match self {
            RepositoryPermission::Pull => "pull",
            RepositoryPermission::Triage => "triage",
            RepositoryPermission::Push => "push",
            RepositoryPermission::Maintain => "maintain",
            RepositoryPermission::Admin => "admin",
        }
    }
}

impl fmt::Display for RepositoryPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepositoryPermission {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pull" => Ok(Self::Pull),
            "triage" => Ok(Self::Triage),
            "push" => Ok(Self::Push),
            "maintain" => Ok(Self::Maintain),
            "admin" => Ok(Self::Admin),
            other => Err(ProviderError::invalid_argument(format!(
                "unknown repository permission: {other}"
            ))),
        }
    }
}

/// License file to seed a new repository with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LicenseTemplate {
    #[serde(rename = "apache-2.0")]
    Apache2,
    #[serde(rename = "mit")]
    Mit,
    #[serde(rename = "gpl-3.0")]
    Gpl3,
}

impl LicenseTemplate {
    pub fn as_str(self) -> &'static str {
        match self {
            LicenseTemplate::Apache2 => "apache-2.0",
            LicenseTemplate::Mit => "mit",
            LicenseTemplate::Gpl3 => "gpl-3.0",
        }
    }
}

/// Transport used in a clone URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportType {
    Https,
    Git,
    Ssh,
}

/// Desired state of a repository.
///
/// Every field is optional. An absent field is left as it is on the
/// provider during update and reconcile; it never means "clear". To clear
/// the description, set it to an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub description: Option<String>,
    /// Default branch. On create, absent means the provider default.
    pub default_branch: Option<String>,
    /// Visibility. On create, absent means [`RepositoryVisibility::Private`].
    pub visibility: Option<RepositoryVisibility>,
}

impl RepositoryInfo {
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = Some(branch.into());
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: RepositoryVisibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(branch) = &self.default_branch
            && branch.trim().is_empty()
        {
            return Err(ProviderError::invalid_argument(
                "default branch must not be empty",
            ));
        }
        Ok(())
    }
}

/// Options that only apply when a repository is created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryCreateOptions {
    /// Create an initial commit with a README.
    pub auto_init: Option<bool>,
    /// License file for the initial commit.
    pub license_template: Option<LicenseTemplate>,
}

/// Organization details as reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrganizationInfo {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A team (GitLab subgroup) and its members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamInfo {
    pub name: String,
    pub members: Vec<String>,
}

/// Access granted to a team on one repository.
///
/// `name` is the team's full path; a nested team is written `org/subgroup`.
/// An absent `permission` is left unchanged on reconcile and defaults to
/// [`RepositoryPermission::Pull`] on create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamAccessInfo {
    pub name: String,
    pub permission: Option<RepositoryPermission>,
}

impl TeamAccessInfo {
    pub fn new(name: impl Into<String>, permission: RepositoryPermission) -> Self {
        Self {
            name: name.into(),
            permission: Some(permission),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ProviderError::invalid_argument("team name must not be empty"));
        }
        Ok(())
    }

    /// Permission to use when creating the access record.
    pub fn permission_or_default(&self) -> RepositoryPermission {
        self.permission.unwrap_or(RepositoryPermission::Pull)
    }
}

/// A deploy key registered on one repository.
///
/// `name` is unique per repository. `key` is compared without trailing
/// newlines. An absent `read_only` is left unchanged on reconcile and
/// defaults to `true` on create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployKeyInfo {
    pub name: String,
    pub key: Vec<u8>,
    pub read_only: Option<bool>,
}

impl DeployKeyInfo {
    pub fn new(name: impl Into<String>, key: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            read_only: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ProviderError::invalid_argument(
                "deploy key name must not be empty",
            ));
        }
        if self.canonical_key().is_empty() {
            return Err(ProviderError::invalid_argument(
                "deploy key content must not be empty",
            ));
        }
        Ok(())
    }

    /// Key text with trailing newlines removed.
    pub fn canonical_key(&self) -> String {
        canonical_key(&String::from_utf8_lossy(&self.key))
    }

    pub fn read_only_or_default(&self) -> bool {
        self.read_only.unwrap_or(true)
    }
}

/// Canonical form used when comparing public keys.
pub fn canonical_key(key: &str) -> String {
    key.trim_end_matches(['\n', '\r']).to_string()
}

/// A branch and the commit it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchInfo {
    pub name: String,
    pub sha: String,
}

/// Commit metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitInfo {
    pub sha: String,
    pub tree_sha: Option<String>,
    pub author: String,
    pub message: String,
    pub created_at: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

/// Pull request (GitLab merge request) metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestInfo {
    /// Repository-scoped number (GitLab `iid`).
    pub number: u64,
    pub title: String,
    pub description: String,
    pub source_branch: String,
    pub target_branch: String,
    pub web_url: String,
    pub merged: bool,
}

/// A file in a repository, used for commits and directory downloads.
///
/// When committing, a file with no `content` is deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub path: Option<String>,
    pub name: Option<String>,
    pub content: Option<String>,
}

impl File {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            name: None,
            content: Some(content.into()),
        }
    }
}
