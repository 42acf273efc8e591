//! Mapping between provider-neutral info types and GitLab wire objects.
//!
//! A `*Spec` is the user-controllable projection of a wire object. Two wire
//! objects describe the same desired state exactly when their specs are
//! equal; ids, timestamps, URLs and namespace metadata never take part.

use crate::platform::{
    DeployKeyInfo, RepositoryInfo, RepositoryPermission, RepositoryVisibility, TeamAccessInfo,
    canonical_key,
};

use super::types::{EditProject, GitLabDeployKey, GitLabProject, GitLabSharedGroup};

/// GitLab access level for a neutral permission.
pub fn permission_to_access_level(permission: RepositoryPermission) -> u32 {
    match permission {
        RepositoryPermission::Pull => 10,
        RepositoryPermission::Triage => 20,
        RepositoryPermission::Push => 30,
        RepositoryPermission::Maintain => 40,
        RepositoryPermission::Admin => 50,
    }
}

/// Neutral permission for a GitLab access level.
///
/// Levels between the named ones round down.
pub fn access_level_to_permission(level: u32) -> RepositoryPermission {
    match level {
        0..20 => RepositoryPermission::Pull,
        20..30 => RepositoryPermission::Triage,
        30..40 => RepositoryPermission::Push,
        40..50 => RepositoryPermission::Maintain,
        _ => RepositoryPermission::Admin,
    }
}

/// User-controllable fields of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSpec {
    pub name: String,
    pub path: String,
    /// A missing description compares equal to an empty one.
    pub description: String,
    pub visibility: String,
    pub default_branch: Option<String>,
}

impl From<&GitLabProject> for ProjectSpec {
    fn from(project: &GitLabProject) -> Self {
        Self {
            name: project.name.clone(),
            path: project.path.clone(),
            description: project.description.clone().unwrap_or_default(),
            visibility: project.visibility.clone(),
            default_branch: project.default_branch.clone(),
        }
    }
}

/// Overwrite the project fields `info` sets; leave the rest.
pub fn apply_repository_info(project: &mut GitLabProject, info: &RepositoryInfo) {
    if let Some(description) = &info.description {
        project.description = Some(description.clone());
    }
    if let Some(branch) = &info.default_branch {
        project.default_branch = Some(branch.clone());
    }
    if let Some(visibility) = info.visibility {
        project.visibility = visibility.as_str().to_string();
    }
}

/// Neutral view of a project.
pub fn repository_info(project: &GitLabProject) -> RepositoryInfo {
    RepositoryInfo {
        description: Some(project.description.clone().unwrap_or_default()),
        default_branch: project.default_branch.clone(),
        visibility: project.visibility.parse::<RepositoryVisibility>().ok(),
    }
}

/// Edit request carrying exactly the fields `info` sets.
pub fn edit_project(info: &RepositoryInfo) -> EditProject {
    EditProject {
        description: info.description.clone(),
        default_branch: info.default_branch.clone(),
        visibility: info.visibility.map(|v| v.as_str().to_string()),
    }
}

/// User-controllable fields of a project-to-group share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupShareSpec {
    pub group_full_path: String,
    pub access_level: u32,
}

impl From<&GitLabSharedGroup> for GroupShareSpec {
    fn from(share: &GitLabSharedGroup) -> Self {
        Self {
            group_full_path: share.group_full_path.clone(),
            access_level: share.group_access_level,
        }
    }
}

pub fn apply_team_access_info(share: &mut GitLabSharedGroup, info: &TeamAccessInfo) {
    share.group_full_path = info.name.clone();
    if let Some(permission) = info.permission {
        share.group_access_level = permission_to_access_level(permission);
    }
}

pub fn team_access_info(share: &GitLabSharedGroup) -> TeamAccessInfo {
    TeamAccessInfo {
        name: share.group_full_path.clone(),
        permission: Some(access_level_to_permission(share.group_access_level)),
    }
}

/// User-controllable fields of a deploy key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployKeySpec {
    pub title: String,
    /// Public key with trailing newlines stripped.
    pub key: String,
    pub can_push: bool,
}

impl From<&GitLabDeployKey> for DeployKeySpec {
    fn from(key: &GitLabDeployKey) -> Self {
        Self {
            title: key.title.clone(),
            key: canonical_key(&key.key),
            can_push: key.can_push,
        }
    }
}

pub fn apply_deploy_key_info(key: &mut GitLabDeployKey, info: &DeployKeyInfo) {
    key.title = info.name.clone();
    key.key = info.canonical_key();
    if let Some(read_only) = info.read_only {
        key.can_push = !read_only;
    }
}

pub fn deploy_key_info(key: &GitLabDeployKey) -> DeployKeyInfo {
    DeployKeyInfo {
        name: key.title.clone(),
        key: canonical_key(&key.key).into_bytes(),
        read_only: Some(!key.can_push),
    }
}
