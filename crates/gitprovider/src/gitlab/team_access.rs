//! Team access on a project, backed by GitLab project-to-group shares.
//!
//! Teams are addressed by exact group full path: `ops` and `acme/ops` are
//! different teams. GitLab has no endpoint to change a share's access level;
//! an update removes the share and shares again.

use async_trait::async_trait;
use gitlab::api;

use super::client::GitLabClient;
use super::error::GitLabError;
use super::spec::{self, GroupShareSpec};
use super::types::{GitLabGroup, GitLabProject, GitLabSharedGroup, ShareProject};
use super::GitLabObject;
use crate::platform::{
    self, ApiObject, Deletable, Object, ProviderError, Reconcilable, TeamAccessInfo, Updatable,
};

/// Handle to one team's access on a project.
#[derive(Clone)]
pub struct TeamAccess {
    client: GitLabClient,
    project_id: u64,
    share: GitLabSharedGroup,
    staged: TeamAccessInfo,
}

impl TeamAccess {
    fn new(client: GitLabClient, project_id: u64, share: GitLabSharedGroup) -> Self {
        let staged = spec::team_access_info(&share);
        Self {
            client,
            project_id,
            share,
            staged,
        }
    }

    /// The share as last returned by GitLab.
    pub fn share(&self) -> &GitLabSharedGroup {
        &self.share
    }

    fn share_path(&self) -> String {
        format!("/projects/{}/share/{}", self.project_id, self.share.group_id)
    }
}

impl Object for TeamAccess {
    fn api_object(&self) -> ApiObject {
        ApiObject::GitLab(GitLabObject::GroupShare(self.share.clone()))
    }
}

#[async_trait]
impl Updatable for TeamAccess {
    type Info = TeamAccessInfo;

    fn get(&self) -> TeamAccessInfo {
        self.staged.clone()
    }

    /// The team name identifies the record and cannot change.
    fn set(&mut self, info: TeamAccessInfo) -> platform::Result<()> {
        info.validate()?;
        if info.name != self.staged.name {
            return Err(ProviderError::invalid_argument(format!(
                "team access for {} cannot be renamed to {}",
                self.staged.name, info.name
            )));
        }
        if info.permission.is_some() {
            self.staged.permission = info.permission;
        }
        Ok(())
    }

    async fn update(&mut self) -> platform::Result<()> {
        let level = spec::permission_to_access_level(self.staged.permission_or_default());
        self.client.delete(&self.share_path()).await?;
        self.client
            .post_unit(
                &format!("/projects/{}/share", self.project_id),
                &ShareProject {
                    group_id: self.share.group_id,
                    group_access: level,
                },
            )
            .await?;
        self.share.group_access_level = level;
        Ok(())
    }
}

#[async_trait]
impl Reconcilable for TeamAccess {
    fn is_in_sync(&self) -> bool {
        let mut desired = self.share.clone();
        spec::apply_team_access_info(&mut desired, &self.staged);
        GroupShareSpec::from(&desired) == GroupShareSpec::from(&self.share)
    }

    async fn reconcile(&mut self) -> platform::Result<bool> {
        match find_share(&self.client, self.project_id, &self.staged.name).await {
            Ok(live) => {
                self.share = live;
                if self.is_in_sync() {
                    return Ok(false);
                }
                self.update().await?;
                tracing::info!(
                    team = %self.staged.name,
                    project = self.project_id,
                    "updated team access"
                );
                Ok(true)
            }
            Err(e) if e.is_not_found() => {
                self.share = create_share(&self.client, self.project_id, &self.staged).await?;
                self.staged.name = self.share.group_full_path.clone();
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl Deletable for TeamAccess {
    async fn delete(&self) -> platform::Result<()> {
        self.client.delete(&self.share_path()).await?;
        tracing::info!(
            team = %self.staged.name,
            project = self.project_id,
            "removed team access"
        );
        Ok(())
    }
}

async fn list_shares(
    client: &GitLabClient,
    project_id: u64,
) -> platform::Result<Vec<GitLabSharedGroup>> {
    let endpoint = api::projects::Project::builder()
        .project(project_id)
        .build()
        .map_err(GitLabError::builder)?;
    let project: GitLabProject = client.query(endpoint).await?;
    Ok(project.shared_with_groups)
}

/// Share whose group full path equals `name` exactly.
async fn find_share(
    client: &GitLabClient,
    project_id: u64,
    name: &str,
) -> platform::Result<GitLabSharedGroup> {
    list_shares(client, project_id)
        .await?
        .into_iter()
        .find(|share| share.group_full_path == name)
        .ok_or_else(|| ProviderError::not_found(format!("team access {name}")))
}

async fn create_share(
    client: &GitLabClient,
    project_id: u64,
    info: &TeamAccessInfo,
) -> platform::Result<GitLabSharedGroup> {
    info.validate()?;
    let endpoint = api::groups::Group::builder()
        .group(info.name.as_str())
        .build()
        .map_err(GitLabError::builder)?;
    let group: GitLabGroup = client.query(endpoint).await?;
    let level = spec::permission_to_access_level(info.permission_or_default());

    client
        .post_unit(
            &format!("/projects/{project_id}/share"),
            &ShareProject {
                group_id: group.id,
                group_access: level,
            },
        )
        .await?;
    tracing::info!(team = %group.full_path, project = project_id, level, "granted team access");

    Ok(GitLabSharedGroup {
        group_id: group.id,
        group_name: group.name,
        group_full_path: group.full_path,
        group_access_level: level,
    })
}

/// Team access records of one project.
#[derive(Clone)]
pub struct TeamAccessClient {
    client: GitLabClient,
    project_id: u64,
}

impl TeamAccessClient {
    pub(crate) fn new(client: GitLabClient, project_id: u64) -> Self {
        Self { client, project_id }
    }

    pub async fn list(&self) -> platform::Result<Vec<TeamAccess>> {
        Ok(list_shares(&self.client, self.project_id)
            .await?
            .into_iter()
            .map(|share| TeamAccess::new(self.client.clone(), self.project_id, share))
            .collect())
    }

    /// Access record for the team with full path `name`.
    pub async fn get(&self, name: &str) -> platform::Result<TeamAccess> {
        let share = find_share(&self.client, self.project_id, name).await?;
        Ok(TeamAccess::new(self.client.clone(), self.project_id, share))
    }

    /// Grant access; fails with already-exists if the team has access.
    pub async fn create(&self, info: TeamAccessInfo) -> platform::Result<TeamAccess> {
        let share = create_share(&self.client, self.project_id, &info).await?;
        Ok(TeamAccess::new(self.client.clone(), self.project_id, share))
    }

    pub async fn reconcile(
        &self,
        desired: TeamAccessInfo,
    ) -> platform::Result<(TeamAccess, bool)> {
        desired.validate()?;
        let resource = format!("team access {}", desired.name);
        let fetch = self.get(&desired.name);
        platform::reconcile::reconcile(&resource, desired.clone(), fetch, |info| self.create(info))
            .await
    }
}
