//! Organizations (GitLab groups) and their teams (subgroups).

use gitlab::api::{self, Pagination};

use super::client::GitLabClient;
use super::error::GitLabError;
use super::types::{GitLabGroup, GitLabMember};
use super::GitLabObject;
use crate::platform::{self, ApiObject, Object, OrganizationInfo, OrganizationRef, TeamInfo};

/// Only groups where the caller has at least guest access.
const MIN_ACCESS_LEVEL: u32 = 10;

async fn fetch_group(client: &GitLabClient, full_path: &str) -> platform::Result<GitLabGroup> {
    let endpoint = api::groups::Group::builder()
        .group(full_path)
        .build()
        .map_err(GitLabError::builder)?;
    Ok(client.query(endpoint).await?)
}

async fn list_subgroups(
    client: &GitLabClient,
    full_path: &str,
) -> platform::Result<Vec<GitLabGroup>> {
    let endpoint = api::groups::subgroups::GroupSubgroups::builder()
        .group(full_path)
        .build()
        .map_err(GitLabError::builder)?;
    Ok(client.query(api::paged(endpoint, Pagination::All)).await?)
}

/// An organization as returned by GitLab.
#[derive(Clone)]
pub struct Organization {
    client: GitLabClient,
    reference: OrganizationRef,
    group: GitLabGroup,
}

impl Organization {
    fn new(client: GitLabClient, group: GitLabGroup) -> Self {
        let reference = OrganizationRef::from_full_path(client.domain(), &group.full_path);
        Self {
            client,
            reference,
            group,
        }
    }

    pub fn organization(&self) -> &OrganizationRef {
        &self.reference
    }

    pub fn group(&self) -> &GitLabGroup {
        &self.group
    }

    pub fn get(&self) -> OrganizationInfo {
        OrganizationInfo {
            name: Some(self.group.name.clone()),
            description: Some(self.group.description.clone().unwrap_or_default()),
        }
    }

    pub fn teams(&self) -> TeamsClient {
        TeamsClient::new(self.client.clone(), self.reference.clone())
    }
}

impl Object for Organization {
    fn api_object(&self) -> ApiObject {
        ApiObject::GitLab(GitLabObject::Group(self.group.clone()))
    }
}

/// Organizations visible to the authenticated user.
#[derive(Clone)]
pub struct OrganizationsClient {
    client: GitLabClient,
}

impl OrganizationsClient {
    pub(crate) fn new(client: GitLabClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, reference: &OrganizationRef) -> platform::Result<Organization> {
        self.client.ensure_domain(&reference.domain)?;
        let group = fetch_group(&self.client, &reference.full_path()).await?;
        Ok(Organization::new(self.client.clone(), group))
    }

    /// Every group the caller is a member of, nested groups included.
    ///
    /// Offset paging is kept here; the `Groups` builder defaults to keyset
    /// paging ordered by name.
    pub async fn list(&self) -> platform::Result<Vec<Organization>> {
        let groups: Vec<GitLabGroup> = self
            .client
            .get_paged(&format!("/groups?min_access_level={MIN_ACCESS_LEVEL}"))
            .await?;
        tracing::debug!(count = groups.len(), "listed groups");
        Ok(groups
            .into_iter()
            .map(|g| Organization::new(self.client.clone(), g))
            .collect())
    }

    /// Direct subgroups of `reference`.
    pub async fn children(
        &self,
        reference: &OrganizationRef,
    ) -> platform::Result<Vec<Organization>> {
        self.client.ensure_domain(&reference.domain)?;
        let groups = list_subgroups(&self.client, &reference.full_path()).await?;
        Ok(groups
            .into_iter()
            .map(|g| Organization::new(self.client.clone(), g))
            .collect())
    }
}

/// Teams of one organization. A team is a direct subgroup.
#[derive(Clone)]
pub struct TeamsClient {
    client: GitLabClient,
    organization: OrganizationRef,
}

impl TeamsClient {
    pub(crate) fn new(client: GitLabClient, organization: OrganizationRef) -> Self {
        Self {
            client,
            organization,
        }
    }

    /// Full group path for team `name`; an already-qualified name is kept.
    fn team_path(&self, name: &str) -> String {
        let org = self.organization.full_path();
        if name.starts_with(&format!("{org}/")) {
            name.to_string()
        } else {
            format!("{org}/{name}")
        }
    }

    async fn members(&self, group_path: &str) -> platform::Result<Vec<String>> {
        let endpoint = api::groups::members::GroupMembers::builder()
            .group(group_path)
            .build()
            .map_err(GitLabError::builder)?;
        let members: Vec<GitLabMember> = self
            .client
            .query(api::paged(endpoint, Pagination::All))
            .await?;
        Ok(members.into_iter().map(|m| m.username).collect())
    }

    pub async fn get(&self, name: &str) -> platform::Result<TeamInfo> {
        self.client.ensure_domain(&self.organization.domain)?;
        let group = fetch_group(&self.client, &self.team_path(name)).await?;
        Ok(TeamInfo {
            name: group.path,
            members: self.members(&group.full_path).await?,
        })
    }

    pub async fn list(&self) -> platform::Result<Vec<TeamInfo>> {
        self.client.ensure_domain(&self.organization.domain)?;
        let subgroups = list_subgroups(&self.client, &self.organization.full_path()).await?;

        let mut teams = Vec::with_capacity(subgroups.len());
        for group in subgroups {
            let members = self.members(&group.full_path).await?;
            teams.push(TeamInfo {
                name: group.path,
                members,
            });
        }
        Ok(teams)
    }
}
