//! Deploy keys enabled on a project.
//!
//! GitLab can rename a key and toggle push access in place, but the key
//! material itself is immutable: changing it deletes the key and adds a new
//! one.

use async_trait::async_trait;
use gitlab::api::{self, Pagination};

use super::client::GitLabClient;
use super::error::GitLabError;
use super::spec::{self, DeployKeySpec};
use super::types::{CreateDeployKey, EditDeployKey, GitLabDeployKey};
use super::GitLabObject;
use crate::platform::{
    self, ApiObject, DeployKeyInfo, Deletable, Object, ProviderError, Reconcilable, Updatable,
    canonical_key,
};

/// Handle to one deploy key.
#[derive(Clone)]
pub struct DeployKey {
    client: GitLabClient,
    project_id: u64,
    key: GitLabDeployKey,
    staged: DeployKeyInfo,
}

impl DeployKey {
    fn new(client: GitLabClient, project_id: u64, key: GitLabDeployKey) -> Self {
        let staged = spec::deploy_key_info(&key);
        Self {
            client,
            project_id,
            key,
            staged,
        }
    }

    /// The key as last returned by GitLab.
    pub fn deploy_key(&self) -> &GitLabDeployKey {
        &self.key
    }

    fn key_path(&self) -> String {
        format!("/projects/{}/deploy_keys/{}", self.project_id, self.key.id)
    }
}

impl Object for DeployKey {
    fn api_object(&self) -> ApiObject {
        ApiObject::GitLab(GitLabObject::DeployKey(self.key.clone()))
    }
}

#[async_trait]
impl Updatable for DeployKey {
    type Info = DeployKeyInfo;

    fn get(&self) -> DeployKeyInfo {
        self.staged.clone()
    }

    fn set(&mut self, info: DeployKeyInfo) -> platform::Result<()> {
        info.validate()?;
        self.staged.name = info.name;
        self.staged.key = info.key;
        if info.read_only.is_some() {
            self.staged.read_only = info.read_only;
        }
        Ok(())
    }

    /// Fails with already-exists, before any change, when another key of
    /// the project already carries the staged title.
    async fn update(&mut self) -> platform::Result<()> {
        let title_taken = list_keys(&self.client, self.project_id)
            .await?
            .iter()
            .any(|key| key.id != self.key.id && key.title == self.staged.name);
        if title_taken {
            return Err(ProviderError::already_exists(format!(
                "deploy key {}",
                self.staged.name
            )));
        }

        if self.staged.canonical_key() != canonical_key(&self.key.key) {
            self.client.delete(&self.key_path()).await?;
            tracing::debug!(title = %self.key.title, "deploy key material changed, re-adding");
            self.key = create_key(&self.client, self.project_id, &self.staged).await?;
            return Ok(());
        }

        let body = EditDeployKey {
            title: self.staged.name.clone(),
            can_push: !self.staged.read_only.unwrap_or(!self.key.can_push),
        };
        self.key = self.client.put(&self.key_path(), &body).await?;
        Ok(())
    }
}

#[async_trait]
impl Reconcilable for DeployKey {
    fn is_in_sync(&self) -> bool {
        let mut desired = self.key.clone();
        spec::apply_deploy_key_info(&mut desired, &self.staged);
        DeployKeySpec::from(&desired) == DeployKeySpec::from(&self.key)
    }

    async fn reconcile(&mut self) -> platform::Result<bool> {
        match fetch_key(&self.client, self.project_id, self.key.id).await {
            Ok(live) => {
                self.key = live;
                if self.is_in_sync() {
                    return Ok(false);
                }
                self.update().await?;
                tracing::info!(
                    title = %self.key.title,
                    project = self.project_id,
                    "updated deploy key"
                );
                Ok(true)
            }
            Err(e) if e.is_not_found() => {
                self.key = create_key(&self.client, self.project_id, &self.staged).await?;
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl Deletable for DeployKey {
    async fn delete(&self) -> platform::Result<()> {
        self.client.delete(&self.key_path()).await?;
        tracing::info!(title = %self.key.title, project = self.project_id, "deleted deploy key");
        Ok(())
    }
}

async fn list_keys(
    client: &GitLabClient,
    project_id: u64,
) -> platform::Result<Vec<GitLabDeployKey>> {
    let endpoint = api::projects::deploy_keys::DeployKeys::builder()
        .project(project_id)
        .build()
        .map_err(GitLabError::builder)?;
    Ok(client.query(api::paged(endpoint, Pagination::All)).await?)
}

async fn fetch_key(
    client: &GitLabClient,
    project_id: u64,
    key_id: u64,
) -> platform::Result<GitLabDeployKey> {
    let endpoint = api::projects::deploy_keys::DeployKey::builder()
        .project(project_id)
        .deploy_key(key_id)
        .build()
        .map_err(GitLabError::builder)?;
    Ok(client.query(endpoint).await?)
}

async fn find_key(
    client: &GitLabClient,
    project_id: u64,
    name: &str,
) -> platform::Result<GitLabDeployKey> {
    list_keys(client, project_id)
        .await?
        .into_iter()
        .find(|key| key.title == name)
        .ok_or_else(|| ProviderError::not_found(format!("deploy key {name}")))
}

async fn create_key(
    client: &GitLabClient,
    project_id: u64,
    info: &DeployKeyInfo,
) -> platform::Result<GitLabDeployKey> {
    info.validate()?;
    if list_keys(client, project_id)
        .await?
        .iter()
        .any(|key| key.title == info.name)
    {
        return Err(ProviderError::already_exists(format!("deploy key {}", info.name)));
    }

    let body = CreateDeployKey {
        title: info.name.clone(),
        key: info.canonical_key(),
        can_push: !info.read_only_or_default(),
    };
    let key: GitLabDeployKey = client
        .post(&format!("/projects/{project_id}/deploy_keys"), &body)
        .await?;
    tracing::info!(title = %key.title, project = project_id, "added deploy key");
    Ok(key)
}

/// Deploy keys of one project.
#[derive(Clone)]
pub struct DeployKeysClient {
    client: GitLabClient,
    project_id: u64,
}

impl DeployKeysClient {
    pub(crate) fn new(client: GitLabClient, project_id: u64) -> Self {
        Self { client, project_id }
    }

    pub async fn list(&self) -> platform::Result<Vec<DeployKey>> {
        Ok(list_keys(&self.client, self.project_id)
            .await?
            .into_iter()
            .map(|key| DeployKey::new(self.client.clone(), self.project_id, key))
            .collect())
    }

    /// The key titled `name`.
    pub async fn get(&self, name: &str) -> platform::Result<DeployKey> {
        let key = find_key(&self.client, self.project_id, name).await?;
        Ok(DeployKey::new(self.client.clone(), self.project_id, key))
    }

    /// Add a key; fails with already-exists if the title is taken.
    pub async fn create(&self, info: DeployKeyInfo) -> platform::Result<DeployKey> {
        let key = create_key(&self.client, self.project_id, &info).await?;
        Ok(DeployKey::new(self.client.clone(), self.project_id, key))
    }

    pub async fn reconcile(
        &self,
        desired: DeployKeyInfo,
    ) -> platform::Result<(DeployKey, bool)> {
        desired.validate()?;
        let resource = format!("deploy key {}", desired.name);
        let fetch = self.get(&desired.name);
        platform::reconcile::reconcile(&resource, desired.clone(), fetch, |info| self.create(info))
            .await
    }
}
