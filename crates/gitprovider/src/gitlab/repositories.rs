//! Organization and user repositories (GitLab projects).

use async_trait::async_trait;
use gitlab::api::{self, Pagination};

use super::branches::BranchesClient;
use super::client::GitLabClient;
use super::error::GitLabError;
use super::commits::CommitsClient;
use super::deploy_keys::DeployKeysClient;
use super::files::FilesClient;
use super::pull_requests::PullRequestsClient;
use super::spec::{self, ProjectSpec};
use super::team_access::TeamAccessClient;
use super::types::{CreateProject, GitLabGroup, GitLabProject};
use super::GitLabObject;
use crate::platform::{
    self, ApiObject, Deletable, Object, OrgRepositoryRef, OrganizationRef, ProviderError,
    Reconcilable, RepositoryCreateOptions, RepositoryInfo, RepositoryRef, RepositoryVisibility,
    Updatable, UserRef, UserRepositoryRef,
};

/// Handle to one GitLab project.
///
/// Holds the last project GitLab returned and a staged [`RepositoryInfo`].
/// The staged state starts out equal to the project.
#[derive(Clone)]
pub struct Repository {
    client: GitLabClient,
    reference: RepositoryRef,
    project: GitLabProject,
    staged: RepositoryInfo,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("reference", &self.reference)
            .field("project", &self.project)
            .field("staged", &self.staged)
            .finish_non_exhaustive()
    }
}

impl Repository {
    fn new(client: GitLabClient, reference: RepositoryRef, project: GitLabProject) -> Self {
        let staged = spec::repository_info(&project);
        Self {
            client,
            reference,
            project,
            staged,
        }
    }

    pub fn repository(&self) -> &RepositoryRef {
        &self.reference
    }

    /// The project as last returned by GitLab.
    pub fn project(&self) -> &GitLabProject {
        &self.project
    }

    pub fn team_access(&self) -> TeamAccessClient {
        TeamAccessClient::new(self.client.clone(), self.project.id)
    }

    pub fn deploy_keys(&self) -> DeployKeysClient {
        DeployKeysClient::new(self.client.clone(), self.project.id)
    }

    pub fn branches(&self) -> BranchesClient {
        BranchesClient::new(self.client.clone(), self.project.id)
    }

    pub fn commits(&self) -> CommitsClient {
        CommitsClient::new(self.client.clone(), self.project.id)
    }

    pub fn pull_requests(&self) -> PullRequestsClient {
        PullRequestsClient::new(self.client.clone(), self.project.id)
    }

    pub fn files(&self) -> FilesClient {
        FilesClient::new(self.client.clone(), self.project.id)
    }

    fn desired_project(&self) -> GitLabProject {
        let mut desired = self.project.clone();
        spec::apply_repository_info(&mut desired, &self.staged);
        desired
    }

    fn observe(&mut self, project: GitLabProject) {
        self.project = project;
    }
}

impl Object for Repository {
    fn api_object(&self) -> ApiObject {
        ApiObject::GitLab(GitLabObject::Project(Box::new(self.project.clone())))
    }
}

#[async_trait]
impl Updatable for Repository {
    type Info = RepositoryInfo;

    fn get(&self) -> RepositoryInfo {
        self.staged.clone()
    }

    fn set(&mut self, info: RepositoryInfo) -> platform::Result<()> {
        info.validate()?;
        if info.description.is_some() {
            self.staged.description = info.description;
        }
        if info.default_branch.is_some() {
            self.staged.default_branch = info.default_branch;
        }
        if info.visibility.is_some() {
            self.staged.visibility = info.visibility;
        }
        Ok(())
    }

    async fn update(&mut self) -> platform::Result<()> {
        let path = format!("/projects/{}", self.project.id);
        let updated: GitLabProject = self
            .client
            .put(&path, &spec::edit_project(&self.staged))
            .await?;
        self.observe(updated);
        Ok(())
    }
}

#[async_trait]
impl Reconcilable for Repository {
    fn is_in_sync(&self) -> bool {
        ProjectSpec::from(&self.desired_project()) == ProjectSpec::from(&self.project)
    }

    async fn reconcile(&mut self) -> platform::Result<bool> {
        match fetch_project(&self.client, &self.reference).await {
            Ok(live) => {
                self.observe(live);
                if self.is_in_sync() {
                    return Ok(false);
                }
                self.update().await?;
                tracing::info!(repository = %self.reference, "updated repository");
                Ok(true)
            }
            Err(e) if e.is_not_found() => {
                let created =
                    create_project(&self.client, &self.reference, &self.staged, None).await?;
                self.observe(created);
                tracing::info!(repository = %self.reference, "re-created repository");
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl Deletable for Repository {
    async fn delete(&self) -> platform::Result<()> {
        self.client
            .ensure_destructive_allowed(&format!("delete repository {}", self.reference))?;
        self.client
            .delete(&format!("/projects/{}", self.project.id))
            .await?;
        tracing::info!(repository = %self.reference, "deleted repository");
        Ok(())
    }
}

async fn fetch_project(
    client: &GitLabClient,
    reference: &RepositoryRef,
) -> platform::Result<GitLabProject> {
    client.ensure_domain(reference.domain())?;
    let endpoint = api::projects::Project::builder()
        .project(reference.full_path())
        .build()
        .map_err(GitLabError::builder)?;
    Ok(client.query(endpoint).await?)
}

async fn get_repository(
    client: GitLabClient,
    reference: RepositoryRef,
) -> platform::Result<Repository> {
    let project = fetch_project(&client, &reference).await?;
    Ok(Repository::new(client, reference, project))
}

/// Namespace id to create the project under. `None` means the token user's
/// personal namespace.
async fn resolve_namespace(
    client: &GitLabClient,
    reference: &RepositoryRef,
) -> platform::Result<Option<u64>> {
    match reference {
        RepositoryRef::Org(r) => {
            let endpoint = api::groups::Group::builder()
                .group(r.organization.full_path())
                .build()
                .map_err(GitLabError::builder)?;
            let group: GitLabGroup = client.query(endpoint).await?;
            Ok(Some(group.id))
        }
        RepositoryRef::User(r) => {
            let me = client.current_user().await?;
            if me.username != r.user.user_login {
                return Err(ProviderError::permission_denied(format!(
                    "cannot create repositories for user {} while authenticated as {}",
                    r.user.user_login, me.username
                )));
            }
            Ok(None)
        }
    }
}

async fn create_project(
    client: &GitLabClient,
    reference: &RepositoryRef,
    info: &RepositoryInfo,
    options: Option<&RepositoryCreateOptions>,
) -> platform::Result<GitLabProject> {
    info.validate()?;

    match fetch_project(client, reference).await {
        Ok(_) => return Err(ProviderError::already_exists(reference.full_path())),
        Err(e) if e.is_not_found() => {}
        Err(e) => return Err(e),
    }

    let namespace_id = resolve_namespace(client, reference).await?;

    if let Some(license) = options.and_then(|o| o.license_template) {
        tracing::debug!(
            license = license.as_str(),
            "GitLab project creation does not apply license templates; skipping"
        );
    }

    let body = CreateProject {
        name: reference.repository().to_string(),
        path: reference.repository().to_string(),
        namespace_id,
        description: info.description.clone(),
        visibility: info
            .visibility
            .unwrap_or(RepositoryVisibility::Private)
            .as_str()
            .to_string(),
        default_branch: info.default_branch.clone(),
        initialize_with_readme: options.and_then(|o| o.auto_init),
    };

    let project: GitLabProject = client.post("/projects", &body).await?;
    tracing::info!(repository = %reference, id = project.id, "created repository");
    Ok(project)
}

async fn create_repository(
    client: GitLabClient,
    reference: RepositoryRef,
    info: RepositoryInfo,
    options: Option<RepositoryCreateOptions>,
) -> platform::Result<Repository> {
    let project = create_project(&client, &reference, &info, options.as_ref()).await?;
    Ok(Repository::new(client, reference, project))
}

async fn reconcile_repository(
    client: &GitLabClient,
    reference: RepositoryRef,
    desired: RepositoryInfo,
    options: Option<RepositoryCreateOptions>,
) -> platform::Result<(Repository, bool)> {
    let resource = reference.to_string();
    let create_client = client.clone();
    let create_ref = reference.clone();
    platform::reconcile::reconcile(
        &resource,
        desired,
        get_repository(client.clone(), reference),
        move |info| create_repository(create_client, create_ref, info, options),
    )
    .await
}

/// Repositories owned by organizations (GitLab groups).
#[derive(Clone)]
pub struct OrgRepositoriesClient {
    client: GitLabClient,
}

impl OrgRepositoriesClient {
    pub(crate) fn new(client: GitLabClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, repo_ref: &OrgRepositoryRef) -> platform::Result<Repository> {
        get_repository(self.client.clone(), repo_ref.clone().into()).await
    }

    /// All projects directly inside the organization.
    pub async fn list(&self, org: &OrganizationRef) -> platform::Result<Vec<Repository>> {
        self.client.ensure_domain(&org.domain)?;
        let endpoint = api::groups::projects::GroupProjects::builder()
            .group(org.full_path())
            .build()
            .map_err(GitLabError::builder)?;
        let projects: Vec<GitLabProject> = self
            .client
            .query(api::paged(endpoint, Pagination::All))
            .await?;
        Ok(projects
            .into_iter()
            .map(|project| {
                let reference = OrgRepositoryRef::new(org.clone(), project.path.clone());
                Repository::new(self.client.clone(), reference.into(), project)
            })
            .collect())
    }

    /// Create a repository; fails with already-exists if it is present.
    pub async fn create(
        &self,
        repo_ref: &OrgRepositoryRef,
        info: RepositoryInfo,
        options: Option<RepositoryCreateOptions>,
    ) -> platform::Result<Repository> {
        create_repository(self.client.clone(), repo_ref.clone().into(), info, options).await
    }

    /// Create, update or leave the repository so it matches `desired`.
    ///
    /// `options` only apply when the repository has to be created.
    pub async fn reconcile(
        &self,
        repo_ref: &OrgRepositoryRef,
        desired: RepositoryInfo,
        options: Option<RepositoryCreateOptions>,
    ) -> platform::Result<(Repository, bool)> {
        reconcile_repository(&self.client, repo_ref.clone().into(), desired, options).await
    }
}

/// Repositories owned by users.
#[derive(Clone)]
pub struct UserRepositoriesClient {
    client: GitLabClient,
}

impl UserRepositoriesClient {
    pub(crate) fn new(client: GitLabClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, repo_ref: &UserRepositoryRef) -> platform::Result<Repository> {
        get_repository(self.client.clone(), repo_ref.clone().into()).await
    }

    pub async fn list(&self, user: &UserRef) -> platform::Result<Vec<Repository>> {
        self.client.ensure_domain(&user.domain)?;
        let endpoint = api::users::UserProjects::builder()
            .user(user.user_login.as_str())
            .build()
            .map_err(GitLabError::builder)?;
        let projects: Vec<GitLabProject> = self
            .client
            .query(api::paged(endpoint, Pagination::All))
            .await?;
        Ok(projects
            .into_iter()
            .map(|project| {
                let reference = UserRepositoryRef::new(user.clone(), project.path.clone());
                Repository::new(self.client.clone(), reference.into(), project)
            })
            .collect())
    }

    /// Create a repository in the token user's namespace.
    ///
    /// Only the authenticated user's own namespace can be targeted.
    pub async fn create(
        &self,
        repo_ref: &UserRepositoryRef,
        info: RepositoryInfo,
        options: Option<RepositoryCreateOptions>,
    ) -> platform::Result<Repository> {
        create_repository(self.client.clone(), repo_ref.clone().into(), info, options).await
    }

    pub async fn reconcile(
        &self,
        repo_ref: &UserRepositoryRef,
        desired: RepositoryInfo,
        options: Option<RepositoryCreateOptions>,
    ) -> platform::Result<(Repository, bool)> {
        reconcile_repository(&self.client, repo_ref.clone().into(), desired, options).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::gitlab::test_support::{
        API, DOMAIN, client, client_with, group_json, project_json, response, test_options,
    };
    use crate::http::{HttpMethod, MockTransport};
    use crate::platform::LicenseTemplate;

    fn org_ref(name: &str) -> OrgRepositoryRef {
        OrgRepositoryRef::new(OrganizationRef::new(DOMAIN, "acme"), name)
    }

    fn user_ref(name: &str) -> UserRepositoryRef {
        UserRepositoryRef::new(UserRef::new(DOMAIN, "octo"), name)
    }

    fn not_found(mock: &MockTransport, url: String) {
        mock.push_json(
            HttpMethod::Get,
            url,
            404,
            json!({"message": "404 Project Not Found"}),
        );
    }

    fn body_json(mock: &MockTransport, method: HttpMethod) -> serde_json::Value {
        let request = mock
            .requests()
            .into_iter()
            .rev()
            .find(|r| r.method == method)
            .expect("request sent");
        serde_json::from_slice(&request.body).unwrap()
    }

    #[tokio::test]
    async fn test_get_maps_project_to_info() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Get,
            format!("{API}/projects/acme%2Fdemo"),
            200,
            project_json(42, "acme", "demo"),
        );

        let repo = client(&mock).org_repositories().get(&org_ref("demo")).await.unwrap();
        let info = repo.get();
        assert_eq!(info.description.as_deref(), Some("Demo project"));
        assert_eq!(info.default_branch.as_deref(), Some("main"));
        assert_eq!(info.visibility, Some(RepositoryVisibility::Private));
        assert_eq!(repo.repository().identity(), "acme");
        assert_eq!(repo.repository().repository(), "demo");
        assert!(matches!(
            repo.api_object(),
            ApiObject::GitLab(GitLabObject::Project(p)) if p.id == 42
        ));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let mock = MockTransport::new();
        not_found(&mock, format!("{API}/projects/acme%2Fnope"));

        let err = client(&mock)
            .org_repositories()
            .get(&org_ref("nope"))
            .await
            .err()
            .unwrap();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_create_org_repository() {
        let mock = MockTransport::new();
        not_found(&mock, format!("{API}/projects/acme%2Fdemo"));
        mock.push_json(HttpMethod::Get, format!("{API}/groups/acme"), 200, group_json(5, "acme"));
        mock.push_json(
            HttpMethod::Post,
            format!("{API}/projects"),
            201,
            project_json(42, "acme", "demo"),
        );

        let repo = client(&mock)
            .org_repositories()
            .create(
                &org_ref("demo"),
                RepositoryInfo::default().with_description("Demo project"),
                Some(RepositoryCreateOptions {
                    auto_init: Some(true),
                    license_template: Some(LicenseTemplate::Apache2),
                }),
            )
            .await
            .unwrap();

        assert_eq!(repo.project().id, 42);
        assert_eq!(
            body_json(&mock, HttpMethod::Post),
            json!({
                "name": "demo",
                "path": "demo",
                "namespace_id": 5,
                "description": "Demo project",
                "visibility": "private",
                "initialize_with_readme": true
            })
        );
    }

    #[tokio::test]
    async fn test_create_existing_is_already_exists() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Get,
            format!("{API}/projects/acme%2Fdemo"),
            200,
            project_json(42, "acme", "demo"),
        );

        let err = client(&mock)
            .org_repositories()
            .create(&org_ref("demo"), RepositoryInfo::default(), None)
            .await
            .err()
            .unwrap();
        assert!(err.is_already_exists());
        assert!(mock.mutating_requests().is_empty());
    }

    #[tokio::test]
    async fn test_create_race_maps_taken_name() {
        let mock = MockTransport::new();
        not_found(&mock, format!("{API}/projects/acme%2Fdemo"));
        mock.push_json(HttpMethod::Get, format!("{API}/groups/acme"), 200, group_json(5, "acme"));
        mock.push_json(
            HttpMethod::Post,
            format!("{API}/projects"),
            400,
            json!({
                "message": {
                    "name": ["has already been taken"],
                    "path": ["has already been taken"]
                }
            }),
        );

        let err = client(&mock)
            .org_repositories()
            .create(&org_ref("demo"), RepositoryInfo::default(), None)
            .await
            .err()
            .unwrap();
        assert!(err.is_already_exists());
    }

    #[tokio::test]
    async fn test_user_repository_for_other_user_is_denied() {
        let mock = MockTransport::new();
        not_found(&mock, format!("{API}/projects/octo%2Fdotfiles"));
        mock.push_json(
            HttpMethod::Get,
            format!("{API}/user"),
            200,
            json!({"id": 9, "username": "someone-else"}),
        );

        let err = client(&mock)
            .user_repositories()
            .create(&user_ref("dotfiles"), RepositoryInfo::default(), None)
            .await
            .err()
            .unwrap();
        assert!(err.is_permission_denied());
        assert!(mock.mutating_requests().is_empty());
    }

    #[tokio::test]
    async fn test_create_user_repository_has_no_namespace() {
        let mock = MockTransport::new();
        not_found(&mock, format!("{API}/projects/octo%2Fdotfiles"));
        mock.push_json(
            HttpMethod::Get,
            format!("{API}/user"),
            200,
            json!({"id": 9, "username": "octo"}),
        );
        mock.push_json(
            HttpMethod::Post,
            format!("{API}/projects"),
            201,
            project_json(7, "octo", "dotfiles"),
        );

        client(&mock)
            .user_repositories()
            .create(
                &user_ref("dotfiles"),
                RepositoryInfo::default().with_visibility(RepositoryVisibility::Public),
                None,
            )
            .await
            .unwrap();

        let body = body_json(&mock, HttpMethod::Post);
        assert!(body.get("namespace_id").is_none());
        assert_eq!(body["visibility"], "public");
    }

    #[tokio::test]
    async fn test_reconcile_matching_repository_is_a_no_op() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Get,
            format!("{API}/projects/acme%2Fdemo"),
            200,
            project_json(42, "acme", "demo"),
        );

        let (repo, acted) = client(&mock)
            .org_repositories()
            .reconcile(
                &org_ref("demo"),
                RepositoryInfo::default()
                    .with_description("Demo project")
                    .with_visibility(RepositoryVisibility::Private),
                None,
            )
            .await
            .unwrap();
        assert!(!acted);
        assert!(repo.is_in_sync());
        assert!(mock.mutating_requests().is_empty());
    }

    #[tokio::test]
    async fn test_reconcile_diverged_repository_updates_once() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Get,
            format!("{API}/projects/acme%2Fdemo"),
            200,
            project_json(42, "acme", "demo"),
        );
        let mut updated = project_json(42, "acme", "demo");
        updated["visibility"] = json!("internal");
        mock.push_json(HttpMethod::Put, format!("{API}/projects/42"), 200, updated);

        let (repo, acted) = client(&mock)
            .org_repositories()
            .reconcile(
                &org_ref("demo"),
                RepositoryInfo::default().with_visibility(RepositoryVisibility::Internal),
                None,
            )
            .await
            .unwrap();
        assert!(acted);
        assert_eq!(repo.project().visibility, "internal");
        assert_eq!(mock.mutating_requests().len(), 1);
        assert_eq!(body_json(&mock, HttpMethod::Put)["visibility"], "internal");
    }

    #[tokio::test]
    async fn test_reconcile_absent_repository_creates_it() {
        let mock = MockTransport::new();
        let project_url = format!("{API}/projects/acme%2Fdemo");
        not_found(&mock, project_url.clone());
        not_found(&mock, project_url);
        mock.push_json(HttpMethod::Get, format!("{API}/groups/acme"), 200, group_json(5, "acme"));
        mock.push_json(
            HttpMethod::Post,
            format!("{API}/projects"),
            201,
            project_json(42, "acme", "demo"),
        );

        let (repo, acted) = client(&mock)
            .org_repositories()
            .reconcile(&org_ref("demo"), RepositoryInfo::default(), None)
            .await
            .unwrap();
        assert!(acted);
        assert_eq!(repo.project().id, 42);
    }

    #[tokio::test]
    async fn test_handle_set_then_reconcile() {
        let mock = MockTransport::new();
        let project_url = format!("{API}/projects/acme%2Fdemo");
        mock.push_json(HttpMethod::Get, project_url.clone(), 200, project_json(42, "acme", "demo"));
        mock.push_json(HttpMethod::Get, project_url.clone(), 200, project_json(42, "acme", "demo"));
        mock.push_json(HttpMethod::Get, project_url, 200, project_json(42, "acme", "demo"));
        let mut updated = project_json(42, "acme", "demo");
        updated["description"] = json!("New description");
        mock.push_json(HttpMethod::Put, format!("{API}/projects/42"), 200, updated);

        let mut repo = client(&mock).org_repositories().get(&org_ref("demo")).await.unwrap();

        repo.set(repo.get()).unwrap();
        assert!(!repo.reconcile().await.unwrap());

        repo.set(RepositoryInfo::default().with_description("New description"))
            .unwrap();
        assert!(repo.reconcile().await.unwrap());
        assert_eq!(repo.get().description.as_deref(), Some("New description"));
        assert_eq!(repo.get().visibility, Some(RepositoryVisibility::Private));
    }

    #[tokio::test]
    async fn test_set_rejects_invalid_info_without_io() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Get,
            format!("{API}/projects/acme%2Fdemo"),
            200,
            project_json(42, "acme", "demo"),
        );
        let mut repo = client(&mock).org_repositories().get(&org_ref("demo")).await.unwrap();

        let err = repo
            .set(RepositoryInfo::default().with_default_branch(""))
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidArgument { .. }));
        assert_eq!(repo.get().default_branch.as_deref(), Some("main"));
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_requires_destructive_calls() {
        let mock = MockTransport::new();
        let project_url = format!("{API}/projects/acme%2Fdemo");
        mock.push_json(HttpMethod::Get, project_url.clone(), 200, project_json(42, "acme", "demo"));
        mock.push_json(HttpMethod::Get, project_url, 200, project_json(42, "acme", "demo"));
        mock.push_response(
            HttpMethod::Delete,
            format!("{API}/projects/42"),
            response(202, &[], ""),
        );

        let repo = client(&mock).org_repositories().get(&org_ref("demo")).await.unwrap();
        let err = repo.delete().await.unwrap_err();
        assert!(matches!(err, ProviderError::DestructiveCallDisallowed { .. }));
        assert!(mock.mutating_requests().is_empty());

        let destructive = client_with(&mock, test_options().with_destructive_calls(true));
        let repo = destructive.org_repositories().get(&org_ref("demo")).await.unwrap();
        repo.delete().await.unwrap();
        assert_eq!(mock.mutating_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_list_org_repositories() {
        let mock = MockTransport::new();
        mock.push_response(
            HttpMethod::Get,
            format!("{API}/groups/acme/projects?per_page=100&page=1"),
            response(
                200,
                &[],
                &json!([project_json(1, "acme", "one"), project_json(2, "acme", "two")])
                    .to_string(),
            ),
        );

        let repos = client(&mock)
            .org_repositories()
            .list(&OrganizationRef::new(DOMAIN, "acme"))
            .await
            .unwrap();
        let names: Vec<_> = repos.iter().map(|r| r.repository().repository().to_string()).collect();
        assert_eq!(names, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_list_user_repositories() {
        let mock = MockTransport::new();
        mock.push_response(
            HttpMethod::Get,
            format!("{API}/users/octo/projects?per_page=100&page=1"),
            response(200, &[], &json!([project_json(3, "octo", "dotfiles")]).to_string()),
        );

        let repos = client(&mock)
            .user_repositories()
            .list(&UserRef::new(DOMAIN, "octo"))
            .await
            .unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].repository().full_path(), "octo/dotfiles");
    }

    #[tokio::test]
    async fn test_foreign_domain_is_rejected_before_any_request() {
        let mock = MockTransport::new();
        let c = client(&mock);
        let github = OrganizationRef::new("github.com", "acme");
        let foreign = OrgRepositoryRef::new(github.clone(), "demo");

        let err = c.org_repositories().get(&foreign).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidArgument { .. }));
        let err = c.org_repositories().list(&github).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidArgument { .. }));
        let err = c
            .org_repositories()
            .create(&foreign, RepositoryInfo::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidArgument { .. }));
        let err = c
            .org_repositories()
            .reconcile(&foreign, RepositoryInfo::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidArgument { .. }));

        let user = UserRef::new("github.com", "octo");
        let err = c.user_repositories().list(&user).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidArgument { .. }));
        let err = c
            .user_repositories()
            .get(&UserRepositoryRef::new(user, "dotfiles"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidArgument { .. }));

        assert!(mock.requests().is_empty());
    }
}
