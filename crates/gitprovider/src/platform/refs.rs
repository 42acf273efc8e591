//! References that address provider resources.

use std::fmt;

use super::types::TransportType;

/// Strip any scheme and trailing slash from a domain.
pub fn host_of(domain: &str) -> &str {
    domain
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
}

/// Base web URL for a domain, defaulting to HTTPS when no scheme was given.
pub fn domain_url(domain: &str) -> String {
    let trimmed = domain.trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// An organization (GitLab group) on a provider domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrganizationRef {
    /// Provider domain, e.g. `gitlab.com` or `https://gitlab.example.com`.
    pub domain: String,
    /// Top-level organization name, or a slash-qualified path.
    pub organization: String,
    /// Nested sub-organization names below `organization`.
    pub sub_organizations: Vec<String>,
}

impl OrganizationRef {
    pub fn new(domain: impl Into<String>, organization: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            organization: organization.into(),
            sub_organizations: Vec::new(),
        }
    }

    /// Append a nested sub-organization.
    #[must_use]
    pub fn with_sub_organization(mut self, name: impl Into<String>) -> Self {
        self.sub_organizations.push(name.into());
        self
    }

    /// Full slash-separated path, e.g. `acme/platform/infra`.
    pub fn full_path(&self) -> String {
        std::iter::once(self.organization.as_str())
            .chain(self.sub_organizations.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Build a ref from a full group path, splitting nested groups out.
    pub fn from_full_path(domain: impl Into<String>, full_path: &str) -> Self {
        let mut parts = full_path.split('/');
        let organization = parts.next().unwrap_or_default().to_string();
        Self {
            domain: domain.into(),
            organization,
            sub_organizations: parts.map(str::to_string).collect(),
        }
    }
}

impl fmt::Display for OrganizationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", host_of(&self.domain), self.full_path())
    }
}

/// A user account on a provider domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserRef {
    pub domain: String,
    pub user_login: String,
}

impl UserRef {
    pub fn new(domain: impl Into<String>, user_login: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            user_login: user_login.into(),
        }
    }
}

impl fmt::Display for UserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", host_of(&self.domain), self.user_login)
    }
}

/// A repository owned by an organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrgRepositoryRef {
    pub organization: OrganizationRef,
    pub repository_name: String,
}

impl OrgRepositoryRef {
    pub fn new(organization: OrganizationRef, repository_name: impl Into<String>) -> Self {
        Self {
            organization,
            repository_name: repository_name.into(),
        }
    }
}

/// A repository owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserRepositoryRef {
    pub user: UserRef,
    pub repository_name: String,
}

impl UserRepositoryRef {
    pub fn new(user: UserRef, repository_name: impl Into<String>) -> Self {
        Self {
            user,
            repository_name: repository_name.into(),
        }
    }
}

/// A repository, addressed through its owning organization or user.
///
/// The repository name is unique within its parent scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RepositoryRef {
    Org(OrgRepositoryRef),
    User(UserRepositoryRef),
}

impl RepositoryRef {
    pub fn domain(&self) -> &str {
        match self {
            RepositoryRef::Org(r) => &r.organization.domain,
            RepositoryRef::User(r) => &r.user.domain,
        }
    }

    /// The owner path: organization full path or user login.
    pub fn identity(&self) -> String {
        match self {
            RepositoryRef::Org(r) => r.organization.full_path(),
            RepositoryRef::User(r) => r.user.user_login.clone(),
        }
    }

    /// The repository name.
    pub fn repository(&self) -> &str {
        match self {
            RepositoryRef::Org(r) => &r.repository_name,
            RepositoryRef::User(r) => &r.repository_name,
        }
    }

    /// Owner path plus repository name, e.g. `acme/demo`.
    pub fn full_path(&self) -> String {
        format!("{}/{}", self.identity(), self.repository())
    }

    /// URL a git client can clone the repository from.
    pub fn clone_url(&self, transport: TransportType) -> String {
        let host = host_of(self.domain());
        let path = self.full_path();
        match transport {
            TransportType::Https => format!("{}/{}.git", domain_url(self.domain()), path),
            TransportType::Git => format!("git://{}/{}.git", host, path),
            TransportType::Ssh => format!("git@{}:{}.git", host, path),
        }
    }
}

impl From<OrgRepositoryRef> for RepositoryRef {
    fn from(value: OrgRepositoryRef) -> Self {
        RepositoryRef::Org(value)
    }
}

impl From<UserRepositoryRef> for RepositoryRef {
    fn from(value: UserRepositoryRef) -> Self {
        RepositoryRef::User(value)
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", host_of(self.domain()), self.full_path())
    }
}
