//! gitprovider - A provider-neutral client for Git-hosting REST APIs.
//!
//! This library maps desired state for organizations, repositories, team
//! access and deploy keys onto provider API calls, creating what is missing,
//! updating what has drifted and leaving the rest untouched. GitLab is the
//! implemented backend.
//!
//! Every request goes through a small transport chain:
//!
//! ```text
//! RetryTransport -> CachingTransport (optional) -> ReqwestTransport
//! ```
//!
//! # Features
//!
//! - `gitlab` (default) - Enables the GitLab backend.
//!
//! # Example
//!
//! ```ignore
//! use gitprovider::gitlab::GitLabClient;
//! use gitprovider::platform::{
//!     ClientOptions, OrgRepositoryRef, OrganizationRef, RepositoryInfo, RepositoryVisibility,
//! };
//!
//! let options = ClientOptions::default().with_conditional_requests(true);
//! let client = GitLabClient::new(&token, options)?;
//! let org = OrganizationRef::new("gitlab.com", "acme");
//! let repo_ref = OrgRepositoryRef::new(org, "demo");
//!
//! let desired = RepositoryInfo::default()
//!     .with_description("Demo project")
//!     .with_visibility(RepositoryVisibility::Private);
//! let (repo, action_taken) = client
//!     .org_repositories()
//!     .reconcile(&repo_ref, desired, None)
//!     .await?;
//! ```

pub mod cache;
pub mod http;
pub mod platform;
pub mod retry;

#[cfg(feature = "gitlab")]
pub mod gitlab;

pub use cache::{CacheStats, CachingTransport};
pub use http::HttpTransport;
pub use http::reqwest_transport::ReqwestTransport;
pub use platform::{ClientOptions, ProviderError, Result};
pub use retry::{CacheHitCounter, RetryConfig, RetryTransport};
