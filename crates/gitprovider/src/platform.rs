//! Provider-neutral model shared by every Git-hosting backend.
//!
//! Callers describe desired state with the `*Info` types, address resources
//! with the `*Ref` types, and drive provider handles through the
//! [`Updatable`], [`Reconcilable`] and [`Deletable`] traits.
//!
//! # Example
//!
//! ```ignore
//! use gitprovider::platform::{Reconcilable, RepositoryInfo, RepositoryVisibility};
//!
//! let (mut repo, created) = client
//!     .org_repositories()
//!     .reconcile(&repo_ref, RepositoryInfo::default(), None)
//!     .await?;
//!
//! repo.set(RepositoryInfo::default().with_visibility(RepositoryVisibility::Internal))?;
//! let changed = repo.reconcile().await?;
//! ```

mod errors;
mod object;
mod options;
pub mod reconcile;
mod refs;
mod types;

pub use errors::{ProviderError, Result, short_error_message};
pub use object::{ApiObject, Deletable, Object, Reconcilable, Updatable};
pub use options::{ClientOptions, DEFAULT_DOMAIN, DEFAULT_TIMEOUT};
pub use refs::{
    OrgRepositoryRef, OrganizationRef, RepositoryRef, UserRef, UserRepositoryRef, domain_url,
    host_of,
};
pub use types::{
    BranchInfo, CommitInfo, DeployKeyInfo, File, LicenseTemplate, OrganizationInfo,
    PullRequestInfo, RepositoryCreateOptions, RepositoryInfo, RepositoryPermission,
    RepositoryVisibility, TeamAccessInfo, TeamInfo, TransportType, canonical_key,
};
