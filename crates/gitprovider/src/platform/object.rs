//! Handle traits shared by every provider-backed entity.

use async_trait::async_trait;

use super::errors::Result;

/// The provider wire object behind a handle.
///
/// One variant per provider; match on it to reach provider-specific fields.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum ApiObject {
    #[cfg(feature = "gitlab")]
    GitLab(crate::gitlab::GitLabObject),
}

/// Anything backed by a provider wire object.
pub trait Object {
    fn api_object(&self) -> ApiObject;
}

/// A handle holding a staged desired state next to the last observed
/// provider state.
///
/// [`Updatable::set`] only stages; [`Updatable::update`] performs I/O.
#[async_trait]
pub trait Updatable: Send {
    type Info: Send;

    /// The staged state in provider-neutral form.
    fn get(&self) -> Self::Info;

    /// Stage a new desired state. Absent optional fields keep their
    /// staged value.
    fn set(&mut self, info: Self::Info) -> Result<()>;

    /// Push the staged state unconditionally.
    async fn update(&mut self) -> Result<()>;
}

#[async_trait]
pub trait Reconcilable: Updatable {
    /// Whether the staged state matches the last observed provider state.
    fn is_in_sync(&self) -> bool;

    /// Re-read provider state, then create or update as needed.
    ///
    /// Returns `true` when a corrective call was made.
    async fn reconcile(&mut self) -> Result<bool>;
}

/// A handle whose entity can be removed.
#[async_trait]
pub trait Deletable {
    async fn delete(&self) -> Result<()>;
}
