//! Get-or-create-or-update driver.

use std::future::Future;

use super::errors::Result;
use super::object::Reconcilable;

/// Bring one entity to its desired state.
///
/// - `fetch` fails with not found: `create` runs with `desired`, action taken.
/// - `fetch` succeeds: `desired` is staged on the handle; if it already
///   matches the provider nothing is sent, otherwise one update is pushed.
/// - Any other error is returned as-is.
///
/// A concurrent creator can make `create` fail with already-exists; that
/// error is surfaced, not retried.
pub async fn reconcile<H, Fetch, Create, CreateFut>(
    resource: &str,
    desired: H::Info,
    fetch: Fetch,
    create: Create,
) -> Result<(H, bool)>
where
    H: Reconcilable,
    Fetch: Future<Output = Result<H>>,
    Create: FnOnce(H::Info) -> CreateFut,
    CreateFut: Future<Output = Result<H>>,
{
    match fetch.await {
        Ok(mut handle) => {
            handle.set(desired)?;
            if handle.is_in_sync() {
                tracing::debug!(resource, "already in desired state");
                return Ok((handle, false));
            }
            handle.update().await?;
            tracing::info!(resource, "updated to desired state");
            Ok((handle, true))
        }
        Err(e) if e.is_not_found() => {
            let handle = create(desired).await?;
            tracing::info!(resource, "created");
            Ok((handle, true))
        }
        Err(e) => Err(e),
    }
}
