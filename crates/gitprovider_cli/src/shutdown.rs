use std::future::Future;

/// Run `operation` until it finishes or Ctrl+C arrives.
///
/// On Ctrl+C the operation future is dropped, which abandons any request in
/// flight. Calls already accepted by GitLab are not rolled back.
pub(crate) async fn run_until_interrupted<F>(operation: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: Future<Output = Result<(), Box<dyn std::error::Error>>>,
{
    tokio::select! {
        result = operation => result,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::warn!("Interrupted, abandoning in-flight requests");
            Err("interrupted".into())
        }
    }
}
