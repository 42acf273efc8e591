//! GitLab API error types.

use gitlab::api::ApiError;
use thiserror::Error;

use crate::http::HttpError;
use crate::platform::ProviderError;

/// Body fragments GitLab uses when a uniquely-named resource already exists.
const ALREADY_EXISTS_MARKERS: &[&str] = &["has already been taken", "already exists"];

/// Errors that can occur when interacting with the GitLab API.
#[derive(Debug, Error)]
pub enum GitLabError {
    #[error("GitLab API error ({status}) on {resource}: {message}")]
    Api {
        status: u16,
        resource: String,
        message: String,
    },

    #[error("HTTP request error: {0}")]
    Http(#[from] HttpError),

    #[error("JSON deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Invalid content: {0}")]
    Content(String),

    #[error("Client configuration error: {0}")]
    Config(String),

    #[error("Failed to build GitLab endpoint: {0}")]
    Builder(String),

    #[error("GitLab query error: {0}")]
    Query(String),
}

impl GitLabError {
    /// Build an API error from a non-2xx response.
    pub fn from_response(status: u16, resource: &str, body: &[u8]) -> Self {
        Self::Api {
            status,
            resource: resource.to_string(),
            message: extract_message(body),
        }
    }

    /// Wrap a `gitlab::api` builder failure.
    pub(crate) fn builder(err: impl std::fmt::Display) -> Self {
        Self::Builder(err.to_string())
    }
}

impl From<ApiError<GitLabError>> for GitLabError {
    fn from(err: ApiError<GitLabError>) -> Self {
        match err {
            ApiError::Client { source } => source,
            other => Self::Query(other.to_string()),
        }
    }
}

/// Pull the human-readable part out of a GitLab error body.
///
/// GitLab answers with `{"message": ...}` or `{"error": ...}`, where
/// `message` may itself be a map of field names to complaints. Anything that
/// is not JSON is returned verbatim.
fn extract_message(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body).trim().to_string();
    let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) else {
        return text;
    };
    let field = value.get("message").or_else(|| value.get("error"));
    match field {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => text,
    }
}

fn is_already_exists(status: u16, message: &str) -> bool {
    status == 409 || ALREADY_EXISTS_MARKERS.iter().any(|m| message.contains(m))
}

impl From<GitLabError> for ProviderError {
    fn from(err: GitLabError) -> Self {
        match err {
            GitLabError::Api {
                status,
                resource,
                message,
            } => {
                if is_already_exists(status, &message) {
                    return ProviderError::already_exists(resource);
                }
                match status {
                    401 | 403 => ProviderError::permission_denied(message),
                    404 => ProviderError::not_found(resource),
                    400 | 422 => ProviderError::validation(message),
                    _ => ProviderError::unclassified(Some(status), message),
                }
            }
            GitLabError::Http(e) if e.is_transient() => ProviderError::transient(e.to_string()),
            GitLabError::Http(e) => ProviderError::unclassified(None, e.to_string()),
            GitLabError::Deserialize(e) => ProviderError::decode(e.to_string()),
            GitLabError::Content(msg) => ProviderError::decode(msg),
            GitLabError::Config(msg) | GitLabError::Builder(msg) => {
                ProviderError::invalid_argument(msg)
            }
            GitLabError::Query(msg) => ProviderError::decode(msg),
        }
    }
}
