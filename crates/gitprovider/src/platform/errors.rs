use thiserror::Error;

/// Errors surfaced by provider clients.
///
/// Every failure a caller may want to branch on has its own variant; use the
/// `is_*` helpers or `matches!` instead of inspecting messages.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The addressed resource does not exist.
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// A resource with the same identity already exists.
    #[error("Already exists: {resource}")]
    AlreadyExists { resource: String },

    /// Network failure that outlived the retry budget.
    #[error("Transient network error: {message}")]
    TransientNetwork { message: String },

    /// The provider rejected the request payload (bad reference, bad field).
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// Authentication missing or insufficient for the operation.
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    /// Caller-supplied data was rejected before any request was made.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A destructive call was attempted on a client that does not allow them.
    #[error("Destructive API calls are disabled for this client: {operation}")]
    DestructiveCallDisallowed { operation: String },

    /// The provider returned a payload that could not be decoded.
    #[error("Failed to decode provider response: {message}")]
    Decode { message: String },

    /// Any other provider failure, passed through as-is.
    #[error("Provider error: {message}")]
    Unclassified {
        status: Option<u16>,
        message: String,
    },
}

impl ProviderError {
    #[inline]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    #[inline]
    pub fn already_exists(resource: impl Into<String>) -> Self {
        Self::AlreadyExists {
            resource: resource.into(),
        }
    }

    #[inline]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    #[inline]
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    #[inline]
    pub fn transient(message: impl Into<String>) -> Self {
        Self::TransientNetwork {
            message: message.into(),
        }
    }

    #[inline]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    #[inline]
    pub fn unclassified(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Unclassified {
            status,
            message: message.into(),
        }
    }

    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[inline]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    #[inline]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    #[inline]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }

    #[inline]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientNetwork { .. })
    }
}

/// Extract a short error message suitable for display.
///
/// Takes the first line of an error message, which is useful for provider
/// errors that echo multi-line payloads.
#[inline]
pub fn short_error_message(e: &impl std::error::Error) -> String {
    let full = e.to_string();
    full.lines().next().unwrap_or(&full).to_string()
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
