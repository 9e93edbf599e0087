//! Error taxonomy for the lookup client.

use std::sync::Arc;

use thiserror::Error;

/// Errors raised below the autocomplete session boundary.
///
/// Clone is required because a single failed provisioning attempt is
/// delivered to every caller waiting on it.
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    /// Required configuration (the provider credential) is missing.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The provider capability could not be provisioned.
    #[error("provider provisioning failed: {0}")]
    Provisioning(String),

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(Arc<reqwest::Error>),

    /// The provider answered with a status other than `OK` / `ZERO_RESULTS`.
    #[error("provider returned {status} for {operation}: {message}")]
    Status {
        operation: &'static str,
        status: String,
        message: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: Arc<serde_json::Error>,
    },

    /// A detail lookup named a place the source does not know.
    #[error("unknown place id: {0}")]
    UnknownPlace(String),
}

impl LookupError {
    /// True for failures scoped to a single search or detail call.
    pub fn is_query_error(&self) -> bool {
        matches!(
            self,
            LookupError::Http(_)
                | LookupError::Status { .. }
                | LookupError::Deserialize { .. }
                | LookupError::UnknownPlace(_)
        )
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::Http(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;
