use thiserror::Error;

/// Errors produced by the Jikan API client.
///
/// Every request-scoped variant carries the endpoint path that failed so
/// callers can log or report which fetch went wrong without threading extra
/// context alongside the error.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    Build {
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status code.
    #[error("API request to {endpoint} failed with status {status}")]
    Status { endpoint: String, status: u16 },

    /// The request could not be sent or the response body could not be read.
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not valid JSON for the expected shape.
    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// The endpoint path the failing request targeted, when one exists.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            ApiError::Build { .. } => None,
            ApiError::Status { endpoint, .. }
            | ApiError::Transport { endpoint, .. }
            | ApiError::Decode { endpoint, .. } => Some(endpoint),
        }
    }

    /// Whether the error is an HTTP 404 response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}
