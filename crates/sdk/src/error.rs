//! Error types for the PostHog SDK.

use serde::{Deserialize, Serialize};

/// Result type for SDK operations.
pub type PosthogResult<T> = Result<T, PosthogError>;

/// Error types that can occur when talking to PostHog or the docs service.
#[derive(Debug, thiserror::Error)]
pub enum PosthogError {
    /// HTTP request failed before a status was received (connect, timeout, decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-2xx response.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// No personal API key was configured.
    #[error("PERSONAL_API_KEY environment variable is not set")]
    MissingApiKey,

    /// No documentation service key was configured.
    #[error("INKEEP_API_KEY is required")]
    MissingDocsApiKey,

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A caller-supplied identifier cannot be used as a single path segment.
    #[error("Invalid identifier: '{0}'")]
    InvalidPathSegment(String),

    /// The response parsed but did not have the expected shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl PosthogError {
    /// Check if this error came from missing credentials.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingApiKey | Self::MissingDocsApiKey | Self::Config(_)
        )
    }

    /// Create an API error from a status code and response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(ErrorResponse {
                detail: Some(detail),
                ..
            }) => Self::Api {
                status,
                message: detail,
            },
            _ => Self::Api {
                status,
                message: body.to_string(),
            },
        }
    }
}

/// Error body returned by the PostHog API.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_uses_detail() {
        let body = r#"{"type":"authentication_error","code":"permission_denied","detail":"Invalid personal API key.","attr":null}"#;
        match PosthogError::from_response(401, body) {
            PosthogError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid personal API key.");
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_response_falls_back_to_body() {
        let err = PosthogError::from_response(502, "Bad Gateway");
        assert_eq!(err.to_string(), "API error (status 502): Bad Gateway");
    }

    #[test]
    fn test_missing_key_names_credential() {
        assert!(PosthogError::MissingApiKey
            .to_string()
            .contains("PERSONAL_API_KEY"));
        assert!(PosthogError::MissingDocsApiKey
            .to_string()
            .contains("INKEEP_API_KEY"));
        assert!(PosthogError::MissingApiKey.is_configuration());
    }
}
