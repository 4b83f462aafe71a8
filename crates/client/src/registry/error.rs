//! Scheme registry client error types.

use std::sync::Arc;

/// Errors from the scheme registry client.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The configured endpoint is not a usable URL.
    #[error("invalid registry endpoint: {0}")]
    InvalidEndpoint(String),

    /// The registry answered with a non-success status.
    #[error("status {status} ({reason})")]
    HttpError { status: u16, reason: String },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),
}

impl RegistryError {
    /// HTTP status, if the registry returned one.
    pub fn status(&self) -> Option<u16> {
        match self {
            RegistryError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { RegistryError::Timeout } else { RegistryError::Network(Arc::new(err)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RegistryError::HttpError { status: 503, reason: "Service Unavailable".into() };
        assert_eq!(err.to_string(), "status 503 (Service Unavailable)");
        assert_eq!(err.status(), Some(503));

        let err = RegistryError::Timeout;
        assert!(err.to_string().contains("timeout"));
        assert_eq!(err.status(), None);
    }
}
