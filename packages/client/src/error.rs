// ABOUTME: Error types for the REST client
// ABOUTME: Separates transient transport failures from permanent API rejections

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    pub fn http(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }

    /// Worth retrying: transport failures, throttling and server errors
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Network(_) => true,
            ClientError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ClientError::Network("reset".to_string()).is_transient());
        assert!(ClientError::Api { status: 502, body: String::new() }.is_transient());
        assert!(ClientError::Api { status: 429, body: String::new() }.is_transient());
        assert!(!ClientError::Api { status: 400, body: String::new() }.is_transient());
        assert!(!ClientError::Rejected("nope".to_string()).is_transient());
    }
}
