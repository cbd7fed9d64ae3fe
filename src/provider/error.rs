use thiserror::Error;

/// Upstream failure classification.
///
/// Retryable errors (rate limit, transient network) get exactly one retry
/// after the backoff delay; everything else propagates immediately.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("rate limited by upstream")]
    RateLimited,

    #[error("network error: {0}")]
    Network(String),

    #[error("unknown team or series: {0}")]
    NotFound(String),

    #[error("authentication rejected by upstream")]
    Auth,

    #[error("upstream error {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("malformed upstream payload: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Whether one retry after backoff is worthwhile.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::RateLimited | ProviderError::Network(_))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ProviderError::Malformed(e.to_string())
        } else {
            ProviderError::Network(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ProviderError::RateLimited.is_retryable());
        assert!(ProviderError::Network("reset".into()).is_retryable());
        assert!(!ProviderError::NotFound("s1".into()).is_retryable());
        assert!(!ProviderError::Auth.is_retryable());
        assert!(!ProviderError::Malformed("bad json".into()).is_retryable());
    }
}
