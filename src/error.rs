//! Error types for news retrieval and serving

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NewsError {
    /// Every configured provider failed or returned something unusable
    #[error("upstream fetch failed: {0}")]
    Upstream(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("feed parse error: {0}")]
    Feed(#[from] feed_rs::parser::ParseFeedError),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NewsError {
    /// True for failures of the upstream provider chain (network, parse,
    /// timeout), as opposed to bad input or local misconfiguration.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            NewsError::Upstream(_)
                | NewsError::Network(_)
                | NewsError::Feed(_)
                | NewsError::Timeout(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, NewsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_classification() {
        assert!(NewsError::Upstream("down".into()).is_upstream());
        assert!(NewsError::Timeout(Duration::from_secs(1)).is_upstream());
        assert!(!NewsError::InvalidRequest("type".into()).is_upstream());
        assert!(!NewsError::Config("bad".into()).is_upstream());
    }

    #[test]
    fn display_includes_detail() {
        let err = NewsError::Upstream("all feeds failed".into());
        assert_eq!(err.to_string(), "upstream fetch failed: all feeds failed");
    }
}
