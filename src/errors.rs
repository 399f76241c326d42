//! # Discovery Error Types
//!
//! Error taxonomy for the discovery engine. Per-item problems (a bad
//! ingredient string, one malformed candidate) are recovered locally and
//! never surface here; these variants cover pipeline-level failures only.

/// Errors surfaced by the discovery engine
#[derive(Debug, Clone)]
pub enum DiscoveryError {
    /// Invalid request input (unknown user/recipe id, bad page bounds)
    BadRequest(String),
    /// Upstream fetch failed; the caller may retry
    Unavailable(String),
    /// Weight/threshold tables missing or invalid; fatal, never worked around
    Configuration(String),
}

impl DiscoveryError {
    /// Whether the caller should treat this as retryable
    pub fn is_transient(&self) -> bool {
        matches!(self, DiscoveryError::Unavailable(_))
    }
}

impl std::fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryError::BadRequest(msg) => write!(f, "Bad request: {msg}"),
            DiscoveryError::Unavailable(msg) => write!(f, "Upstream unavailable: {msg}"),
            DiscoveryError::Configuration(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for DiscoveryError {}

impl From<anyhow::Error> for DiscoveryError {
    fn from(err: anyhow::Error) -> Self {
        DiscoveryError::Unavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(DiscoveryError::Unavailable("timeout".into()).is_transient());
        assert!(!DiscoveryError::BadRequest("no such user".into()).is_transient());
        assert!(!DiscoveryError::Configuration("bad weights".into()).is_transient());
    }

    #[test]
    fn test_display() {
        let err = DiscoveryError::BadRequest("unknown recipe 'x'".into());
        assert_eq!(err.to_string(), "Bad request: unknown recipe 'x'");
    }
}
