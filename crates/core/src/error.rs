//! Error types for the Chronicler domain.
//!
//! Uses `thiserror` for ergonomic error definitions. Platform failures are
//! their own bounded context so the orchestrator can pattern-match on them
//! instead of catching SDK-specific exceptions.

use thiserror::Error;

/// The top-level error type for Chronicler operations outside the pipeline.
#[derive(Debug, Error)]
pub enum Error {
    // --- Platform errors ---
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- I/O ---
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // --- Commands ---
    #[error("Command rejected: {0}")]
    Rejected(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised by a chat-platform collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// The bot may not read this channel's history.
    #[error("Access to {channel} is forbidden")]
    Forbidden { channel: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Platform unavailable: {0}")]
    Unavailable(String),

    #[error("Notification delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("Invalid platform data: {0}")]
    InvalidData(String),
}

impl PlatformError {
    /// Whether this error means the caller lacks permission.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, PlatformError::Forbidden { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_names_the_channel() {
        let err = Error::Platform(PlatformError::Forbidden {
            channel: "#staff".into(),
        });
        assert!(err.to_string().contains("#staff"));
        assert!(err.to_string().contains("forbidden"));
    }

    #[test]
    fn platform_errors_convert() {
        let err: Error = PlatformError::Unavailable("snapshot missing".into()).into();
        assert!(matches!(err, Error::Platform(_)));
        assert!(err.to_string().contains("snapshot missing"));
    }

    #[test]
    fn only_forbidden_is_forbidden() {
        assert!(PlatformError::Forbidden { channel: "x".into() }.is_forbidden());
        assert!(!PlatformError::NotFound("x".into()).is_forbidden());
        assert!(!PlatformError::Unavailable("gateway down".into()).is_forbidden());
    }
}
