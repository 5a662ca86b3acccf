// Typed errors with thiserror. Surface meaningful messages to JS.
// Insight failures never reach the page as errors; the service turns them into fallback text.

use thiserror::Error;

/// Engine error types.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown shape: {0}")]
    UnknownShape(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}

/// Failures of the external text-generation collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InsightError {
    #[error("no API key configured")]
    MissingApiKey,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("insight callback failed: {0}")]
    Callback(String),
}

impl From<serde_json::Error> for InsightError {
    fn from(err: serde_json::Error) -> Self {
        InsightError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = EngineError::InvalidConfig("missing field".to_string());
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn insight_error_display() {
        let err = InsightError::HttpStatus {
            status: 403,
            body: "denied".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 403: denied");
    }
}
