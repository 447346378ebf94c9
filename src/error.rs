// Typed errors with thiserror. Only the JSON boundary can fail; the engine itself never does.
// See DESIGN.md: Grounding ledger, src/error.rs

use thiserror::Error;

/// Errors raised while decoding configuration or host events.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid host event: {0}")]
    InvalidEvent(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = EngineError::InvalidConfig("expected a JSON object".to_string());
        assert!(err.to_string().contains("expected a JSON object"));
    }

    #[test]
    fn serde_errors_convert() {
        let err: EngineError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, EngineError::Serialization(_)));
    }
}
