//! Error types for the ringsight engine.

use thiserror::Error;

/// Result type alias using `EngineError`.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while running the detection pipeline.
///
/// Row-level problems (bad amount, self-transfer, unparseable timestamp) are
/// not errors: they are counted as rejection diagnostics by the ingest layer
/// and the pipeline proceeds. A file with zero valid rows yields an empty
/// report, not an error.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The input as a whole could not be accepted (missing required column,
    /// undecodable file, malformed header).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Internal invariant violation. Should not occur; fatal for the call
    /// and reported upstream verbatim.
    #[error("pipeline aborted: {0}")]
    PipelineAborted(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Create an invalid-input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        EngineError::InvalidInput(msg.into())
    }

    /// Create a pipeline-abort error.
    #[must_use]
    pub fn aborted(msg: impl Into<String>) -> Self {
        EngineError::PipelineAborted(msg.into())
    }

    /// Returns true if the caller can retry with corrected input.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::InvalidInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_is_recoverable() {
        assert!(EngineError::invalid_input("missing column").is_recoverable());
        assert!(!EngineError::aborted("broken invariant").is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = EngineError::invalid_input("missing required column: amount");
        assert_eq!(
            err.to_string(),
            "invalid input: missing required column: amount"
        );
    }
}
