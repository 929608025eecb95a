//! Typed failures from the graph store adapter.

use std::time::Duration;

/// Errors from executing a query against the graph store.
///
/// Callers catch this at the pipeline boundary and degrade to a
/// technical-issue reply; the cause is logged, never echoed into chat.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("graph store transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("graph store timed out after {0:?}")]
    Timeout(Duration),
    #[error("graph query failed ({code}): {message}")]
    Query { code: String, message: String },
    #[error("graph store returned a malformed response: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_display() {
        let err = ExecutionError::Query {
            code: "Neo.ClientError.Statement.SyntaxError".to_string(),
            message: "unexpected token".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "graph query failed (Neo.ClientError.Statement.SyntaxError): unexpected token"
        );
    }

    #[test]
    fn test_timeout_display_includes_duration() {
        let err = ExecutionError::Timeout(Duration::from_secs(10));
        assert!(err.to_string().contains("10s"));
    }

    #[test]
    fn test_malformed_display() {
        let err = ExecutionError::Malformed("missing results array".to_string());
        assert!(err.to_string().contains("missing results array"));
    }
}
