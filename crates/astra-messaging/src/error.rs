use thiserror::Error;

/// Outbound message delivery failures.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Send credentials are absent; delivery is disabled.
    #[error("messaging provider not configured")]
    NotConfigured,

    #[error("messaging transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider rejected the send request.
    #[error("messaging provider rejected send ({status}): {message}")]
    Rejected { status: u16, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_not_configured() {
        assert_eq!(
            DeliveryError::NotConfigured.to_string(),
            "messaging provider not configured"
        );
    }

    #[test]
    fn test_display_rejected() {
        let e = DeliveryError::Rejected {
            status: 401,
            message: "Authentication Error".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "messaging provider rejected send (401): Authentication Error"
        );
    }
}
