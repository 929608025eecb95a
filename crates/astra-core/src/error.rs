//! Cross-crate error type.

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, AstraError>;

/// Errors surfaced by the core crate and shared infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum AstraError {
    #[error("config error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("api error: {0}")]
    Api(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_config() {
        let err = AstraError::Config("missing port".to_string());
        assert_eq!(err.to_string(), "config error: missing port");
    }

    #[test]
    fn test_display_api() {
        let err = AstraError::Api("bind failed".to_string());
        assert_eq!(err.to_string(), "api error: bind failed");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AstraError = io.into();
        assert!(matches!(err, AstraError::Io(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_toml_error() {
        let parse = toml::from_str::<toml::Value>("not = = toml").unwrap_err();
        let err: AstraError = parse.into();
        assert!(matches!(err, AstraError::ConfigParse(_)));
    }
}
