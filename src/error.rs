use thiserror::Error;

/// Errors raised at the edges of a projection: scenario files and solver/sweep settings.
#[derive(Error, Debug)]
pub enum RentOwnError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported scenario format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = RentOwnError::from(io_err);
        let msg = err.to_string();
        assert!(msg.contains("IO error"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn json_error_from_conversion() {
        let result: Result<serde_json::Value, _> = serde_json::from_str("{ not json");
        let err: RentOwnError = result.unwrap_err().into();
        assert!(matches!(err, RentOwnError::Json(_)));
        assert!(err.to_string().contains("JSON error"));
    }

    #[test]
    fn toml_error_from_conversion() {
        let result: Result<toml::Value, _> = toml::from_str("home_price = = 1");
        let err: RentOwnError = result.unwrap_err().into();
        assert!(matches!(err, RentOwnError::Toml(_)));
    }

    #[test]
    fn invalid_config_display() {
        let err = RentOwnError::InvalidConfig("tolerance must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: tolerance must be > 0"
        );
    }

    #[test]
    fn unsupported_format_display() {
        let err = RentOwnError::UnsupportedFormat(".yaml".to_string());
        assert_eq!(err.to_string(), "Unsupported scenario format: .yaml");
    }
}
