//! Configuration errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_error_display() {
        let err = ConfigError::EnvVarNotSet("T2P_HOME".to_string());
        assert!(err.to_string().contains("T2P_HOME"));
    }

    #[test]
    fn test_invalid_value_display() {
        let err = ConfigError::InvalidValue {
            field: "llm.endpoint".to_string(),
            message: "must be an http(s) URL".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("llm.endpoint"));
        assert!(display.contains("http(s)"));
    }
}
