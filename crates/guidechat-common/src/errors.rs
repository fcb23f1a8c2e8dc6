use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("missing secret: {0}")]
    MissingSecret(String),
}

#[derive(Debug, thiserror::Error)]
pub enum GuidechatError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("chat error: {0}")]
    Chat(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("polling.retry_delay_secs".into());
        assert_eq!(
            err.to_string(),
            "config validation error: polling.retry_delay_secs"
        );

        let err = ConfigError::MissingSecret("OPENAI_API_KEY".into());
        assert_eq!(err.to_string(), "missing secret: OPENAI_API_KEY");
    }

    #[test]
    fn guidechat_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: GuidechatError = config_err.into();
        assert!(matches!(err, GuidechatError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn guidechat_error_other_variants() {
        let err = GuidechatError::Chat("run failed".into());
        assert_eq!(err.to_string(), "chat error: run failed");

        let err = GuidechatError::InvalidInput("not a pdf".into());
        assert_eq!(err.to_string(), "invalid input: not a pdf");
    }
}
