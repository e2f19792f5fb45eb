#![forbid(unsafe_code)]

use folio::config::ConfigError;
use folio::logging::LoggingError;
use thiserror::Error;

/// Result alias for demo commands.
pub type Result<T> = std::result::Result<T, DemoError>;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("output failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not encode step: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A command finished with findings; `message` is its summary line.
    #[error("{message}")]
    Exit { code: i32, message: String },
}

impl DemoError {
    /// 2 for usage and validation problems, 1 for everything else.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Exit { code, .. } => *code,
            Self::InvalidArgument { .. } | Self::Config(ConfigError::Validation(_)) => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub fn exit(code: i32, message: impl Into<String>) -> Self {
        Self::Exit {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_constructor_preserves_code_and_message() {
        let error = DemoError::exit(3, "boom");
        assert_eq!(error.exit_code(), 3);
        assert_eq!(error.to_string(), "boom");
    }

    #[test]
    fn usage_errors_exit_with_two() {
        assert_eq!(DemoError::invalid("step must be > 0").exit_code(), 2);
        let validation = DemoError::from(ConfigError::Validation(vec!["x".into()]));
        assert_eq!(validation.exit_code(), 2);
        assert_eq!(validation.to_string(), "config error: validation errors: x");
    }

    #[test]
    fn io_errors_exit_with_one() {
        let error = DemoError::from(std::io::Error::other("disk"));
        assert_eq!(error.exit_code(), 1);
    }
}
