#![forbid(unsafe_code)]

use std::fmt;

use folio_core::{MarginParseError, OptionsError, RegistryError};

/// Top-level error type for folio hosts.
#[derive(Debug)]
pub enum Error {
    Registry(RegistryError),
    Margin(MarginParseError),
    Options(OptionsError),
    /// Loading or validating a site configuration failed.
    #[cfg(feature = "config")]
    Config(crate::config::ConfigError),
    #[cfg(feature = "logging")]
    Logging(crate::logging::LoggingError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registry(err) => write!(f, "{err}"),
            Self::Margin(err) => write!(f, "{err}"),
            Self::Options(err) => write!(f, "{err}"),
            #[cfg(feature = "config")]
            Self::Config(err) => write!(f, "{err}"),
            #[cfg(feature = "logging")]
            Self::Logging(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Registry(err) => Some(err),
            Self::Margin(err) => Some(err),
            Self::Options(err) => Some(err),
            #[cfg(feature = "config")]
            Self::Config(err) => Some(err),
            #[cfg(feature = "logging")]
            Self::Logging(err) => Some(err),
        }
    }
}

impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        Self::Registry(err)
    }
}

impl From<MarginParseError> for Error {
    fn from(err: MarginParseError) -> Self {
        Self::Margin(err)
    }
}

impl From<OptionsError> for Error {
    fn from(err: OptionsError) -> Self {
        Self::Options(err)
    }
}

#[cfg(feature = "config")]
impl From<crate::config::ConfigError> for Error {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::Config(err)
    }
}

#[cfg(feature = "logging")]
impl From<crate::logging::LoggingError> for Error {
    fn from(err: crate::logging::LoggingError) -> Self {
        Self::Logging(err)
    }
}

/// Standard result type for folio APIs.
pub type Result<T> = std::result::Result<T, Error>;
