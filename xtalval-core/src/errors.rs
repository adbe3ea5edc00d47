use std::path::PathBuf;

use thiserror::Error;

/// Failure while turning raw form input into base-SI parameters.
///
/// Every variant carries the display name of the offending parameter so the
/// caller can surface it to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("The field {0} cannot be empty")]
    EmptyField(String),
    #[error("Non-numeric value for {0}")]
    NotNumeric(String),
    #[error("Unknown unit '{unit}' for {parameter}")]
    UnknownUnit { parameter: String, unit: String },
}

impl ValidationError {
    /// Display name of the parameter that caused the failure.
    pub fn parameter(&self) -> &str {
        match self {
            ValidationError::EmptyField(name) | ValidationError::NotNumeric(name) => name,
            ValidationError::UnknownUnit { parameter, .. } => parameter,
        }
    }
}

/// Error type for everything outside a single validation run: configuration,
/// presets and input files.
#[derive(Error, Debug)]
pub enum XtalError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Unknown unit symbol '{0}'")]
    UnknownUnit(String),
    #[error("Unknown parameter key '{0}'")]
    UnknownParameter(String),
    #[error("Invalid parameter schema: {0}")]
    InvalidSchema(String),
    #[error("Unknown probe model '{0}'")]
    UnknownProbe(String),
    #[error("Invalid thresholds: {0}")]
    InvalidThresholds(String),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type for `Result<T, XtalError>`.
pub type XtalResult<T> = Result<T, XtalError>;
