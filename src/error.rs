//! Error types for the onboarding wizard.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Name registry lookup failures. Always recovered by retrying.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("Name registry unreachable: {0}")]
    Unreachable(String),

    #[error("Lookup for {name} timed out")]
    Timeout { name: String },
}

/// Errors from wizard handlers called with inputs the current state can't accept.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Template {id} is not registered")]
    UnknownTemplate { id: String },

    #[error("No template selected")]
    NoTemplateSelected,

    #[error("Template {template} has no field {field}")]
    UnknownField { template: String, field: String },
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
