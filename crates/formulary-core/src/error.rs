//! Error types for configuration handling.

use miette::Diagnostic;

/// A configuration value that violates the schema.
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum ConfigError {
    /// A numeric field outside its allowed range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    #[diagnostic(
        code(formulary::config::out_of_range),
        help("adjust the value in the settings panel")
    )]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A preset name that is not in the built-in table.
    #[error("unknown preset: {0}")]
    #[diagnostic(
        code(formulary::config::unknown_preset),
        help("available presets are default, medium and fullscreen")
    )]
    UnknownPreset(String),

    /// The payload could not be decoded as a configuration.
    #[error(transparent)]
    #[diagnostic(code(formulary::config::serde))]
    Serde(#[from] serde_json::Error),
}

/// Failure reported by a [`ConfigStore`](crate::store::ConfigStore).
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum StoreError {
    /// The configuration was rejected before reaching storage.
    #[error("invalid configuration: {0}")]
    #[diagnostic(code(formulary::store::invalid))]
    Invalid(#[from] ConfigError),

    /// The storage backend failed.
    #[error("storage backend error: {0}")]
    #[diagnostic(code(formulary::store::backend))]
    Backend(String),
}
