//! Error types for configuration, catalog loading, and state transitions.
//!
//! Sizing failures are never errors: they are reported as data in
//! [`crate::evaluate::Verdict`] and [`crate::system::CompatibilityCheck`].

use thiserror::Error;

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"array.series"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Failure to load or validate an equipment catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read catalog \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid catalog entry {entry}: {message}")]
    Invalid { entry: String, message: String },
}

/// An input event referenced catalog data that does not exist.
///
/// The state the event was applied to is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("unknown module index {0}")]
    UnknownModule(usize),

    #[error("unknown site \"{0}\"")]
    UnknownSite(String),

    #[error("unknown charge controller id {0}")]
    UnknownController(u32),

    #[error("unknown inverter id {0}")]
    UnknownInverter(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display_includes_field() {
        let e = ConfigError::new("array.series", "must be >= 1");
        assert_eq!(e.to_string(), "config error: array.series: must be >= 1");
    }

    #[test]
    fn state_error_display() {
        assert_eq!(
            StateError::UnknownController(99).to_string(),
            "unknown charge controller id 99"
        );
        assert_eq!(
            StateError::UnknownSite("atlantis".into()).to_string(),
            "unknown site \"atlantis\""
        );
    }
}
