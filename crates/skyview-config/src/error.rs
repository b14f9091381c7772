//! Configuration error types.

/// Errors that can occur while resolving the viewer configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the sidecar file from disk.
    #[error("failed to read config: {0}")]
    ReadError(#[source] std::io::Error),

    /// The sidecar is not valid JSON.
    #[error("failed to parse config: {0}")]
    ParseError(#[source] serde_json::Error),

    /// The sidecar parsed but is not a JSON object.
    #[error("config root must be a JSON object")]
    NotAnObject,

    /// A command-line override is not of the form `key=value`.
    #[error("invalid override '{0}', expected key=value")]
    InvalidOverride(String),

    /// A key holds a value of the wrong type.
    #[error("invalid config value: {0}")]
    TypeError(#[source] serde_json::Error),

    /// A key holds a value outside its valid domain.
    #[error("invalid value for '{key}': {message}")]
    InvalidValue {
        /// Offending key.
        key: &'static str,
        /// What is wrong with it.
        message: String,
    },
}
