use thiserror::Error;

/// Upstream API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request could not be sent or the connection failed
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("API Error: {status} - {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Response body was not the expected JSON
    #[error("Parse error: {0}")]
    Decode(String),
}

/// Metadata lookup errors
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}
