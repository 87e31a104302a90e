use thiserror::Error;

use crate::transport::CallKind;

/// Hard failures of the record engine.
///
/// Validation failures are never reported here: they are data, collected in
/// the record's error bag. Only contract violations and collaborator failures
/// surface as `DataError`.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("formatter '{formatter}' does not implement format (attribute '{attribute}')")]
    FormatterNotImplemented {
        formatter: String,
        attribute: String,
    },

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No {0} endpoint declared for this record")]
    MissingEndpoint(CallKind),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, DataError>;
