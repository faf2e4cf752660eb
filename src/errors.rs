//! Defines the custom error types for the application.
//!
//! Conversion itself degrades gracefully on bad optional data, so most of
//! these variants come from the file pipeline and the input parsers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConverterError {
    #[error("I/O Error: {1} - {0}")]
    Io(#[source] std::io::Error, String),

    #[error("JSON Deserialization Error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Parse Error: {0}")]
    ParseError(String),

    #[error("Serialization Error: {0}")]
    SerializationError(String),

    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    #[error("Unsupported Format: {0}")]
    UnsupportedFormat(String),
}

impl From<std::io::Error> for ConverterError {
    fn from(err: std::io::Error) -> Self {
        ConverterError::Io(err, "IO operation failed".to_string())
    }
}
