//! Intake error types.
//!
//! [`IntakeError`] covers every way an invocation can fail. Each variant maps
//! to a stable class name via [`IntakeError::error_type`], which the Lambda
//! binary reports as the diagnostic `errorType`.

use xmlintake_xml::XmlError;

use crate::decode::DecodeError;
use crate::store::StoreError;

/// Intake error type.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    /// No destination bucket in the request or the configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request body could not be decoded into text.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The decoded text is not well-formed XML.
    #[error("malformed XML: {0}")]
    Parse(#[from] XmlError),

    /// The parsed document could not be serialized to JSON.
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The object store rejected the write.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl IntakeError {
    /// Stable class name of this error.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Config(_) => "ConfigError",
            Self::Decode(_) => "DecodeError",
            Self::Parse(_) => "ParseError",
            Self::Serialize(_) => "SerializeError",
            Self::Storage(_) => "StorageError",
        }
    }
}

/// Convenience result type for intake operations.
pub type IntakeResult<T> = Result<T, IntakeError>;
