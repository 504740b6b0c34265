//! Shared Error Types
//!
//! Failures while decoding a frame or checking a value from `shared`.
//! The backend folds every variant into `ChatError::Validation`, so the
//! `Display` output is what a client ends up reading.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Frame or payload is not valid JSON for the expected type
    #[error("Malformed payload: {0}")]
    Decode(String),

    /// A field is missing or outside its limits
    #[error("{message}")]
    Invalid { field: &'static str, message: String },

    /// A stored or transmitted enum value is not recognised
    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}

impl SharedError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }

    pub fn unknown_variant(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.into(),
        }
    }

    /// Offending field, when the error is about one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Invalid { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
