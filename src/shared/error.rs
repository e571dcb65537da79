//! Shared Error Types
//!
//! This module defines the validation errors that both the REST layer and the
//! realtime gateway raise before touching storage. They carry enough context
//! to be reported back to the originating caller and nothing more.
//!
//! # Error Categories
//!
//! - `InvalidContent` - Message content empty after trimming, or too long
//! - `MissingField` - A required payload field was absent
//! - `ValidationError` - Any other field-level validation failure
//! - `InvalidRoom` - A room key string that is neither private nor group
//! - `SerializationError` - Malformed JSON payloads
//!
//! # Usage
//!
//! ```rust
//! use utasks_chat::shared::error::SharedError;
//!
//! let error = SharedError::validation("name", "Group name is required");
//! assert!(error.to_string().contains("name"));
//! ```
use thiserror::Error;

/// Validation errors shared by every entry point
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Message content was empty (post-trim) or exceeded the length cap
    #[error("Invalid content: {message}")]
    InvalidContent {
        /// Human-readable error message
        message: String,
    },

    /// A required field was not supplied
    #[error("Missing required field '{field}'")]
    MissingField {
        /// Wire name of the missing field
        field: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Room key that does not name a private or group room
    #[error("Invalid room '{room}'")]
    InvalidRoom {
        /// The offending room string
        room: String,
    },

    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new invalid content error
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }

    /// Create a new missing field error
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new invalid room error
    pub fn invalid_room(room: impl Into<String>) -> Self {
        Self::InvalidRoom { room: room.into() }
    }

    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
