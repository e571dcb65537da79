/**
 * Backend Error Types
 *
 * This module defines the error taxonomy of the chat backend. The same type
 * is returned by REST handlers (rendered as a JSON body plus status code) and
 * by the realtime gateway (rendered as an `error` event on the originating
 * connection).
 *
 * # Error Categories
 *
 * ## Authentication
 *
 * - `Unauthenticated` - no credential supplied
 * - `InvalidCredential` - malformed, expired or badly signed credential
 * - `UnknownUser` - credential valid but the user no longer exists
 *
 * ## Authorization
 *
 * - `Forbidden` - actor is not the owner/creator of the resource
 * - `NotAMember` - actor is not a member of the group it addresses
 *
 * ## Lookup and validation
 *
 * - `NotFound` - referenced message, group or user is absent
 * - `Shared` - validation failures raised before any store write
 *
 * ## Unexpected
 *
 * - `Database` / `Unexpected` - storage or internal failures; their details
 *   are logged and never returned to the caller
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::SharedError;

/// Message returned to callers for any unexpected failure
pub const GENERIC_FAILURE: &str = "Internal server error";

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use utasks_chat::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::forbidden("Not authorized to edit this message");
/// assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// No credential was presented
    #[error("Authentication required")]
    Unauthenticated,

    /// Credential could not be verified
    #[error("Invalid credential: {message}")]
    InvalidCredential {
        /// Human-readable error message
        message: String,
    },

    /// Credential verified but the referenced user is gone
    #[error("User not found")]
    UnknownUser,

    /// Actor is not a member of the addressed group
    #[error("You are not a member of this group")]
    NotAMember,

    /// Actor lacks the right to perform the operation
    #[error("{message}")]
    Forbidden {
        /// Human-readable error message
        message: String,
    },

    /// Referenced resource does not exist
    #[error("{message}")]
    NotFound {
        /// Human-readable error message
        message: String,
    },

    /// Validation error (from shared module)
    #[error(transparent)]
    Shared(#[from] SharedError),

    /// Storage failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Any other internal failure
    #[error("Unexpected error: {message}")]
    Unexpected {
        /// Internal description, logged only
        message: String,
    },
}

impl BackendError {
    /// Create a new invalid credential error
    pub fn invalid_credential(message: impl Into<String>) -> Self {
        Self::InvalidCredential {
            message: message.into(),
        }
    }

    /// Create a new forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create a new not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - authentication errors - 401 Unauthorized
    /// - `Forbidden`, `NotAMember` - 403 Forbidden
    /// - `NotFound` - 404 Not Found
    /// - `Shared` - 400 Bad Request
    /// - `Database`, `Unexpected` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated | Self::InvalidCredential { .. } | Self::UnknownUser => {
                StatusCode::UNAUTHORIZED
            }
            Self::NotAMember | Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Shared(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Unexpected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this error is an internal failure rather than a caller mistake
    pub fn is_unexpected(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Unexpected { .. })
    }

    /// Get the message shown to the caller
    ///
    /// Internal failures collapse to [`GENERIC_FAILURE`] so storage details
    /// never leak.
    pub fn message(&self) -> String {
        if self.is_unexpected() {
            GENERIC_FAILURE.to_string()
        } else {
            self.to_string()
        }
    }
}
