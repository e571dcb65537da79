//! Backend Error Module
//!
//! This module defines error types specific to the backend server.
//! These errors are used by HTTP handlers and by the realtime gateway.
//!
//! # Architecture
//!
//! - **`types`** - Error type definitions and constructors
//! - **`conversion`** - Conversions into HTTP responses and `error` events
//!
//! # Example
//!
//! ```rust,no_run
//! use utasks_chat::backend::error::BackendError;
//! use axum::response::Response;
//!
//! # async fn example() -> Result<Response, BackendError> {
//! // Handler can return BackendError directly
//! Err(BackendError::not_found("Message not found"))
//! # }
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::BackendError;

/// Result alias used throughout the backend
pub type BackendResult<T> = Result<T, BackendError>;
