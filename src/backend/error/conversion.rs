/**
 * Error Conversion
 *
 * Conversions from `BackendError` into the two shapes callers see: an HTTP
 * response for REST handlers and an `error` event for realtime connections.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "success": false,
 *   "error": "Message not found"
 * }
 * ```
 */

use axum::{
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::error::types::BackendError;
use crate::shared::{ApiResponse, ServerEvent};

impl IntoResponse for BackendError {
    /// Convert a backend error into an HTTP response
    ///
    /// Unexpected failures are logged here with their full detail; the body
    /// only ever carries the caller-facing message.
    fn into_response(self) -> Response {
        let status = self.status_code();
        if self.is_unexpected() {
            tracing::error!("[Backend] Unexpected failure: {}", self);
        } else {
            tracing::debug!("[Backend] Request rejected with {}: {}", status, self);
        }

        (status, Json(ApiResponse::failure(self.message()))).into_response()
    }
}

impl From<&BackendError> for ServerEvent {
    fn from(error: &BackendError) -> Self {
        ServerEvent::error(error.message())
    }
}
