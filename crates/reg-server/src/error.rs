//! Request error type and its HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use reg_core::FieldErrors;
use reg_db::error::DatabaseError;
use reg_storage::StorageError;

/// Body returned for failures the client cannot fix.
pub const SERVER_ERROR_DETAIL: &str = "A server error occurred.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more fields failed validation.
    #[error(transparent)]
    Validation(#[from] FieldErrors),

    /// The body could not be decoded as its declared content type.
    #[error("{parser} parse error - {reason}")]
    Parse {
        status: StatusCode,
        parser: &'static str,
        reason: String,
    },

    /// The body's content type has no parser.
    #[error("Unsupported media type \"{0}\" in request.")]
    UnsupportedMediaType(String),

    /// Writing the uploaded file failed.
    #[error("upload storage failed: {0}")]
    Storage(#[from] StorageError),

    /// Persisting the record failed.
    #[error("database write failed: {0}")]
    Database(#[from] DatabaseError),
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Parse { status, .. } => *status,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Storage(_) | Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Validation(errors) => (status, Json(errors)).into_response(),
            Self::Parse { .. } | Self::UnsupportedMediaType(_) => {
                (status, Json(json!({ "detail": self.to_string() }))).into_response()
            }
            Self::Storage(_) | Self::Database(_) => {
                tracing::error!(error = %self, "registration failed");
                (status, Json(json!({ "detail": SERVER_ERROR_DETAIL }))).into_response()
            }
        }
    }
}
