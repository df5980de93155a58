//! Error types for txdash-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use txdash_core::CoreError;
use txdash_store::StoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Transaction source unavailable: {message}")]
    Upstream { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Core(CoreError::TransactionNotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Core(CoreError::Validation { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Core(CoreError::Export { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON error body: `{code, message}` plus `field`/`suggestions` for core errors
    pub fn body(&self) -> serde_json::Value {
        let code = match self {
            ApiError::BadRequest { .. } => "BAD_REQUEST",
            ApiError::Core(e) => {
                return serde_json::to_value(e.to_details()).unwrap_or_else(|_| {
                    serde_json::json!({ "code": e.code().to_string(), "message": e.to_string() })
                })
            }
            ApiError::Upstream { .. } => "SOURCE_UNAVAILABLE",
            ApiError::Internal { .. } => "INTERNAL_ERROR",
        };
        serde_json::json!({ "code": code, "message": self.to_string() })
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Core(core) => ApiError::Core(core),
            StoreError::Source { message } => ApiError::Upstream { message },
            other => ApiError::Internal {
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::debug!("{}", self);
        }
        (status, axum::Json(self.body())).into_response()
    }
}

/// Result type with ApiError
pub type ApiResult<T> = Result<T, ApiError>;
