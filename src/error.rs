use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::store::StoreError;

/// Every failure a handler can answer with.
///
/// All variants except `Internal` are expected, user-facing outcomes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("email already exists")]
    DuplicateIdentity,
    #[error("invalid credentials")]
    IdentityNotFound,
    #[error("invalid credentials")]
    InvalidCredential,
    #[error("bookmark not found or access denied")]
    AccessDenied,
    #[error("{0}")]
    Unauthenticated(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateIdentity
            | AppError::IdentityNotFound
            | AppError::InvalidCredential
            | AppError::AccessDenied => StatusCode::FORBIDDEN,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Unknown email and wrong password share one code so callers cannot
    /// tell which half of the credentials was wrong.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::DuplicateIdentity => "duplicate_identity",
            AppError::IdentityNotFound | AppError::InvalidCredential => "invalid_credentials",
            AppError::AccessDenied => "access_denied",
            AppError::Unauthenticated(_) => "unauthenticated",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal(anyhow::Error::new(e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::Internal(e) => {
                error!(error = ?e, "internal error");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = Json(ErrorBody {
            error: self.error_code(),
            message,
        });
        (status, body).into_response()
    }
}
