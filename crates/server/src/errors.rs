use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::ApiResponse;
use service::auth::AuthError;
use service::ServiceError;
use thiserror::Error;
use tracing::error;

/// Failure rendered as a `ResponseEnvelope` whose status matches the HTTP status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    /// Detail is logged, never sent.
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn not_found() -> Self { Self::NotFound("Not found".into()) }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => ApiError::Validation(msg),
            ServiceError::Conflict(_) => ApiError::Conflict("Record conflicts with an existing one".into()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::NotFound("User not found".into()),
            AuthError::MissingToken => ApiError::Unauthorized("Missing bearer token".into()),
            AuthError::Expired => ApiError::Unauthorized("Token expired".into()),
            AuthError::InvalidToken => ApiError::Unauthorized("Invalid token".into()),
            AuthError::Forbidden => ApiError::Forbidden("Forbidden".into()),
            AuthError::Validation(msg) => ApiError::Validation(msg),
            AuthError::Conflict => ApiError::Conflict("User already exists".into()),
            other => ApiError::Internal(format!("auth[{}]: {}", other.code(), other)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Internal(detail) = &self {
            error!(error = %detail, "request failed");
        }
        ApiResponse::<()>::fail(self.to_string(), status).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
}
