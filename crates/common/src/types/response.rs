//! Uniform response envelope returned by every record endpoint.
//!
//! The HTTP status of the rendered response always equals `status_code`, so clients
//! can read either.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub is_success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 200 with payload and the default `"Success"` message.
    pub fn success(data: T) -> Self {
        Self::success_with(data, "Success", StatusCode::OK)
    }

    /// 201 with payload, used by create endpoints.
    pub fn created(data: T) -> Self {
        Self::success_with(data, "Created", StatusCode::CREATED)
    }

    pub fn success_with(data: T, message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            status_code: status.as_u16(),
            is_success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Successful response without a payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            is_success: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn fail(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            status_code: status.as_u16(),
            is_success: false,
            message: message.into(),
            data: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}
