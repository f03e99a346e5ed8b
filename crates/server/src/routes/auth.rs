use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use common::ApiResponse;
use models::Role;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use service::auth::{domain::LoginInput, repo::SeaOrmAuthRepository, AuthError, AuthService, Claims, TokenCodec};

use crate::errors::ApiError;

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub tokens: Arc<TokenCodec>,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, tokens: TokenCodec) -> Self {
        Self { db, tokens: Arc::new(tokens) }
    }

    pub fn auth_service(&self) -> AuthService<SeaOrmAuthRepository> {
        AuthService::new(Arc::new(SeaOrmAuthRepository::new(self.db.clone())), self.tokens.clone())
    }
}

#[derive(Debug, Serialize)]
pub struct LoginOutput {
    pub token: String,
    pub token_type: &'static str,
    /// unix seconds
    pub expires_at: i64,
}

#[utoipa::path(
    post,
    path = "/auths/login",
    tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = crate::openapi::LoginResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn login(State(state): State<ServerState>, Json(input): Json<LoginInput>) -> Result<Json<LoginOutput>, ApiError> {
    let session = state.auth_service().login(input).await?;
    Ok(Json(LoginOutput { token: session.token, token_type: "bearer", expires_at: session.expires_at }))
}

#[utoipa::path(
    get,
    path = "/auths/me",
    tag = "auth",
    responses(
        (status = 200, description = "Claims of the presented token"),
        (status = 401, description = "Missing, expired or invalid token")
    ),
    security(("bearer" = []))
)]
pub async fn me(Extension(claims): Extension<Claims>) -> ApiResponse<Claims> {
    ApiResponse::success(claims)
}

/// Who may call a group of routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    /// Exact role match.
    Role(Role),
}

/// Middleware state: the policy for one route group plus the codec to check tokens with.
#[derive(Clone)]
pub struct AccessGate {
    pub access: Access,
    pub tokens: Arc<TokenCodec>,
}

impl AccessGate {
    pub fn new(access: Access, tokens: Arc<TokenCodec>) -> Self { Self { access, tokens } }
}

/// Token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .ok_or(AuthError::MissingToken)?;
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// Enforce the gate's policy. On success the verified `Claims` are stored in the
/// request extensions for handlers that want the caller's identity.
pub async fn require_access(State(gate): State<AccessGate>, mut req: Request, next: Next) -> Result<Response, ApiError> {
    if gate.access == Access::Public {
        return Ok(next.run(req).await);
    }

    let path = req.uri().path().to_owned();
    let claims = match bearer_token(req.headers()).and_then(|token| gate.tokens.verify(token)) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!(path = %path, err = %e, "token validation failed");
            return Err(e.into());
        }
    };
    if let Access::Role(required) = gate.access {
        AuthService::<SeaOrmAuthRepository>::authorize(&claims, required)?;
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
