use axum::{middleware, routing::{get, post}, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use models::{todo, user, Role};

use crate::openapi::ApiDoc;

pub mod auth;
pub mod records;

use auth::{Access, AccessGate, ServerState};
use records::record_routes;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: public endpoints, auth, and one gated group per resource
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    // Public routes (health, docs, login)
    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/auths/login", post(auth::login));

    let session = Router::new()
        .route("/auths/me", get(auth::me))
        .route_layer(middleware::from_fn_with_state(
            AccessGate::new(Access::Authenticated, state.tokens.clone()),
            auth::require_access,
        ));

    // Resources
    let resources = Router::new()
        .merge(record_routes::<todo::Entity>("/api/todo", Access::Authenticated, &state))
        .merge(record_routes::<user::Entity>("/api/users", Access::Role(Role::Admin), &state));

    // Compose
    public
        .merge(session)
        .merge(resources)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx and friends
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
