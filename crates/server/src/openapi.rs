use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub username: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginResponse { pub token: String, pub token_type: String, pub expires_at: i64 }

/// Shape of every record endpoint response; `data` depends on the resource.
#[derive(ToSchema)]
pub struct EnvelopeDoc {
    pub status_code: u16,
    pub is_success: bool,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

#[derive(ToSchema)]
pub struct TodoCreateDoc {
    pub name: String,
    pub description: String,
    pub complete: Option<bool>,
    /// RFC 3339 timestamp
    pub deadline: String,
}

#[derive(ToSchema)]
pub struct TodoUpdateDoc {
    pub name: Option<String>,
    pub description: Option<String>,
    pub complete: Option<bool>,
    pub deadline: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(ToSchema)]
pub struct UserCreateDoc {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    /// admin | user | manager | staff
    pub role: Option<String>,
}

#[derive(ToSchema)]
pub struct UserUpdateDoc {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::auth::me,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            LoginResponse,
            EnvelopeDoc,
            TodoCreateDoc,
            TodoUpdateDoc,
            UserCreateDoc,
            UserUpdateDoc,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "records", description = "GET/POST /api/{resource}, GET/PUT/DELETE /api/{resource}/{id}, GET /api/{resource}/search?q=, GET /api/{resource}/page?skip=&limit=")
    )
)]
pub struct ApiDoc;
