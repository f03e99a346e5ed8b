#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use configs::{AppConfig, BootstrapAdmin};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const SECRET: &str = "test-secret";
pub const ADMIN: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-pass";

/// Router over a fresh in-memory database with a bootstrap admin.
pub async fn build_app() -> anyhow::Result<Router> {
    let db = models::db::connect_in_memory().await?;
    let mut cfg = AppConfig::default();
    cfg.auth.jwt_secret = SECRET.into();
    cfg.auth.bootstrap_admin = Some(BootstrapAdmin {
        username: ADMIN.into(),
        password: ADMIN_PASSWORD.into(),
        email: None,
    });
    let (app, state) = server::startup::build_app(db.clone(), &cfg);
    server::startup::prepare_database(&db, &cfg, &state).await?;
    Ok(app)
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<Request<Body>> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {t}"));
    }
    let req = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&v)?))?,
        None => builder.body(Body::empty())?,
    };
    Ok(req)
}

/// Status plus the JSON body (`Null` when the body is not JSON).
pub async fn send(app: &Router, req: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Ok((status, body))
}

pub async fn login(app: &Router, username: &str, password: &str) -> anyhow::Result<String> {
    let req = request("POST", "/auths/login", None, Some(json!({"username": username, "password": password})))?;
    let (status, body) = send(app, req).await?;
    anyhow::ensure!(status == StatusCode::OK, "login failed: {status} {body}");
    body["token"].as_str().map(str::to_owned).ok_or_else(|| anyhow::anyhow!("no token in {body}"))
}

pub async fn create_user(app: &Router, admin_token: &str, username: &str, password: &str, role: &str) -> anyhow::Result<Value> {
    let req = request(
        "POST",
        "/api/users",
        Some(admin_token),
        Some(json!({"username": username, "password": password, "role": role})),
    )?;
    let (status, body) = send(app, req).await?;
    anyhow::ensure!(status == StatusCode::CREATED, "create user failed: {status} {body}");
    Ok(body["data"].clone())
}
