use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use models::Role;
use sea_orm::DatabaseConnection;
use service::auth::{domain::NewAccount, TokenCodec};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, auth::ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Apply migrations when enabled and create the configured admin account if missing.
pub async fn prepare_database(db: &DatabaseConnection, cfg: &AppConfig, state: &ServerState) -> Result<(), StartupError> {
    if cfg.database.auto_migrate {
        migration::Migrator::up(db, None)
            .await
            .map_err(|e| StartupError::Database(e.to_string()))?;
        info!("migrations applied");
    }

    if let Some(admin) = &cfg.auth.bootstrap_admin {
        let account = NewAccount {
            username: admin.username.clone(),
            password: admin.password.clone(),
            email: admin.email.clone(),
            role: Role::Admin,
        };
        let created = state
            .auth_service()
            .ensure_account(&account)
            .await
            .map_err(|e| StartupError::InvalidConfig(format!("bootstrap admin: {e}")))?;
        if created {
            info!(username = %account.username, "bootstrap admin created");
        }
    } else {
        warn!("no auth.bootstrap_admin configured; /api/users stays empty until one exists");
    }
    Ok(())
}

/// Router with state for a ready database; also used by integration tests.
pub fn build_app(db: DatabaseConnection, cfg: &AppConfig) -> (Router, ServerState) {
    let state = ServerState::new(db, TokenCodec::new(&cfg.auth.jwt_secret, cfg.auth.token_ttl_secs));
    (routes::build_router(state.clone(), build_cors()), state)
}

/// Resolves on Ctrl+C. A failed signal handler never resolves, so the server keeps running.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "ctrl_c handler unavailable");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received, draining connections");
}

/// Connect, migrate, and serve with `cfg` until Ctrl+C.
///
/// The caller owns `.env` loading, logging and config resolution.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;

    let (app, state) = build_app(db.clone(), &cfg);
    prepare_database(&db, &cfg, &state).await?;

    // Bind and serve
    let addr = bind_addr(&cfg)?;
    info!(%addr, token_ttl_secs = cfg.auth.token_ttl_secs, "starting server crate");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}
