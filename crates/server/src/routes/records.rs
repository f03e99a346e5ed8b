//! Generic record controller.
//!
//! `record_routes::<E>` mounts list/create/get/update/delete/search/page for any
//! `RecordEntity` and wraps every outcome in `ApiResponse`.

use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::get,
    Extension, Json, Router,
};
use common::ApiResponse;
use models::RecordEntity;
use sea_orm::IntoActiveModel;
use serde::Deserialize;
use service::{auth::Claims, PageQuery, RecordService};

use super::auth::{require_access, Access, AccessGate, ServerState};
use crate::errors::ApiError;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

fn records<E>(state: &ServerState) -> RecordService<E>
where
    E: RecordEntity,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: Send,
{
    RecordService::new(state.db.clone())
}

fn actor(claims: &Option<Extension<Claims>>) -> Option<&str> {
    claims.as_ref().map(|Extension(c)| c.username.as_str())
}

fn outputs<E: RecordEntity>(rows: Vec<E::Model>) -> Vec<E::Output> {
    rows.into_iter().map(E::Output::from).collect()
}

pub async fn list<E>(State(state): State<ServerState>) -> Result<ApiResponse<Vec<E::Output>>, ApiError>
where
    E: RecordEntity,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: Send,
{
    let rows = records::<E>(&state).get_all().await?;
    Ok(ApiResponse::success(outputs::<E>(rows)))
}

pub async fn get_one<E>(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<E::Output>, ApiError>
where
    E: RecordEntity,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: Send,
{
    let row = records::<E>(&state).get_by_id(id).await?.ok_or_else(ApiError::not_found)?;
    Ok(ApiResponse::success(E::Output::from(row)))
}

pub async fn create<E>(
    State(state): State<ServerState>,
    claims: Option<Extension<Claims>>,
    Json(input): Json<E::Create>,
) -> Result<ApiResponse<E::Output>, ApiError>
where
    E: RecordEntity,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: Send,
{
    let created = records::<E>(&state).create(input, actor(&claims)).await?;
    Ok(ApiResponse::created(E::Output::from(created)))
}

pub async fn update<E>(
    State(state): State<ServerState>,
    claims: Option<Extension<Claims>>,
    Path(id): Path<i32>,
    Json(input): Json<E::Update>,
) -> Result<ApiResponse<E::Output>, ApiError>
where
    E: RecordEntity,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: Send,
{
    let updated = records::<E>(&state)
        .update(id, input, actor(&claims))
        .await?
        .ok_or_else(ApiError::not_found)?;
    Ok(ApiResponse::success(E::Output::from(updated)))
}

pub async fn remove<E>(
    State(state): State<ServerState>,
    claims: Option<Extension<Claims>>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<()>, ApiError>
where
    E: RecordEntity,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: Send,
{
    if records::<E>(&state).soft_delete(id, actor(&claims)).await? {
        Ok(ApiResponse::message("deleted"))
    } else {
        Err(ApiError::not_found())
    }
}

pub async fn search<E>(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> Result<ApiResponse<Vec<E::Output>>, ApiError>
where
    E: RecordEntity,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: Send,
{
    let fields = E::search_columns();
    let rows = records::<E>(&state).search(&query.q, &fields).await?;
    Ok(ApiResponse::success(outputs::<E>(rows)))
}

pub async fn page<E>(
    State(state): State<ServerState>,
    Query(page): Query<PageQuery>,
) -> Result<ApiResponse<Vec<E::Output>>, ApiError>
where
    E: RecordEntity,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: Send,
{
    let rows = records::<E>(&state).get_page(page).await?;
    Ok(ApiResponse::success(outputs::<E>(rows)))
}

/// Routes for one resource under `prefix` (e.g. `/api/todo`), gated by `access`.
/// `/search` is only mounted when the entity declares search columns.
pub fn record_routes<E>(prefix: &str, access: Access, state: &ServerState) -> Router<ServerState>
where
    E: RecordEntity,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: Send,
{
    let mut router = Router::new()
        .route(prefix, get(list::<E>).post(create::<E>))
        .route(&format!("{prefix}/page"), get(page::<E>))
        .route(&format!("{prefix}/:id"), get(get_one::<E>).put(update::<E>).delete(remove::<E>));
    if !E::search_columns().is_empty() {
        router = router.route(&format!("{prefix}/search"), get(search::<E>));
    }
    router.route_layer(middleware::from_fn_with_state(
        AccessGate::new(access, state.tokens.clone()),
        require_access,
    ))
}
