//! Generic record operations shared by every entity exposed over HTTP.
//!
//! Reads always exclude soft-deleted rows. Writes go through the entity's own
//! `new_active` / `merge` / `mark_deleted`, so the service never touches a column by name.

use std::marker::PhantomData;

use models::errors::ModelError;
use models::{RecordEntity, Stamp};
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, IntoActiveModel, QueryFilter, QueryOrder,
    QuerySelect, Select,
};
use tracing::{debug, info, instrument};

use crate::errors::ServiceError;
use crate::pagination::PageQuery;

/// Escape LIKE wildcards so `keyword` only matches itself. Pairs with `ESCAPE '\\'`.
fn escape_like(keyword: &str) -> String {
    let mut out = String::with_capacity(keyword.len());
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Run payload validation and password hashing on the blocking pool.
async fn off_runtime<T, F>(work: F) -> Result<T, ServiceError>
where
    F: FnOnce() -> Result<T, ModelError> + Send + 'static,
    T: Send + 'static,
{
    let out = tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ServiceError::Task(e.to_string()))?;
    Ok(out?)
}

/// CRUD, search and paging over one entity type.
pub struct RecordService<E> {
    db: DatabaseConnection,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for RecordService<E> {
    fn clone(&self) -> Self { Self { db: self.db.clone(), _entity: PhantomData } }
}

impl<E> RecordService<E>
where
    E: RecordEntity,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: Send,
{
    pub fn new(db: DatabaseConnection) -> Self { Self { db, _entity: PhantomData } }

    pub fn db(&self) -> &DatabaseConnection { &self.db }

    fn live() -> Select<E> {
        E::find().filter(E::is_deleted_column().eq(false))
    }

    async fn find_live(&self, id: i32) -> Result<Option<E::Model>, ServiceError> {
        let row = Self::live()
            .filter(E::id_column().eq(id))
            .one(&self.db)
            .await
            .map_err(ServiceError::from_db)?;
        Ok(row)
    }

    /// All non-deleted rows ordered by primary key.
    #[instrument(skip(self), fields(entity = E::NAME))]
    pub async fn get_all(&self) -> Result<Vec<E::Model>, ServiceError> {
        let rows = Self::live()
            .order_by_asc(E::id_column())
            .all(&self.db)
            .await
            .map_err(ServiceError::from_db)?;
        debug!(count = rows.len(), "listed records");
        Ok(rows)
    }

    /// `None` when the row is missing or soft-deleted.
    #[instrument(skip(self), fields(entity = E::NAME))]
    pub async fn get_by_id(&self, id: i32) -> Result<Option<E::Model>, ServiceError> {
        self.find_live(id).await
    }

    /// Validate and insert a new row stamped with `actor`.
    ///
    /// # Examples
    /// ```
    /// use migration::MigratorTrait;
    /// use models::todo::{self, TodoCreate};
    /// use service::RecordService;
    /// tokio_test::block_on(async {
    ///     let db = models::db::connect_in_memory().await.unwrap();
    ///     migration::Migrator::up(&db, None).await.unwrap();
    ///     let svc = RecordService::<todo::Entity>::new(db);
    ///     let input = TodoCreate { name: "write docs".into(), description: "".into(), complete: false, deadline: chrono::Utc::now().into() };
    ///     let created = svc.create(input, Some("alice")).await.unwrap();
    ///     assert_eq!(created.created_by.as_deref(), Some("alice"));
    /// });
    /// ```
    #[instrument(skip(self, input), fields(entity = E::NAME))]
    pub async fn create(&self, input: E::Create, actor: Option<&str>) -> Result<E::Model, ServiceError> {
        let stamp = Stamp::now(actor);
        let at = stamp.clone();
        let active = off_runtime(move || E::new_active(input, &at)).await?;
        let created = active.insert(&self.db).await.map_err(ServiceError::from_db)?;
        info!(actor = ?stamp.actor, "record_created");
        Ok(created)
    }

    /// Merge the provided fields into a live row. `None` when the row is missing or soft-deleted.
    #[instrument(skip(self, input), fields(entity = E::NAME))]
    pub async fn update(&self, id: i32, input: E::Update, actor: Option<&str>) -> Result<Option<E::Model>, ServiceError> {
        let Some(existing) = self.find_live(id).await? else { return Ok(None) };
        let stamp = Stamp::now(actor);
        let mut active = existing.into_active_model();
        let at = stamp.clone();
        let active = off_runtime(move || {
            E::merge(&mut active, input, &at)?;
            Ok(active)
        })
        .await?;
        let updated = active.update(&self.db).await.map_err(ServiceError::from_db)?;
        info!(actor = ?stamp.actor, "record_updated");
        Ok(Some(updated))
    }

    /// Flag a live row deleted; `false` when there was nothing to delete.
    #[instrument(skip(self), fields(entity = E::NAME))]
    pub async fn soft_delete(&self, id: i32, actor: Option<&str>) -> Result<bool, ServiceError> {
        let Some(existing) = self.find_live(id).await? else { return Ok(false) };
        let stamp = Stamp::now(actor);
        let mut active = existing.into_active_model();
        E::mark_deleted(&mut active, &stamp);
        active.update(&self.db).await.map_err(ServiceError::from_db)?;
        info!(actor = ?stamp.actor, "record_deleted");
        Ok(true)
    }

    /// Case-insensitive substring match on any of `fields`. No fields, no matches.
    /// `%` and `_` in `keyword` are matched literally.
    #[instrument(skip(self, fields), fields(entity = E::NAME, field_count = fields.len()))]
    pub async fn search(&self, keyword: &str, fields: &[E::Column]) -> Result<Vec<E::Model>, ServiceError> {
        if fields.is_empty() {
            return Ok(Vec::new());
        }
        let pattern = format!("%{}%", escape_like(&keyword.to_lowercase()));
        let any = fields.iter().fold(Condition::any(), |cond, col| {
            let like = LikeExpr::new(pattern.as_str()).escape('\\');
            cond.add(Expr::expr(Func::lower(Expr::col(*col))).like(like))
        });
        let rows = Self::live()
            .filter(any)
            .order_by_asc(E::id_column())
            .all(&self.db)
            .await
            .map_err(ServiceError::from_db)?;
        debug!(count = rows.len(), "search matched");
        Ok(rows)
    }

    /// One offset/limit window of live rows ordered by primary key.
    #[instrument(skip(self), fields(entity = E::NAME))]
    pub async fn get_page(&self, page: PageQuery) -> Result<Vec<E::Model>, ServiceError> {
        let (skip, limit) = page.normalize();
        let rows = Self::live()
            .order_by_asc(E::id_column())
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(ServiceError::from_db)?;
        Ok(rows)
    }
}
