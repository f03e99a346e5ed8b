//! Record capability shared by every CRUD-exposed entity.
//!
//! An entity opts into the generic record service by naming its key, soft-delete and
//! search columns, the payloads it accepts and returns, and by spelling out which
//! fields a create or update may touch. Nothing is assigned by field name at runtime.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::ModelError;

/// Who performed a write and when.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamp {
    pub actor: Option<String>,
    pub at: DateTimeWithTimeZone,
}

impl Stamp {
    pub fn now(actor: Option<&str>) -> Self {
        Self { actor: actor.map(str::to_owned), at: Utc::now().into() }
    }
}

pub trait RecordEntity: EntityTrait + Send + Sync + 'static {
    /// Body accepted by create.
    type Create: DeserializeOwned + Send + 'static;
    /// Body accepted by update; every field optional.
    type Update: DeserializeOwned + Send + 'static;
    /// Public view of a stored row.
    type Output: Serialize + From<Self::Model> + Send + 'static;

    /// Short name used in logs and error messages.
    const NAME: &'static str;

    /// Integer primary key column.
    fn id_column() -> Self::Column;

    fn is_deleted_column() -> Self::Column;

    /// Columns scanned by keyword search. Empty disables search.
    fn search_columns() -> Vec<Self::Column>;

    /// Validate `input` and build an unsaved row with fresh audit fields.
    fn new_active(input: Self::Create, stamp: &Stamp) -> Result<Self::ActiveModel, ModelError>;

    /// Apply the fields present in `input` and stamp `updated_*`.
    fn merge(active: &mut Self::ActiveModel, input: Self::Update, stamp: &Stamp) -> Result<(), ModelError>;

    /// Flag the row deleted and stamp `updated_*`.
    fn mark_deleted(active: &mut Self::ActiveModel, stamp: &Stamp);
}
