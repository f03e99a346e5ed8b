use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::record::{RecordEntity, Stamp};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "todo")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub todo_id: i32,
    pub name: String,
    pub description: String,
    pub complete: bool,
    pub deadline: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub is_deleted: bool,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoCreate {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub complete: bool,
    pub deadline: DateTimeWithTimeZone,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub complete: Option<bool>,
    pub deadline: Option<DateTimeWithTimeZone>,
    pub is_active: Option<bool>,
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    Ok(())
}

impl RecordEntity for Entity {
    type Create = TodoCreate;
    type Update = TodoUpdate;
    type Output = Model;

    const NAME: &'static str = "todo";

    fn id_column() -> Column { Column::TodoId }

    fn is_deleted_column() -> Column { Column::IsDeleted }

    fn search_columns() -> Vec<Column> { vec![Column::Name, Column::Description] }

    fn new_active(input: TodoCreate, stamp: &Stamp) -> Result<ActiveModel, ModelError> {
        validate_name(&input.name)?;
        Ok(ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            complete: Set(input.complete),
            deadline: Set(input.deadline),
            created_at: Set(stamp.at),
            updated_at: Set(None),
            created_by: Set(stamp.actor.clone()),
            updated_by: Set(None),
            is_deleted: Set(false),
            is_active: Set(true),
            ..Default::default()
        })
    }

    fn merge(active: &mut ActiveModel, input: TodoUpdate, stamp: &Stamp) -> Result<(), ModelError> {
        if let Some(name) = input.name {
            validate_name(&name)?;
            active.name = Set(name);
        }
        if let Some(description) = input.description { active.description = Set(description); }
        if let Some(complete) = input.complete { active.complete = Set(complete); }
        if let Some(deadline) = input.deadline { active.deadline = Set(deadline); }
        if let Some(is_active) = input.is_active { active.is_active = Set(is_active); }
        active.updated_at = Set(Some(stamp.at));
        active.updated_by = Set(stamp.actor.clone());
        Ok(())
    }

    fn mark_deleted(active: &mut ActiveModel, stamp: &Stamp) {
        active.is_deleted = Set(true);
        active.updated_at = Set(Some(stamp.at));
        active.updated_by = Set(stamp.actor.clone());
    }
}
