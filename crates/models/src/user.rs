use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ModelError;
use crate::password::hash_password;
use crate::record::{RecordEntity, Stamp};
use crate::role::Role;

/// Stored user. Not `Serialize`; responses go through [`UserOut`].
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub user_id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    #[sea_orm(unique)]
    pub email: Option<String>,
    pub role: Role,
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
pub struct UserCreate {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
}

/// Absent field: `None`. Explicit `null`: `Some(None)`.
fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub username: Option<String>,
    /// `null` clears the stored email.
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Option<String>>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserOut {
    pub user_id: i32,
    pub username: String,
    pub email: Option<String>,
    pub role: Role,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub is_active: bool,
}

impl From<Model> for UserOut {
    fn from(m: Model) -> Self {
        Self {
            user_id: m.user_id,
            username: m.username,
            email: m.email,
            role: m.role,
            created_at: m.created_at,
            updated_at: m.updated_at,
            created_by: m.created_by,
            updated_by: m.updated_by,
            is_active: m.is_active,
        }
    }
}

pub fn validate_username(username: &str) -> Result<(), ModelError> {
    let len = username.chars().count();
    if !(3..=50).contains(&len) {
        return Err(ModelError::Validation("username must be 3-50 characters".into()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ModelError> {
    let len = password.chars().count();
    if !(6..=128).contains(&len) {
        return Err(ModelError::Validation("password must be 6-128 characters".into()));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if email.chars().count() > 100 {
        return Err(ModelError::Validation("email too long (<=100)".into()));
    }
    if !email.contains('@') {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

impl RecordEntity for Entity {
    type Create = UserCreate;
    type Update = UserUpdate;
    type Output = UserOut;

    const NAME: &'static str = "user";

    fn id_column() -> Column { Column::UserId }

    fn is_deleted_column() -> Column { Column::IsDeleted }

    fn search_columns() -> Vec<Column> { vec![Column::Username, Column::Email] }

    fn new_active(input: UserCreate, stamp: &Stamp) -> Result<ActiveModel, ModelError> {
        validate_username(&input.username)?;
        validate_password(&input.password)?;
        if let Some(email) = &input.email { validate_email(email)?; }
        let password_hash = hash_password(&input.password)?;
        Ok(ActiveModel {
            username: Set(input.username),
            password_hash: Set(password_hash),
            email: Set(input.email),
            role: Set(input.role),
            created_at: Set(stamp.at),
            updated_at: Set(None),
            created_by: Set(stamp.actor.clone()),
            updated_by: Set(None),
            is_deleted: Set(false),
            is_active: Set(true),
            ..Default::default()
        })
    }

    fn merge(active: &mut ActiveModel, input: UserUpdate, stamp: &Stamp) -> Result<(), ModelError> {
        if let Some(username) = input.username {
            validate_username(&username)?;
            active.username = Set(username);
        }
        match input.email {
            Some(Some(email)) => {
                validate_email(&email)?;
                active.email = Set(Some(email));
            }
            Some(None) => active.email = Set(None),
            None => {}
        }
        if let Some(password) = input.password {
            validate_password(&password)?;
            active.password_hash = Set(hash_password(&password)?);
        }
        if let Some(role) = input.role { active.role = Set(role); }
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
