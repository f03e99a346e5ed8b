use models::user;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr};

use crate::auth::domain::{AuthUser, Credentials, NewAccount};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAuthRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_active_user(&self, username: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .filter(user::Column::IsDeleted.eq(false))
            .filter(user::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|u| AuthUser { user_id: u.user_id, username: u.username, role: u.role }))
    }

    async fn get_credentials(&self, user_id: i32) -> Result<Option<Credentials>, AuthError> {
        let res = user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|u| Credentials { user_id: u.user_id, password_hash: u.password_hash }))
    }

    async fn create_user(&self, account: &NewAccount, password_hash: String) -> Result<AuthUser, AuthError> {
        user::validate_username(&account.username)?;
        if let Some(email) = &account.email {
            user::validate_email(email)?;
        }
        let am = user::ActiveModel {
            username: Set(account.username.clone()),
            password_hash: Set(password_hash),
            email: Set(account.email.clone()),
            role: Set(account.role),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
            created_by: Set(Some("system".into())),
            updated_by: Set(None),
            is_deleted: Set(false),
            is_active: Set(true),
            ..Default::default()
        };
        let created = am.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AuthError::Conflict,
            _ => AuthError::Repository(e.to_string()),
        })?;
        Ok(AuthUser { user_id: created.user_id, username: created.username, role: created.role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use models::Role;

    fn account(name: &str) -> NewAccount {
        NewAccount { username: name.into(), password: "unused".into(), email: None, role: Role::Admin }
    }

    #[tokio::test]
    async fn create_then_find() -> Result<(), anyhow::Error> {
        let repo = SeaOrmAuthRepository::new(get_db().await?);
        let created = repo.create_user(&account("root"), "$argon2id$x".into()).await?;
        let found = repo.find_active_user("root").await?.expect("user");
        assert_eq!(found, created);
        let creds = repo.get_credentials(created.user_id).await?.expect("creds");
        assert_eq!(creds.password_hash, "$argon2id$x");
        assert!(matches!(repo.create_user(&account("root"), "h".into()).await, Err(AuthError::Conflict)));
        Ok(())
    }

    #[tokio::test]
    async fn soft_deleted_users_are_invisible() -> Result<(), anyhow::Error> {
        let repo = SeaOrmAuthRepository::new(get_db().await?);
        let created = repo.create_user(&account("ghost"), "h".into()).await?;
        let row = user::Entity::find_by_id(created.user_id).one(&repo.db).await?.expect("row");
        let mut am: user::ActiveModel = row.into();
        am.is_deleted = Set(true);
        am.update(&repo.db).await?;
        assert!(repo.find_active_user("ghost").await?.is_none());
        Ok(())
    }
}
