use async_trait::async_trait;

use super::domain::{AuthUser, Credentials, NewAccount};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Only users that are neither soft-deleted nor deactivated.
    async fn find_active_user(&self, username: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn get_credentials(&self, user_id: i32) -> Result<Option<Credentials>, AuthError>;
    async fn create_user(&self, user: &NewAccount, password_hash: String) -> Result<AuthUser, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<String, (AuthUser, bool)>>, // key: username, flag: active
        creds: Mutex<HashMap<i32, Credentials>>,         // key: user_id
    }

    impl MockAuthRepository {
        pub fn deactivate(&self, username: &str) {
            if let Ok(mut users) = self.users.lock() {
                if let Some(entry) = users.get_mut(username) {
                    entry.1 = false;
                }
            }
        }
    }

    fn poisoned<T>(_: T) -> AuthError { AuthError::Repository("mock lock poisoned".into()) }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_active_user(&self, username: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().map_err(poisoned)?;
            Ok(users.get(username).filter(|(_, active)| *active).map(|(u, _)| u.clone()))
        }

        async fn get_credentials(&self, user_id: i32) -> Result<Option<Credentials>, AuthError> {
            let creds = self.creds.lock().map_err(poisoned)?;
            Ok(creds.get(&user_id).cloned())
        }

        async fn create_user(&self, user: &NewAccount, password_hash: String) -> Result<AuthUser, AuthError> {
            let mut users = self.users.lock().map_err(poisoned)?;
            if users.contains_key(&user.username) {
                return Err(AuthError::Conflict);
            }
            let created = AuthUser { user_id: users.len() as i32 + 1, username: user.username.clone(), role: user.role };
            users.insert(user.username.clone(), (created.clone(), true));
            let mut creds = self.creds.lock().map_err(poisoned)?;
            creds.insert(created.user_id, Credentials { user_id: created.user_id, password_hash });
            Ok(created)
        }
    }
}
