use std::sync::Arc;

use models::password::{hash_password, verify_password};
use models::Role;
use tracing::{debug, info, instrument, warn};

use super::domain::{AuthSession, LoginInput, NewAccount};
use super::errors::AuthError;
use super::repository::AuthRepository;
use super::token::{Claims, TokenCodec};

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    tokens: Arc<TokenCodec>,
}

impl<R: AuthRepository> Clone for AuthService<R> {
    fn clone(&self) -> Self { Self { repo: self.repo.clone(), tokens: self.tokens.clone() } }
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, tokens: Arc<TokenCodec>) -> Self { Self { repo, tokens } }

    /// Verify a username/password pair and issue a bearer token carrying the stored role.
    ///
    /// Unknown, deactivated and soft-deleted users fail the same way as a wrong password.
    ///
    /// # Examples
    /// ```
    /// use models::Role;
    /// use service::auth::{AuthService, TokenCodec, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{LoginInput, NewAccount};
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MockAuthRepository::default()), Arc::new(TokenCodec::new("secret", 3600)));
    /// let admin = NewAccount { username: "root".into(), password: "Passw0rd".into(), email: None, role: Role::Admin };
    /// tokio_test::block_on(svc.ensure_account(&admin)).unwrap();
    /// let session = tokio_test::block_on(svc.login(LoginInput { username: "root".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.role, Role::Admin);
    /// assert_eq!(svc.verify_token(&session.token).unwrap().username, "root");
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_active_user(&input.username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let cred = self.repo
            .get_credentials(user.user_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password = input.password;
        let matched = tokio::task::spawn_blocking(move || verify_password(&password, &cred.password_hash))
            .await
            .map_err(|e| AuthError::HashError(e.to_string()))??;
        if !matched {
            debug!("password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let (token, claims) = self.tokens.issue(&user.username, user.role)?;
        info!(user_id = user.user_id, role = %user.role, "user_logged_in");
        Ok(AuthSession { user, token, expires_at: claims.exp })
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.tokens.verify(token)
    }

    /// Exact role match.
    pub fn authorize(claims: &Claims, required: Role) -> Result<(), AuthError> {
        if claims.role == required {
            Ok(())
        } else {
            warn!(username = %claims.username, have = %claims.role, need = %required, "role_mismatch");
            Err(AuthError::Forbidden)
        }
    }

    /// Create `account` unless a user with that name already exists. Returns whether it was created.
    #[instrument(skip(self, account), fields(username = %account.username))]
    pub async fn ensure_account(&self, account: &NewAccount) -> Result<bool, AuthError> {
        if self.repo.find_active_user(&account.username).await?.is_some() {
            debug!("account already present");
            return Ok(false);
        }
        models::user::validate_password(&account.password)?;
        let password = account.password.clone();
        let hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AuthError::HashError(e.to_string()))??;
        match self.repo.create_user(account, hash).await {
            Ok(user) => {
                info!(user_id = user.user_id, role = %user.role, "account_bootstrapped");
                Ok(true)
            }
            // present but inactive or soft-deleted
            Err(AuthError::Conflict) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
