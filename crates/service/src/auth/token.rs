//! HS256 bearer tokens carrying the username and stored role.

use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use models::Role;
use serde::{Deserialize, Serialize};

use super::errors::AuthError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub role: Role,
    /// issued at, unix seconds
    pub iat: i64,
    /// expiry, unix seconds
    pub exp: i64,
}

/// Signs and verifies tokens with one shared secret.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl TokenCodec {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
        }
    }

    /// Claims for `username` valid from now for the configured TTL.
    pub fn claims_for(&self, username: &str, role: Role) -> Claims {
        let iat = Utc::now().timestamp();
        let exp = iat.saturating_add(i64::try_from(self.ttl_secs).unwrap_or(i64::MAX));
        Claims { username: username.to_string(), role, iat, exp }
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding).map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Issue a fresh token; returns it with the claims it carries.
    ///
    /// # Examples
    /// ```
    /// use models::Role;
    /// use service::auth::TokenCodec;
    /// let codec = TokenCodec::new("secret", 3600);
    /// let (token, claims) = codec.issue("alice", Role::Staff).unwrap();
    /// assert_eq!(codec.verify(&token).unwrap(), claims);
    /// ```
    pub fn issue(&self, username: &str, role: Role) -> Result<(String, Claims), AuthError> {
        let claims = self.claims_for(username, role);
        let token = self.encode(&claims)?;
        Ok((token, claims))
    }

    /// Expired tokens map to `Expired`; any other failure is `InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_keeps_username_and_role() {
        let codec = TokenCodec::new("k", 60);
        let (token, claims) = codec.issue("bob", Role::Manager).unwrap();
        let back = codec.verify(&token).unwrap();
        assert_eq!(back.username, "bob");
        assert_eq!(back.role, Role::Manager);
        assert_eq!(back.exp - back.iat, 60);
        assert_eq!(back, claims);
    }

    #[test]
    fn default_ttl_is_three_days() {
        let codec = TokenCodec::new("k", 259_200);
        let claims = codec.claims_for("a", Role::User);
        assert_eq!(claims.exp - claims.iat, 3 * 24 * 60 * 60);
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = TokenCodec::new("k", 60);
        let now = Utc::now().timestamp();
        let stale = Claims { username: "bob".into(), role: Role::User, iat: now - 7200, exp: now - 3600 };
        let token = codec.encode(&stale).unwrap();
        assert!(matches!(codec.verify(&token), Err(AuthError::Expired)));
    }

    #[test]
    fn wrong_secret_or_garbage_is_invalid() {
        let (token, _) = TokenCodec::new("one", 60).issue("bob", Role::User).unwrap();
        assert!(matches!(TokenCodec::new("two", 60).verify(&token), Err(AuthError::InvalidToken)));
        assert!(matches!(TokenCodec::new("one", 60).verify("not.a.jwt"), Err(AuthError::InvalidToken)));
    }
}
