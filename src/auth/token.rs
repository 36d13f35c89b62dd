use crate::errors::ServiceError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Claim structure for login tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Account id
    pub sub: String,
    pub email: String,
    /// Present for buyer accounts only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and checks HS256 login tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: Arc<str>,
    ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            secret: Arc::from(secret),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token for an account. `user_id` is only set for buyers.
    pub fn issue(
        &self,
        account_id: Uuid,
        email: &str,
        user_id: Option<Uuid>,
    ) -> Result<String, ServiceError> {
        let now = Utc::now();
        let claims = Claims {
            sub: account_id.to_string(),
            email: email.to_string(),
            user_id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?)
    }

    /// Verifies signature and expiry and returns the claims.
    pub fn decode(&self, token: &str) -> Result<Claims, ServiceError> {
        Ok(decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?
        .claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const SECRET: &str = "a_test_signing_secret_with_enough_length_123";

    #[test]
    fn issued_token_carries_identity_and_seven_day_expiry() {
        let issuer = TokenIssuer::new(SECRET, Duration::days(7));
        let id = Uuid::new_v4();
        let token = issuer.issue(id, "a@x.com", Some(id)).unwrap();

        let claims = issuer.decode(&token).unwrap();
        assert_eq!(claims.sub, id.to_string());
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.user_id, Some(id));
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn artist_tokens_have_no_user_id() {
        let issuer = TokenIssuer::new(SECRET, Duration::days(7));
        let token = issuer.issue(Uuid::new_v4(), "a@x.com", None).unwrap();
        assert_eq!(issuer.decode(&token).unwrap().user_id, None);
    }

    #[test]
    fn tampered_or_foreign_tokens_are_rejected() {
        let issuer = TokenIssuer::new(SECRET, Duration::days(7));
        let other = TokenIssuer::new("some_other_secret_that_is_long_enough_456", Duration::days(7));
        let token = other.issue(Uuid::new_v4(), "a@x.com", None).unwrap();
        assert_matches!(issuer.decode(&token), Err(ServiceError::TokenError(_)));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let issuer = TokenIssuer::new(SECRET, Duration::hours(-2));
        let token = issuer.issue(Uuid::new_v4(), "a@x.com", None).unwrap();
        assert_matches!(issuer.decode(&token), Err(ServiceError::TokenError(_)));
    }
}
