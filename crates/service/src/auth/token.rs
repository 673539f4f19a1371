use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tokio::task;
use uuid::Uuid;

use configs::AuthConfig;

use crate::domain::IssuedToken;
use crate::errors::ServiceError;

/// Registered claims carried by an issued token. No role or permission claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User email
    pub sub: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// HS256 signer/verifier for bearer tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(cfg: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
            issuer: cfg.jwt_issuer.clone(),
            ttl: Duration::hours(cfg.jwt_expires_hours),
        }
    }

    /// Sign a token for `subject` valid for the configured window.
    pub async fn issue(&self, subject: &str) -> Result<IssuedToken, ServiceError> {
        let now = Utc::now();
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: subject.to_owned(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        let key = self.encoding.clone();
        let token = task::spawn_blocking(move || encode(&Header::new(Algorithm::HS256), &claims, &key))
            .await
            .map_err(|e| ServiceError::Internal(format!("token task failed: {e}")))?
            .map_err(|e| ServiceError::Internal(format!("token signing failed: {e}")))?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Check signature, issuer and expiry; any failure is `InvalidCredentials`.
    pub fn verify(&self, token: &str) -> Result<Claims, ServiceError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| ServiceError::InvalidCredentials)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.issuer)
            .field("ttl_hours", &self.ttl.num_hours())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(secret: &str, issuer: &str, hours: i64) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.into(),
            jwt_issuer: issuer.into(),
            jwt_expires_hours: hours,
            ..AuthConfig::default()
        }
    }

    #[tokio::test]
    async fn issued_token_verifies_with_claims() {
        let issuer = TokenIssuer::new(&cfg("s3cret", "lifeboard", 8));
        let issued = issuer.issue("a@x.com").await.unwrap();
        assert!(!issued.token.is_empty());

        let claims = issuer.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.iss, "lifeboard");
        assert_eq!(claims.exp, issued.expires_at.timestamp());
        assert_eq!(claims.exp - claims.iat, 8 * 3600);
    }

    #[tokio::test]
    async fn each_token_has_its_own_id() {
        let issuer = TokenIssuer::new(&cfg("s3cret", "lifeboard", 1));
        let a = issuer.verify(&issuer.issue("a@x.com").await.unwrap().token).unwrap();
        let b = issuer.verify(&issuer.issue("a@x.com").await.unwrap().token).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[tokio::test]
    async fn foreign_secret_or_issuer_is_rejected() {
        let token = TokenIssuer::new(&cfg("one", "lifeboard", 1)).issue("a@x.com").await.unwrap().token;
        let other_secret = TokenIssuer::new(&cfg("two", "lifeboard", 1));
        assert!(matches!(other_secret.verify(&token), Err(ServiceError::InvalidCredentials)));
        let other_issuer = TokenIssuer::new(&cfg("one", "elsewhere", 1));
        assert!(other_issuer.verify(&token).is_err());
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        // beyond the default 60s leeway
        let issuer = TokenIssuer::new(&cfg("s3cret", "lifeboard", -1));
        let token = issuer.issue("a@x.com").await.unwrap().token;
        assert!(issuer.verify(&token).is_err());
    }
}
