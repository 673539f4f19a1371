use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tokio::task;

use configs::PasswordHashConfig;

use crate::errors::ServiceError;

/// Argon2id hasher with a fixed cost factor taken from configuration.
#[derive(Clone, Debug)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    pub fn new(cfg: &PasswordHashConfig) -> Result<Self, ServiceError> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)
            .map_err(|e| ServiceError::Internal(format!("invalid argon2 parameters: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash `password` with a fresh random salt into a PHC string.
    pub async fn hash(&self, password: &str) -> Result<String, ServiceError> {
        let argon = self.argon2();
        let password = password.to_owned();
        task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon.hash_password(password.as_bytes(), &salt).map(|h| h.to_string())
        })
        .await
        .map_err(|e| ServiceError::Internal(format!("hash task failed: {e}")))?
        .map_err(|e| ServiceError::Internal(format!("password hash failed: {e}")))
    }

    /// `Ok(false)` on mismatch; a malformed stored hash is an internal error.
    pub async fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, ServiceError> {
        let argon = self.argon2();
        let password = password.to_owned();
        let stored_hash = stored_hash.to_owned();
        task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&stored_hash)?;
            match argon.verify_password(password.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(password_hash::Error::Password) => Ok(false),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(|e| ServiceError::Internal(format!("verify task failed: {e}")))?
        .map_err(|e| ServiceError::Internal(format!("stored hash unusable: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> CredentialHasher {
        CredentialHasher::new(&PasswordHashConfig { memory_kib: 64, iterations: 1, parallelism: 1 }).unwrap()
    }

    #[tokio::test]
    async fn hash_then_verify() {
        let hasher = cheap();
        let hash = hasher.hash("pw123456").await.unwrap();
        assert_ne!(hash, "pw123456");
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("pw123456", &hash).await.unwrap());
        assert!(!hasher.verify("wrong", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn salts_differ_per_hash() {
        let hasher = cheap();
        let a = hasher.hash("same-password").await.unwrap();
        let b = hasher.hash("same-password").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn malformed_stored_hash_is_internal() {
        let err = cheap().verify("pw123456", "not-a-phc-string").await.unwrap_err();
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[test]
    fn rejects_impossible_params() {
        let err = CredentialHasher::new(&PasswordHashConfig { memory_kib: 1, iterations: 1, parallelism: 1 });
        assert!(err.is_err());
    }
}
