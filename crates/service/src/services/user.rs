use std::sync::Arc;

use tracing::{debug, field, info, instrument, warn, Span};

use models::errors::ModelError;

use crate::auth::{CredentialHasher, TokenIssuer};
use crate::domain::{IssuedToken, User};
use crate::errors::ServiceError;
use crate::ident::RawId;
use crate::include::Include;
use crate::input::{LoginInput, UserInput};
use crate::repository::UserRepository;

/// User lifecycle and authentication.
pub struct UserService<R: UserRepository> {
    repo: Arc<R>,
    hasher: CredentialHasher,
    tokens: TokenIssuer,
}

/// A unique violation on the user table can only be the email index.
fn email_conflict(e: ModelError, email: &str) -> ServiceError {
    match e {
        ModelError::UniqueViolation(_) => ServiceError::DuplicateEmail(email.to_string()),
        other => other.into(),
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: Arc<R>, hasher: CredentialHasher, tokens: TokenIssuer) -> Self {
        Self { repo, hasher, tokens }
    }

    /// Every user; an empty store is `EmptyCollection`, not an empty list.
    #[instrument(skip_all)]
    pub async fn list_all(&self, include: &Include) -> Result<Vec<User>, ServiceError> {
        let users = self.repo.find_all(include).await?;
        if users.is_empty() {
            return Err(ServiceError::EmptyCollection("users"));
        }
        Ok(users)
    }

    #[instrument(skip_all, fields(user_id = field::Empty))]
    pub async fn get_by_id(&self, id: impl Into<RawId>, include: &Include) -> Result<User, ServiceError> {
        let id = id.into().parse()?;
        Span::current().record("user_id", id);
        self.repo.find_by_id(id, include).await?.ok_or_else(|| {
            debug!("user_not_found");
            ServiceError::not_found("user", id)
        })
    }

    #[instrument(skip(self))]
    pub async fn get_by_email(&self, email: &str) -> Result<User, ServiceError> {
        self.repo.find_by_email(email).await?.ok_or_else(|| {
            debug!("user_not_found");
            ServiceError::NotFound(format!("user with email {email} does not exist"))
        })
    }

    /// Register a user, storing only the hash of the password.
    ///
    /// # Examples
    /// ```
    /// use service::repository::memory::MemoryStore;
    /// use service::services::UserService;
    /// use service::auth::{CredentialHasher, TokenIssuer};
    /// use service::input::UserInput;
    /// use configs::{AuthConfig, PasswordHashConfig};
    /// use std::sync::Arc;
    ///
    /// let cfg = AuthConfig {
    ///     jwt_secret: "secret".into(),
    ///     password: PasswordHashConfig { memory_kib: 64, iterations: 1, parallelism: 1 },
    ///     ..AuthConfig::default()
    /// };
    /// let store = MemoryStore::new();
    /// let svc = UserService::new(Arc::new(store.users()), CredentialHasher::new(&cfg.password).unwrap(), TokenIssuer::new(&cfg));
    /// let input = UserInput {
    ///     first_name: "Ada".into(), last_name: "Lovelace".into(), email: "ada@example.com".into(),
    ///     password: "Secret123".into(), todos_ids: vec![], habits_ids: vec![], deadlines_ids: vec![],
    /// };
    /// let user = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(user.email, "ada@example.com");
    /// assert_ne!(user.password_hash, "Secret123");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create(&self, input: UserInput) -> Result<User, ServiceError> {
        let links = input.validate()?;
        match self.get_by_email(&input.email).await {
            Ok(_) => {
                debug!("email already registered");
                return Err(ServiceError::DuplicateEmail(input.email));
            }
            Err(ServiceError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let hash = self.hasher.hash(&input.password).await?;
        let email = input.email.clone();
        let user = self
            .repo
            .create(input.into_draft(hash, links))
            .await
            .map_err(|e| email_conflict(e, &email))?;
        info!(user_id = user.id, email = %user.email, "user_created");
        Ok(user)
    }

    /// Replace every field of an existing user; the password is always re-hashed.
    #[instrument(skip_all, fields(user_id = field::Empty))]
    pub async fn update(&self, id: impl Into<RawId>, input: UserInput) -> Result<User, ServiceError> {
        let id = id.into().parse()?;
        Span::current().record("user_id", id);
        let links = input.validate()?;
        self.get_by_id(id, &Include::none()).await?;

        let hash = self.hasher.hash(&input.password).await?;
        let email = input.email.clone();
        let user = self
            .repo
            .update(id, input.into_draft(hash, links))
            .await
            .map_err(|e| email_conflict(e, &email))?;
        info!(user_id = user.id, "user_updated");
        Ok(user)
    }

    /// Physically delete a user and return its last snapshot. Children go with
    /// it through the storage cascade.
    #[instrument(skip_all, fields(user_id = field::Empty))]
    pub async fn delete(&self, id: impl Into<RawId>) -> Result<User, ServiceError> {
        let id = id.into().parse()?;
        Span::current().record("user_id", id);
        let existing = self.get_by_id(id, &Include::none()).await?;
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("user", id));
        }
        info!("user_deleted");
        Ok(existing)
    }

    /// Check an email/password pair and issue a bearer token.
    ///
    /// # Examples
    /// ```
    /// use service::repository::memory::MemoryStore;
    /// use service::services::UserService;
    /// use service::auth::{CredentialHasher, TokenIssuer};
    /// use service::input::{LoginInput, UserInput};
    /// use configs::{AuthConfig, PasswordHashConfig};
    /// use std::sync::Arc;
    ///
    /// let cfg = AuthConfig {
    ///     jwt_secret: "secret".into(),
    ///     password: PasswordHashConfig { memory_kib: 64, iterations: 1, parallelism: 1 },
    ///     ..AuthConfig::default()
    /// };
    /// let tokens = TokenIssuer::new(&cfg);
    /// let svc = UserService::new(Arc::new(MemoryStore::new().users()), CredentialHasher::new(&cfg.password).unwrap(), tokens.clone());
    /// let _ = tokio_test::block_on(svc.create(UserInput {
    ///     first_name: "A".into(), last_name: "B".into(), email: "u@e.com".into(),
    ///     password: "Passw0rd".into(), todos_ids: vec![], habits_ids: vec![], deadlines_ids: vec![],
    /// }));
    /// let issued = tokio_test::block_on(svc.authenticate(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(tokens.verify(&issued.token).unwrap().sub, "u@e.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn authenticate(&self, input: LoginInput) -> Result<IssuedToken, ServiceError> {
        let user = self.get_by_email(&input.email).await?;
        if !self.hasher.verify(&input.password, &user.password_hash).await? {
            warn!(user_id = user.id, "invalid_credentials");
            return Err(ServiceError::InvalidCredentials);
        }
        let issued = self.tokens.issue(&user.email).await?;
        info!(user_id = user.id, expires_at = %issued.expires_at, "user_authenticated");
        Ok(issued)
    }
}
