use models::errors::ModelError;
use thiserror::Error;
use tracing::error;

/// Failure taxonomy of every domain service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid identifier: {0:?} is not an integer")]
    InvalidIdentifier(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("no {0} found")]
    EmptyCollection(&'static str),
    #[error("user with email {0} is already registered")]
    DuplicateEmail(String),
    #[error("user {user_id} is already associated with exercise {exercise_id}")]
    DuplicateAssociation { user_id: i64, exercise_id: i64 },
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("storage failure, see server log for details")]
    Storage,
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(entity: &str, key: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{entity} {key} does not exist"))
    }

    /// Log the underlying detail and hand the caller a generic failure.
    pub fn storage(detail: impl std::fmt::Display) -> Self {
        error!(error = %detail, "storage_failure");
        Self::Storage
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::InvalidIdentifier(_) => 2001,
            ServiceError::Validation(_) => 2002,
            ServiceError::NotFound(_) => 2003,
            ServiceError::EmptyCollection(_) => 2004,
            ServiceError::DuplicateEmail(_) => 2005,
            ServiceError::DuplicateAssociation { .. } => 2006,
            ServiceError::InvalidCredentials => 2101,
            ServiceError::Storage => 2200,
            ServiceError::Internal(_) => 2300,
        }
    }

    /// Status the HTTP boundary renders: authentication failures are the only
    /// kind that differs from the generic failure status.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::InvalidCredentials => 401,
            _ => 500,
        }
    }
}

/// Default mapping; operations that give a constraint a domain meaning
/// (email, association pair) match on `ModelError` before falling back here.
impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ServiceError::Validation(msg),
            ModelError::NotFound(msg) => ServiceError::NotFound(msg),
            ModelError::ForeignKeyViolation(msg) => {
                ServiceError::NotFound(format!("referenced row does not exist ({msg})"))
            }
            other @ (ModelError::UniqueViolation(_) | ModelError::Db(_)) => ServiceError::storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_credentials_map_to_unauthorized() {
        assert_eq!(ServiceError::InvalidCredentials.http_status(), 401);
        assert_eq!(ServiceError::Storage.http_status(), 500);
        assert_eq!(ServiceError::not_found("user", 3).http_status(), 500);
    }

    #[test]
    fn storage_message_hides_detail() {
        let e: ServiceError = ModelError::Db("connection reset by peer".into()).into();
        assert!(matches!(e, ServiceError::Storage));
        assert!(!e.to_string().contains("peer"));
    }

    #[test]
    fn codes_are_distinct() {
        let all = [
            ServiceError::InvalidIdentifier("x".into()),
            ServiceError::Validation("x".into()),
            ServiceError::NotFound("x".into()),
            ServiceError::EmptyCollection("users"),
            ServiceError::DuplicateEmail("a@x.com".into()),
            ServiceError::DuplicateAssociation { user_id: 1, exercise_id: 2 },
            ServiceError::InvalidCredentials,
            ServiceError::Storage,
            ServiceError::Internal("x".into()),
        ];
        let mut codes: Vec<u16> = all.iter().map(ServiceError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }
}
