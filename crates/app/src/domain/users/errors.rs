//! Users service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use storefront::ErrorKind as Kind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UsersServiceError {
    #[error("username already taken")]
    AlreadyExists,

    #[error("user not found")]
    NotFound,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl UsersServiceError {
    /// Caller-facing classification.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::NotFound => Kind::NotFound,
            Self::AlreadyExists | Self::MissingRequiredData | Self::InvalidData => {
                Kind::Validation
            }
            Self::Sql(_) => Kind::Storage,
        }
    }
}

impl From<Error> for UsersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let error = UsersServiceError::from(Error::RowNotFound);

        assert!(matches!(error, UsersServiceError::NotFound));
        assert_eq!(error.kind(), Kind::NotFound);
    }

    #[test]
    fn pool_failures_are_storage_errors() {
        let error = UsersServiceError::from(Error::PoolTimedOut);

        assert_eq!(error.kind(), Kind::Storage);
    }
}
