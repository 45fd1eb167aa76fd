//! Contact service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use storefront::ErrorKind as Kind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContactServiceError {
    #[error("message not found")]
    NotFound,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl ContactServiceError {
    /// Caller-facing classification.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::NotFound => Kind::NotFound,
            Self::MissingRequiredData => Kind::Validation,
            Self::Sql(_) => Kind::Storage,
        }
    }
}

impl From<Error> for ContactServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
