//! FAQs service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use storefront::ErrorKind as Kind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FaqsServiceError {
    #[error("faq already exists")]
    AlreadyExists,

    #[error("faq not found")]
    NotFound,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl FaqsServiceError {
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

impl From<Error> for FaqsServiceError {
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
