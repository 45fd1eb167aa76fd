//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use storefront::{ErrorKind as Kind, identity::AuthenticationRequired, orders::OrderTransitionError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error(transparent)]
    AuthenticationRequired(#[from] AuthenticationRequired),

    #[error("cart line belongs to another user")]
    PermissionDenied,

    #[error("order, product or cart line not found")]
    NotFound,

    #[error("cart is empty")]
    EmptyCart,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error(transparent)]
    Transition(#[from] OrderTransitionError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl OrdersServiceError {
    /// Caller-facing classification.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::AuthenticationRequired(_) => Kind::AuthenticationRequired,
            Self::PermissionDenied => Kind::PermissionDenied,
            Self::NotFound => Kind::NotFound,
            Self::EmptyCart | Self::MissingRequiredData | Self::InvalidData => Kind::Validation,
            Self::Transition(error) => error.kind(),
            Self::Sql(_) => Kind::Storage,
        }
    }
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::NotFound,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
