//! Carts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use storefront::{ErrorKind as Kind, cart::CartError, identity::AuthenticationRequired};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error(transparent)]
    AuthenticationRequired(#[from] AuthenticationRequired),

    #[error("cart line belongs to another user")]
    PermissionDenied,

    #[error("cart line or product not found")]
    NotFound,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl CartsServiceError {
    /// Caller-facing classification.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::AuthenticationRequired(_) => Kind::AuthenticationRequired,
            Self::PermissionDenied => Kind::PermissionDenied,
            Self::NotFound => Kind::NotFound,
            Self::MissingRequiredData | Self::InvalidData => Kind::Validation,
            Self::Cart(error) => error.kind(),
            Self::Sql(_) => Kind::Storage,
        }
    }
}

impl From<Error> for CartsServiceError {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_callers_need_authentication() {
        let error = CartsServiceError::from(AuthenticationRequired);

        assert_eq!(error.kind(), Kind::AuthenticationRequired);
        assert_eq!(error.to_string(), "authentication required");
    }

    #[test]
    fn quantity_errors_are_validation_errors() {
        let error = CartsServiceError::from(CartError::InvalidQuantity(0));

        assert_eq!(error.kind(), Kind::Validation);
    }
}
