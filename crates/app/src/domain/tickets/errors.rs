//! Support ticket service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use storefront::{ErrorKind as Kind, tickets::TicketError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TicketsServiceError {
    #[error("ticket not found")]
    NotFound,

    #[error("could not allocate a unique ticket number")]
    NumberExhausted,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error(transparent)]
    Ticket(#[from] TicketError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl TicketsServiceError {
    /// Caller-facing classification.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::NotFound => Kind::NotFound,
            Self::MissingRequiredData | Self::InvalidData => Kind::Validation,
            Self::Ticket(error) => error.kind(),
            Self::NumberExhausted | Self::Sql(_) => Kind::Storage,
        }
    }
}

impl From<Error> for TicketsServiceError {
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
