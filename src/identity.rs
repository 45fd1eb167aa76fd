//! Identity

use thiserror::Error;

/// The caller of an operation, as supplied by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Identity<U> {
    /// No authenticated user.
    Anonymous,

    /// An authenticated user.
    User(U),
}

/// Returned when a mutating operation is attempted anonymously.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("authentication required")]
pub struct AuthenticationRequired;

impl<U> Identity<U> {
    /// The authenticated user, or [`AuthenticationRequired`] for anonymous callers.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationRequired`] when the identity is anonymous.
    pub fn require_user(self) -> Result<U, AuthenticationRequired> {
        match self {
            Self::User(user) => Ok(user),
            Self::Anonymous => Err(AuthenticationRequired),
        }
    }

    /// The authenticated user, if any.
    pub fn user(self) -> Option<U> {
        match self {
            Self::User(user) => Some(user),
            Self::Anonymous => None,
        }
    }

    /// Whether no user is attached.
    pub const fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }
}

impl<U> From<Option<U>> for Identity<U> {
    fn from(user: Option<U>) -> Self {
        user.map_or(Self::Anonymous, Self::User)
    }
}
