//! User Records

use jiff::Timestamp;
use storefront::identity::Identity;

use crate::uuids::TypedUuid;

/// User UUID
pub type UserUuid = TypedUuid<UserRecord>;

/// The caller of a customer-facing operation.
pub type UserIdentity = Identity<UserUuid>;

/// User Record
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub uuid: UserUuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub mobile_no: String,
    pub bio: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserRecord {
    /// First and last name joined for display.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Identity used when this user acts on their own cart, orders or tickets.
    #[must_use]
    pub const fn identity(&self) -> UserIdentity {
        Identity::User(self.uuid)
    }
}
