//! Contact Message Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Contact Message UUID
pub type ContactMessageUuid = TypedUuid<ContactMessageRecord>;

/// Contact Message Record
#[derive(Debug, Clone)]
pub struct ContactMessageRecord {
    pub uuid: ContactMessageUuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}
