//! FAQ Records

use jiff::Timestamp;
use storefront::faqs::{FaqCategory, FaqCounters};

use crate::uuids::TypedUuid;

/// FAQ UUID
pub type FaqUuid = TypedUuid<FaqRecord>;

/// FAQ Record
#[derive(Debug, Clone)]
pub struct FaqRecord {
    pub uuid: FaqUuid,
    pub category: FaqCategory,
    pub question: String,
    pub answer: String,
    pub display_order: i32,
    pub is_active: bool,
    pub counters: FaqCounters,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
