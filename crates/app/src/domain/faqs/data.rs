//! FAQ Data

use storefront::faqs::FaqCategory;

use crate::domain::faqs::records::FaqUuid;

/// New FAQ Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFaq {
    pub uuid: FaqUuid,
    pub category: FaqCategory,
    pub question: String,
    pub answer: String,
    pub display_order: i32,
    pub is_active: bool,
}
