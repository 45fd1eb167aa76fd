//! Products Data

use crate::domain::products::records::ProductUuid;

/// New Product Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub price: Option<u64>,
    pub category: Option<String>,
    pub short_description: String,
    pub brief_description: String,
    pub brand: String,
    pub sku: i64,
}
