//! Product Records

use jiff::Timestamp;
use storefront::catalog::{PriceError, display_price};

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub price: Option<u64>,
    pub category: Option<String>,
    pub short_description: String,
    pub brief_description: String,
    pub brand: String,
    pub sku: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProductRecord {
    /// Price formatted in the store currency; `None` when unpriced.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] when the price cannot be represented.
    pub fn display_price(&self) -> Result<Option<String>, PriceError> {
        display_price(self.price)
    }
}
