//! Cart Records

use jiff::Timestamp;
use storefront::cart::{CartTotals, PricedLine, Quantity};

use crate::{
    domain::{products::records::ProductUuid, users::records::UserUuid},
    uuids::TypedUuid,
};

/// Cart Line UUID
pub type CartLineUuid = TypedUuid<CartLineRecord>;

/// Cart Line Record
#[derive(Debug, Clone)]
pub struct CartLineRecord {
    pub uuid: CartLineUuid,
    pub user_uuid: UserUuid,
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub product_price: Option<u64>,
    pub quantity: Quantity,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PricedLine for CartLineRecord {
    fn unit_price(&self) -> Option<u64> {
        self.product_price
    }

    fn quantity(&self) -> Quantity {
        self.quantity
    }
}

/// Ownership of a locked cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CartLineOwner {
    pub uuid: CartLineUuid,
    pub user_uuid: UserUuid,
    pub product_uuid: ProductUuid,
}

/// A user's cart: lines in the order they were added, plus totals.
#[derive(Debug, Clone)]
pub struct CartSummary {
    pub lines: Vec<CartLineRecord>,
    pub totals: CartTotals,
}
