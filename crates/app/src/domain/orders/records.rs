//! Order Records

use jiff::Timestamp;
use rust_decimal::Decimal;
use storefront::orders::{OrderLifecycle, OrderStatus, format_order_number, total_amount};

use crate::{
    domain::{products::records::ProductUuid, users::records::UserUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Record
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub order_id: i64,
    pub user_uuid: UserUuid,
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub product_price: Option<u64>,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub confirmed_at: Option<Timestamp>,
    pub shipped_at: Option<Timestamp>,
    pub delivered_at: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,
    pub refunded_at: Option<Timestamp>,
}

impl OrderRecord {
    /// Customer-facing order number, e.g. `RP-0042`.
    #[must_use]
    pub fn order_number(&self) -> String {
        format_order_number(self.order_id)
    }

    /// Amount charged: the product's unit price, or zero when unpriced.
    #[must_use]
    pub fn total_amount(&self) -> u64 {
        total_amount(self.product_price)
    }

    #[must_use]
    pub const fn lifecycle(&self) -> OrderLifecycle {
        OrderLifecycle {
            status: self.status,
            created_at: self.created_at,
            confirmed_at: self.confirmed_at,
            shipped_at: self.shipped_at,
            delivered_at: self.delivered_at,
            cancelled_at: self.cancelled_at,
            refunded_at: self.refunded_at,
        }
    }

    /// Hours from placement until the order finished, or until `now`.
    #[must_use]
    pub fn processing_time(&self, now: Timestamp) -> Decimal {
        self.lifecycle().processing_time(now)
    }
}
