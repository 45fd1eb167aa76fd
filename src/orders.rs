//! Orders
//!
//! Order status state machine:
//!
//! ```text
//! pending -> confirmed -> processing -> shipped -> delivered
//! pending | confirmed | processing -> cancelled
//! any state except refunded -> refunded
//! ```
//!
//! `delivered`, `cancelled` and `refunded` are terminal for fulfilment; only an
//! administrative refund may leave `delivered` or `cancelled`.

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    catalog::unit_price_or_zero,
    errors::{ErrorKind, text_enum},
    timing::elapsed_hours,
};

/// Prefix shown in front of formatted order numbers.
pub const ORDER_NUMBER_PREFIX: &str = "RP";

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, awaiting confirmation.
    #[default]
    Pending,

    /// Accepted by the store.
    Confirmed,

    /// Being prepared.
    Processing,

    /// Handed to the courier.
    Shipped,

    /// Received by the customer.
    Delivered,

    /// Cancelled before shipping.
    Cancelled,

    /// Money returned to the customer.
    Refunded,
}

text_enum!(OrderStatus, "order status", {
    Pending => "pending",
    Confirmed => "confirmed",
    Processing => "processing",
    Shipped => "shipped",
    Delivered => "delivered",
    Cancelled => "cancelled",
    Refunded => "refunded",
});

impl OrderStatus {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Refunded => "Refunded",
        }
    }

    /// Whether fulfilment has finished, one way or another.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Refunded)
    }

    /// Whether the order may still be cancelled.
    #[must_use]
    pub const fn is_cancellable(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::Processing)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        match next {
            Self::Pending => false,
            Self::Confirmed => matches!(self, Self::Pending),
            Self::Processing => matches!(self, Self::Confirmed),
            Self::Shipped => matches!(self, Self::Processing),
            Self::Delivered => matches!(self, Self::Shipped),
            Self::Cancelled => self.is_cancellable(),
            Self::Refunded => !matches!(self, Self::Refunded),
        }
    }
}

/// Administrative operations that move an order between statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderTransition {
    /// `pending -> confirmed`
    Confirm,

    /// `confirmed -> processing`
    MarkProcessing,

    /// `processing -> shipped`
    MarkShipped,

    /// `shipped -> delivered`
    MarkDelivered,

    /// `pending | confirmed | processing -> cancelled`
    Cancel,

    /// `* -> refunded`
    Refund,
}

text_enum!(OrderTransition, "order transition", {
    Confirm => "confirm",
    MarkProcessing => "mark_processing",
    MarkShipped => "mark_shipped",
    MarkDelivered => "mark_delivered",
    Cancel => "cancel",
    Refund => "refund",
});

impl OrderTransition {
    /// Status the order ends up in.
    #[must_use]
    pub const fn target(self) -> OrderStatus {
        match self {
            Self::Confirm => OrderStatus::Confirmed,
            Self::MarkProcessing => OrderStatus::Processing,
            Self::MarkShipped => OrderStatus::Shipped,
            Self::MarkDelivered => OrderStatus::Delivered,
            Self::Cancel => OrderStatus::Cancelled,
            Self::Refund => OrderStatus::Refunded,
        }
    }

    /// Resulting status when applied to an order in `from`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderTransitionError`] when the move is not allowed.
    pub fn apply(self, from: OrderStatus) -> Result<OrderStatus, OrderTransitionError> {
        let to = self.target();

        if from.can_transition_to(to) {
            Ok(to)
        } else {
            Err(OrderTransitionError { from, to })
        }
    }
}

/// An order cannot move between the given statuses.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("order cannot move from {from} to {to}")]
pub struct OrderTransitionError {
    /// Current status.
    pub from: OrderStatus,

    /// Requested status.
    pub to: OrderStatus,
}

impl OrderTransitionError {
    /// Caller-facing classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

/// Status plus the timestamps recorded by each forward transition.
///
/// A transition timestamp is set iff the order has reached that status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLifecycle {
    /// Current status.
    pub status: OrderStatus,

    /// When the order was placed.
    pub created_at: Timestamp,

    /// Set by [`OrderTransition::Confirm`].
    pub confirmed_at: Option<Timestamp>,

    /// Set by [`OrderTransition::MarkShipped`].
    pub shipped_at: Option<Timestamp>,

    /// Set by [`OrderTransition::MarkDelivered`].
    pub delivered_at: Option<Timestamp>,

    /// Set by [`OrderTransition::Cancel`].
    pub cancelled_at: Option<Timestamp>,

    /// Set by [`OrderTransition::Refund`].
    pub refunded_at: Option<Timestamp>,
}

impl OrderLifecycle {
    /// A freshly placed, pending order.
    #[must_use]
    pub const fn new(created_at: Timestamp) -> Self {
        Self {
            status: OrderStatus::Pending,
            created_at,
            confirmed_at: None,
            shipped_at: None,
            delivered_at: None,
            cancelled_at: None,
            refunded_at: None,
        }
    }

    /// Apply `transition` at time `at`, stamping the matching timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`OrderTransitionError`] when the move is not allowed; the
    /// lifecycle is left untouched.
    pub fn apply(
        &mut self,
        transition: OrderTransition,
        at: Timestamp,
    ) -> Result<OrderStatus, OrderTransitionError> {
        let status = transition.apply(self.status)?;

        let stamp = match status {
            OrderStatus::Confirmed => Some(&mut self.confirmed_at),
            OrderStatus::Shipped => Some(&mut self.shipped_at),
            OrderStatus::Delivered => Some(&mut self.delivered_at),
            OrderStatus::Cancelled => Some(&mut self.cancelled_at),
            OrderStatus::Refunded => Some(&mut self.refunded_at),
            OrderStatus::Pending | OrderStatus::Processing => None,
        };

        if let Some(stamp) = stamp {
            *stamp = Some(at);
        }

        self.status = status;

        Ok(status)
    }

    /// When the order reached its current terminal status, if it is terminal.
    #[must_use]
    pub const fn finished_at(&self) -> Option<Timestamp> {
        match self.status {
            OrderStatus::Delivered => self.delivered_at,
            OrderStatus::Cancelled => self.cancelled_at,
            OrderStatus::Refunded => self.refunded_at,
            _ => None,
        }
    }

    /// Hours from placement until `now`, or until the terminal timestamp.
    #[must_use]
    pub fn processing_time(&self, now: Timestamp) -> Decimal {
        elapsed_hours(self.created_at, self.finished_at().unwrap_or(now))
    }
}

/// Amount charged for an order: the product's unit price, or 0 without one.
#[must_use]
pub fn total_amount(product_price: Option<u64>) -> u64 {
    unit_price_or_zero(product_price)
}

/// Customer-facing order number, e.g. `RP-0042`.
#[must_use]
pub fn format_order_number(order_id: i64) -> String {
    format!("{ORDER_NUMBER_PREFIX}-{order_id:04}")
}

/// Parse a customer-facing order number (`RP-0042`) or a bare id (`42`).
#[must_use]
pub fn parse_order_number(value: &str) -> Option<i64> {
    let digits = value
        .trim()
        .strip_prefix(ORDER_NUMBER_PREFIX)
        .and_then(|rest| rest.strip_prefix('-'))
        .unwrap_or_else(|| value.trim());

    digits.parse().ok().filter(|id: &i64| *id > 0)
}
