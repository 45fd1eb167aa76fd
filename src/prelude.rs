//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{CartError, CartTotals, PricedLine, Quantity, line_total},
    catalog::{CURRENCY, PriceError, display_price, money, unit_price_or_zero},
    errors::{ErrorKind, ParseEnumError},
    faqs::{FaqCategory, FaqCounter, FaqCounters},
    identity::{AuthenticationRequired, Identity},
    orders::{
        OrderLifecycle, OrderStatus, OrderTransition, OrderTransitionError, format_order_number,
        parse_order_number, total_amount,
    },
    site::{SiteConfig, SiteConfigError},
    tickets::{
        Rating, TicketError, TicketLifecycle, TicketPriority, TicketStatus, TicketSubject,
        TicketTransition, generate_ticket_number,
    },
    timing::{elapsed_hours, elapsed_hours_until},
};
