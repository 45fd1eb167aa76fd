//! Storefront
//!
//! Lifecycle engine for a small storefront: cart pricing, the order and
//! support ticket state machines, FAQ counters and the derived timing metrics
//! shown to customers and staff.

pub mod cart;
pub mod catalog;
pub mod errors;
pub mod faqs;
pub mod identity;
pub mod orders;
pub mod prelude;
pub mod site;
pub mod tickets;
pub mod timing;

pub use errors::ErrorKind;
