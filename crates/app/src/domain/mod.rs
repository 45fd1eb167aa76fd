//! Storefront Domain Concerns

pub mod carts;
pub mod contact;
pub mod faqs;
pub mod orders;
pub mod products;
pub mod tickets;
pub mod users;
