//! Cart
//!
//! Quantities and totals for a user's cart lines.

use std::{fmt, num::NonZeroU32};

use thiserror::Error;

use crate::{catalog::unit_price_or_zero, errors::ErrorKind};

/// Errors related to cart quantities or totals.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CartError {
    /// Quantities must be at least one.
    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),

    /// A line total or cart total overflowed.
    #[error("cart total overflowed")]
    Overflow,
}

impl CartError {
    /// Caller-facing classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

/// A strictly positive number of units on a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit, the default when adding to a cart.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Validate a requested quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for values below one or above `u32::MAX`.
    pub fn new(value: i64) -> Result<Self, CartError> {
        u32::try_from(value)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self)
            .ok_or(CartError::InvalidQuantity(value))
    }

    /// Number of units.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Add `other` to this quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] when the sum exceeds `u32::MAX`.
    pub fn checked_add(self, other: Self) -> Result<Self, CartError> {
        self.0
            .checked_add(other.get())
            .map(Self)
            .ok_or(CartError::Overflow)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = CartError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for i64 {
    fn from(quantity: Quantity) -> Self {
        i64::from(quantity.get())
    }
}

/// A cart line that can be priced.
pub trait PricedLine {
    /// Unit price of the referenced product in minor units, if it has one.
    fn unit_price(&self) -> Option<u64>;

    /// Units of the product on this line.
    fn quantity(&self) -> Quantity;

    /// `quantity * unit price`; a missing price counts as zero.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] when the product overflows `u64`.
    fn line_total(&self) -> Result<u64, CartError> {
        line_total(self.unit_price(), self.quantity())
    }
}

/// `quantity * price`; a missing price counts as zero.
///
/// # Errors
///
/// Returns [`CartError::Overflow`] when the product overflows `u64`.
pub fn line_total(price: Option<u64>, quantity: Quantity) -> Result<u64, CartError> {
    unit_price_or_zero(price)
        .checked_mul(u64::from(quantity.get()))
        .ok_or(CartError::Overflow)
}

/// Aggregate values for a cart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of every line total.
    pub total: u64,

    /// Number of distinct lines, not the sum of their quantities.
    pub line_count: usize,
}

impl CartTotals {
    /// Total the given lines.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] when a line total or the sum overflows.
    pub fn from_lines<L: PricedLine>(lines: &[L]) -> Result<Self, CartError> {
        let total = lines.iter().try_fold(0_u64, |acc, line| {
            acc.checked_add(line.line_total()?).ok_or(CartError::Overflow)
        })?;

        Ok(Self {
            total,
            line_count: lines.len(),
        })
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.line_count == 0
    }
}
