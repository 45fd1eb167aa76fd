//! Catalog pricing

use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// Currency every storefront price is denominated in.
pub const CURRENCY: &Currency = iso::BDT;

/// Errors raised when converting stored prices.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The amount does not fit in the signed range used by money arithmetic.
    #[error("price {0} is out of range")]
    OutOfRange(u64),
}

/// Unit price used for totals; products without a price count as free.
#[must_use]
pub fn unit_price_or_zero(price: Option<u64>) -> u64 {
    price.unwrap_or(0)
}

/// Wrap a minor-unit amount as storefront money.
///
/// # Errors
///
/// Returns [`PriceError::OutOfRange`] when the amount exceeds `i64::MAX`.
pub fn money(amount: u64) -> Result<Money<'static, Currency>, PriceError> {
    let Ok(minor) = i64::try_from(amount) else {
        return Err(PriceError::OutOfRange(amount));
    };

    Ok(Money::from_minor(minor, CURRENCY))
}

/// Human-readable price, or `None` when the product has no price.
///
/// # Errors
///
/// Returns [`PriceError::OutOfRange`] when the amount exceeds `i64::MAX`.
pub fn display_price(price: Option<u64>) -> Result<Option<String>, PriceError> {
    price.map(|amount| money(amount).map(|m| m.to_string())).transpose()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn missing_price_is_zero() {
        assert_eq!(unit_price_or_zero(None), 0);
        assert_eq!(unit_price_or_zero(Some(500)), 500);
    }

    #[test]
    fn money_uses_store_currency() -> TestResult {
        let price = money(500)?;

        assert_eq!(price, Money::from_minor(500, iso::BDT));
        assert_eq!(price.currency(), CURRENCY);

        Ok(())
    }

    #[test]
    fn money_rejects_out_of_range_amounts() {
        assert_eq!(money(u64::MAX), Err(PriceError::OutOfRange(u64::MAX)));
    }

    #[test]
    fn display_price_skips_missing_price() -> TestResult {
        assert_eq!(display_price(None)?, None);
        assert!(display_price(Some(500))?.is_some());

        Ok(())
    }
}
