//! FAQs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::text_enum;

/// Section of the FAQ page an entry belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaqCategory {
    /// General questions.
    #[default]
    General,

    /// Placing and tracking orders.
    Orders,

    /// Shipping and delivery.
    Shipping,

    /// Payment methods.
    Payments,

    /// Returns and refunds.
    Returns,

    /// Account management.
    Account,
}

text_enum!(FaqCategory, "faq category", {
    General => "general",
    Orders => "orders",
    Shipping => "shipping",
    Payments => "payments",
    Returns => "returns",
    Account => "account",
});

impl FaqCategory {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Orders => "Orders",
            Self::Shipping => "Shipping & Delivery",
            Self::Payments => "Payments",
            Self::Returns => "Returns & Refunds",
            Self::Account => "Account",
        }
    }
}

/// One of the independently incremented FAQ counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaqCounter {
    /// Times the entry was viewed.
    Views,

    /// "Was this helpful?" yes votes.
    Helpful,

    /// "Was this helpful?" no votes.
    NotHelpful,
}

/// Counter values of an FAQ entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaqCounters {
    /// Times the entry was viewed.
    pub views: u64,

    /// Yes votes.
    pub helpful_count: u64,

    /// No votes.
    pub not_helpful_count: u64,
}

impl FaqCounters {
    /// Increment a single counter, leaving the others alone.
    pub const fn increment(&mut self, counter: FaqCounter) {
        let value = match counter {
            FaqCounter::Views => &mut self.views,
            FaqCounter::Helpful => &mut self.helpful_count,
            FaqCounter::NotHelpful => &mut self.not_helpful_count,
        };

        *value = value.saturating_add(1);
    }

    /// Percentage of votes that were helpful, rounded to 2 places.
    ///
    /// `None` until somebody has voted.
    #[must_use]
    pub fn helpful_percentage(&self) -> Option<Decimal> {
        let votes = self.helpful_count.saturating_add(self.not_helpful_count);

        if votes == 0 {
            return None;
        }

        let ratio = Decimal::from(self.helpful_count) / Decimal::from(votes);

        Some((ratio * Decimal::ONE_HUNDRED).round_dp(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increments_touch_one_counter() {
        let mut counters = FaqCounters::default();

        counters.increment(FaqCounter::Views);
        counters.increment(FaqCounter::Views);

        assert_eq!(counters.views, 2);
        assert_eq!(counters.helpful_count, 0);
        assert_eq!(counters.not_helpful_count, 0);
    }

    #[test]
    fn helpful_percentage_needs_votes() {
        let mut counters = FaqCounters::default();

        assert_eq!(counters.helpful_percentage(), None);

        counters.increment(FaqCounter::Helpful);
        counters.increment(FaqCounter::Helpful);
        counters.increment(FaqCounter::NotHelpful);

        assert_eq!(counters.helpful_percentage(), Some(Decimal::new(6667, 2)));
    }
}
