//! End-to-end pricing and order lifecycle for a single product.
//!
//! A product (sku 1001) priced at 500 is added to a cart twice, which merges
//! into one line of quantity 2 totalling 1000. Placing the order charges the
//! unit price (500), and cancelling it stamps `cancelled_at`.

use jiff::{SignedDuration, Timestamp};
use testresult::TestResult;

use storefront::prelude::*;

#[derive(Debug, Clone, Copy)]
struct Line {
    price: Option<u64>,
    quantity: Quantity,
}

impl PricedLine for Line {
    fn unit_price(&self) -> Option<u64> {
        self.price
    }

    fn quantity(&self) -> Quantity {
        self.quantity
    }
}

#[test]
fn add_twice_then_order_then_cancel() -> TestResult {
    let price = Some(500);

    let mut line = Line {
        price,
        quantity: Quantity::ONE,
    };

    line.quantity = line.quantity.checked_add(Quantity::ONE)?;

    let totals = CartTotals::from_lines(&[line])?;

    assert_eq!(totals.line_count, 1);
    assert_eq!(line.quantity.get(), 2);
    assert_eq!(totals.total, 1_000);

    let placed_at = Timestamp::from_second(1_760_000_000)?;
    let mut order = OrderLifecycle::new(placed_at);

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(total_amount(price), 500);

    let cancelled_at = placed_at.checked_add(SignedDuration::from_mins(10))?;
    order.apply(OrderTransition::Cancel, cancelled_at)?;

    assert_eq!(order.status, OrderStatus::Cancelled);
    assert_eq!(order.cancelled_at, Some(cancelled_at));
    assert_eq!(order.status.label(), "Cancelled");

    Ok(())
}

#[test]
fn illegal_transitions_are_validation_errors() -> TestResult {
    let mut order = OrderLifecycle::new(Timestamp::from_second(1_760_000_000)?);
    let at = order.created_at;

    order.apply(OrderTransition::Cancel, at)?;

    let result = order.apply(OrderTransition::Confirm, at);

    assert!(
        matches!(result, Err(ref error) if error.kind() == ErrorKind::Validation),
        "expected a validation error, got {result:?}"
    );
    assert_eq!(order.status, OrderStatus::Cancelled);
    assert!(order.confirmed_at.is_none());

    Ok(())
}

#[test]
fn ticket_metrics_follow_the_lifecycle() -> TestResult {
    let created_at: Timestamp = "2026-10-19T09:00:00Z".parse()?;
    let mut ticket = TicketLifecycle::new(created_at);

    assert_eq!(ticket.response_time(), None);

    ticket.apply(TicketTransition::MarkInProgress, created_at)?;
    ticket.respond("2026-10-19T09:45:00Z".parse()?)?;
    ticket.apply(TicketTransition::MarkResolved, "2026-10-19T12:20:00Z".parse()?)?;

    assert_eq!(
        ticket.response_time().map(|hours| hours.to_string()),
        Some("0.75".to_string())
    );
    assert_eq!(
        ticket.resolution_time().map(|hours| hours.to_string()),
        Some("3.33".to_string())
    );

    ticket.apply(TicketTransition::Close, "2026-10-19T13:00:00Z".parse()?)?;
    ticket.ensure_rateable()?;

    assert_eq!(Rating::new(5)?.to_string(), "5/5");

    Ok(())
}
