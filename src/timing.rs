//! Timing
//!
//! Elapsed-time metrics shared by orders and support tickets. All values are
//! hours rounded to two decimal places.

use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;

const SECONDS_PER_HOUR: i64 = 3_600;

/// Hours elapsed between `from` and `to`, rounded to 2 decimal places.
///
/// The quotient is taken in binary floating point and rounded from its exact
/// binary value: `18s` is `0.01` and `594s` is `0.17`, while true ties such
/// as `450s` round half to even. Negative when `to` precedes `from`.
#[must_use]
pub fn elapsed_hours(from: Timestamp, to: Timestamp) -> Decimal {
    let elapsed = to.duration_since(from);

    let hours = elapsed.as_secs_f64() / 3_600.0;

    Decimal::from_f64_retain(hours)
        .unwrap_or_else(|| exact_hours(elapsed))
        .round_dp(2)
}

fn exact_hours(elapsed: SignedDuration) -> Decimal {
    let seconds = Decimal::from(elapsed.as_secs())
        + Decimal::new(i64::from(elapsed.subsec_nanos()), 9);

    seconds / Decimal::from(SECONDS_PER_HOUR)
}

/// [`elapsed_hours`] for a timestamp that may not have been recorded yet.
#[must_use]
pub fn elapsed_hours_until(from: Timestamp, to: Option<Timestamp>) -> Option<Decimal> {
    to.map(|to| elapsed_hours(from, to))
}
