//! Support tickets
//!
//! Ticket status state machine:
//!
//! ```text
//! open -> in_progress <-> waiting_customer
//! in_progress | waiting_customer -> resolved
//! open | in_progress | waiting_customer | resolved -> closed
//! ```

use std::fmt;

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    errors::{ErrorKind, text_enum},
    timing::elapsed_hours_until,
};

/// Prefix of every generated ticket number.
pub const TICKET_NUMBER_PREFIX: &str = "TKT";

/// Lifecycle status of a support ticket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Submitted, not yet picked up.
    #[default]
    Open,

    /// Being worked on by staff.
    InProgress,

    /// Waiting for the customer to reply.
    WaitingCustomer,

    /// Staff consider the issue solved.
    Resolved,

    /// No further work will happen.
    Closed,
}

text_enum!(TicketStatus, "ticket status", {
    Open => "open",
    InProgress => "in_progress",
    WaitingCustomer => "waiting_customer",
    Resolved => "resolved",
    Closed => "closed",
});

impl TicketStatus {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::WaitingCustomer => "Waiting for Customer",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
        }
    }

    /// Closed tickets accept no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Whether the customer may leave a rating.
    #[must_use]
    pub const fn accepts_rating(self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        match next {
            Self::Open => false,
            Self::InProgress => matches!(self, Self::Open | Self::WaitingCustomer),
            Self::WaitingCustomer => matches!(self, Self::InProgress),
            Self::Resolved => matches!(self, Self::InProgress | Self::WaitingCustomer),
            Self::Closed => !self.is_terminal(),
        }
    }
}

/// Urgency of a ticket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    /// Can wait.
    Low,

    /// Normal handling.
    #[default]
    Medium,

    /// Handle soon.
    High,

    /// Handle now.
    Urgent,
}

text_enum!(TicketPriority, "ticket priority", {
    Low => "low",
    Medium => "medium",
    High => "high",
    Urgent => "urgent",
});

impl TicketPriority {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }
}

/// What a ticket is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketSubject {
    /// Problem with an existing order.
    Order,

    /// Delivery or shipping question.
    Delivery,

    /// Payment or billing problem.
    Payment,

    /// Product quality or information.
    Product,

    /// Return or refund request.
    Refund,

    /// Login or profile problem.
    Account,

    /// Anything else.
    Other,
}

text_enum!(TicketSubject, "ticket subject", {
    Order => "order",
    Delivery => "delivery",
    Payment => "payment",
    Product => "product",
    Refund => "refund",
    Account => "account",
    Other => "other",
});

impl TicketSubject {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Order => "Order Issue",
            Self::Delivery => "Delivery & Shipping",
            Self::Payment => "Payment & Billing",
            Self::Product => "Product Inquiry",
            Self::Refund => "Returns & Refunds",
            Self::Account => "Account Help",
            Self::Other => "Other",
        }
    }
}

/// Staff operations that move a ticket between statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketTransition {
    /// `open | waiting_customer -> in_progress`
    MarkInProgress,

    /// `in_progress -> waiting_customer`
    MarkWaitingCustomer,

    /// `in_progress | waiting_customer -> resolved`
    MarkResolved,

    /// `* -> closed`
    Close,
}

text_enum!(TicketTransition, "ticket transition", {
    MarkInProgress => "mark_in_progress",
    MarkWaitingCustomer => "mark_waiting_customer",
    MarkResolved => "mark_resolved",
    Close => "close",
});

impl TicketTransition {
    /// Status the ticket ends up in.
    #[must_use]
    pub const fn target(self) -> TicketStatus {
        match self {
            Self::MarkInProgress => TicketStatus::InProgress,
            Self::MarkWaitingCustomer => TicketStatus::WaitingCustomer,
            Self::MarkResolved => TicketStatus::Resolved,
            Self::Close => TicketStatus::Closed,
        }
    }

    /// Resulting status when applied to a ticket in `from`.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::IllegalTransition`] when the move is not allowed.
    pub fn apply(self, from: TicketStatus) -> Result<TicketStatus, TicketError> {
        let to = self.target();

        if from.can_transition_to(to) {
            Ok(to)
        } else {
            Err(TicketError::IllegalTransition { from, to })
        }
    }
}

/// Ticket rule violations.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TicketError {
    /// The ticket cannot move between the given statuses.
    #[error("ticket cannot move from {from} to {to}")]
    IllegalTransition {
        /// Current status.
        from: TicketStatus,

        /// Requested status.
        to: TicketStatus,
    },

    /// Ratings are whole numbers from 1 to 5.
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(i64),

    /// Only resolved or closed tickets can be rated.
    #[error("a {0} ticket cannot be rated")]
    NotRateable(TicketStatus),

    /// Closed tickets take no more responses.
    #[error("a closed ticket cannot be responded to")]
    Closed,
}

impl TicketError {
    /// Caller-facing classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

/// Customer satisfaction score from 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    /// Lowest accepted score.
    pub const MIN: u8 = 1;

    /// Highest accepted score.
    pub const MAX: u8 = 5;

    /// Validate a score.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::InvalidRating`] outside `1..=5`.
    pub fn new(value: i64) -> Result<Self, TicketError> {
        u8::try_from(value)
            .ok()
            .filter(|score| (Self::MIN..=Self::MAX).contains(score))
            .map(Self)
            .ok_or(TicketError::InvalidRating(value))
    }

    /// The score.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = TicketError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        i64::from(rating.0)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// Generate a ticket number such as `TKT-20261019-0A1B2C`.
///
/// The low 24 bits of `entropy` form the suffix; uniqueness is enforced by
/// storage, which retries with fresh entropy on collision.
#[must_use]
pub fn generate_ticket_number(now: Timestamp, entropy: u32) -> String {
    format!(
        "{TICKET_NUMBER_PREFIX}-{}-{:06X}",
        now.strftime("%Y%m%d"),
        entropy & 0x00FF_FFFF
    )
}

/// Status plus the timestamps recorded as a ticket is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketLifecycle {
    /// Current status.
    pub status: TicketStatus,

    /// When the ticket was submitted.
    pub created_at: Timestamp,

    /// First staff response.
    pub responded_at: Option<Timestamp>,

    /// Set by [`TicketTransition::MarkResolved`].
    pub resolved_at: Option<Timestamp>,

    /// Set by [`TicketTransition::Close`].
    pub closed_at: Option<Timestamp>,
}

impl TicketLifecycle {
    /// A freshly submitted, open ticket.
    #[must_use]
    pub const fn new(created_at: Timestamp) -> Self {
        Self {
            status: TicketStatus::Open,
            created_at,
            responded_at: None,
            resolved_at: None,
            closed_at: None,
        }
    }

    /// Apply `transition` at time `at`, stamping `resolved_at` or `closed_at`.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::IllegalTransition`] when the move is not
    /// allowed; the lifecycle is left untouched.
    pub fn apply(
        &mut self,
        transition: TicketTransition,
        at: Timestamp,
    ) -> Result<TicketStatus, TicketError> {
        let status = transition.apply(self.status)?;

        match status {
            TicketStatus::Resolved => self.resolved_at = Some(at),
            TicketStatus::Closed => self.closed_at = Some(at),
            TicketStatus::Open | TicketStatus::InProgress | TicketStatus::WaitingCustomer => {}
        }

        self.status = status;

        Ok(status)
    }

    /// Record a staff response; only the first response is timed.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::Closed`] for closed tickets.
    pub fn respond(&mut self, at: Timestamp) -> Result<(), TicketError> {
        if self.status.is_terminal() {
            return Err(TicketError::Closed);
        }

        self.responded_at.get_or_insert(at);

        Ok(())
    }

    /// Validate that a rating may be left now.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::NotRateable`] unless resolved or closed.
    pub const fn ensure_rateable(&self) -> Result<(), TicketError> {
        if self.status.accepts_rating() {
            Ok(())
        } else {
            Err(TicketError::NotRateable(self.status))
        }
    }

    /// Hours until the first response; `None` before one exists.
    #[must_use]
    pub fn response_time(&self) -> Option<Decimal> {
        elapsed_hours_until(self.created_at, self.responded_at)
    }

    /// Hours until resolution; `None` before the ticket is resolved.
    #[must_use]
    pub fn resolution_time(&self) -> Option<Decimal> {
        elapsed_hours_until(self.created_at, self.resolved_at)
    }
}
