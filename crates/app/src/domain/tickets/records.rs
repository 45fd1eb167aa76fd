//! Support Ticket Records

use jiff::Timestamp;
use rust_decimal::Decimal;
use storefront::tickets::{Rating, TicketLifecycle, TicketPriority, TicketStatus, TicketSubject};

use crate::{domain::users::records::UserUuid, uuids::TypedUuid};

/// Ticket UUID
pub type TicketUuid = TypedUuid<TicketRecord>;

/// Support Ticket Record
#[derive(Debug, Clone)]
pub struct TicketRecord {
    pub uuid: TicketUuid,
    pub ticket_number: String,
    pub user_uuid: Option<UserUuid>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub order_number: Option<String>,
    pub subject: TicketSubject,
    pub message: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub admin_response: Option<String>,
    pub resolution_notes: Option<String>,
    pub rating: Option<Rating>,
    pub feedback: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub responded_at: Option<Timestamp>,
    pub resolved_at: Option<Timestamp>,
    pub closed_at: Option<Timestamp>,
}

impl TicketRecord {
    #[must_use]
    pub const fn lifecycle(&self) -> TicketLifecycle {
        TicketLifecycle {
            status: self.status,
            created_at: self.created_at,
            responded_at: self.responded_at,
            resolved_at: self.resolved_at,
            closed_at: self.closed_at,
        }
    }

    /// Hours until the first staff response.
    #[must_use]
    pub fn response_time(&self) -> Option<Decimal> {
        self.lifecycle().response_time()
    }

    /// Hours until the ticket was resolved.
    #[must_use]
    pub fn resolution_time(&self) -> Option<Decimal> {
        self.lifecycle().resolution_time()
    }
}

/// Ticket Reply UUID
pub type TicketReplyUuid = TypedUuid<TicketReplyRecord>;

/// Ticket Reply Record
#[derive(Debug, Clone)]
pub struct TicketReplyRecord {
    pub uuid: TicketReplyUuid,
    pub ticket_uuid: TicketUuid,
    pub user_uuid: Option<UserUuid>,
    pub is_staff_reply: bool,
    pub message: String,
    pub created_at: Timestamp,
}
