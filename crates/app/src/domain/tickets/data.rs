//! Support Ticket Data

use storefront::tickets::{TicketPriority, TicketSubject};

use crate::domain::{tickets::records::TicketUuid, users::records::UserUuid};

/// New Ticket Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub order_number: Option<String>,
    pub subject: TicketSubject,
    pub message: String,
    pub priority: TicketPriority,
}

/// New Ticket Reply Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicketReply {
    pub ticket_uuid: TicketUuid,
    pub user_uuid: Option<UserUuid>,
    pub is_staff_reply: bool,
    pub message: String,
}
