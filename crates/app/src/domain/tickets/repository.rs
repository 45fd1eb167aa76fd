//! Support Tickets Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use storefront::tickets::{Rating, TicketLifecycle, TicketPriority, TicketStatus};
use tracing::debug;

use crate::{
    database::{try_get_optional_timestamp, try_get_text},
    domain::{
        tickets::{
            data::{NewTicket, NewTicketReply},
            records::{TicketRecord, TicketReplyRecord, TicketReplyUuid, TicketUuid},
        },
        users::records::UserUuid,
    },
};

const CREATE_TICKET_SQL: &str = include_str!("sql/create_ticket.sql");
const GET_TICKET_SQL: &str = include_str!("sql/get_ticket.sql");
const GET_TICKET_BY_NUMBER_SQL: &str = include_str!("sql/get_ticket_by_number.sql");
const LOCK_TICKET_SQL: &str = include_str!("sql/lock_ticket.sql");
const LIST_TICKETS_SQL: &str = include_str!("sql/list_tickets.sql");
const UPDATE_TICKET_LIFECYCLE_SQL: &str = include_str!("sql/update_ticket_lifecycle.sql");
const RESPOND_TO_TICKET_SQL: &str = include_str!("sql/respond_to_ticket.sql");
const RATE_TICKET_SQL: &str = include_str!("sql/rate_ticket.sql");
const SET_TICKET_PRIORITY_SQL: &str = include_str!("sql/set_ticket_priority.sql");
const SET_RESOLUTION_NOTES_SQL: &str = include_str!("sql/set_resolution_notes.sql");
const CREATE_TICKET_REPLY_SQL: &str = include_str!("sql/create_ticket_reply.sql");
const LIST_TICKET_REPLIES_SQL: &str = include_str!("sql/list_ticket_replies.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgTicketsRepository;

impl PgTicketsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert a ticket under `ticket_number`; `None` if the number is taken.
    pub(crate) async fn create_ticket(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ticket: &NewTicket,
        ticket_number: &str,
        user: Option<UserUuid>,
        created_at: Timestamp,
    ) -> Result<Option<TicketRecord>, sqlx::Error> {
        let record = query_as::<Postgres, TicketRecord>(CREATE_TICKET_SQL)
            .bind(TicketUuid::new().into_uuid())
            .bind(ticket_number)
            .bind(user.map(UserUuid::into_uuid))
            .bind(ticket.name.as_str())
            .bind(ticket.email.as_str())
            .bind(ticket.phone.as_deref())
            .bind(ticket.order_number.as_deref())
            .bind(ticket.subject.as_str())
            .bind(ticket.message.as_str())
            .bind(ticket.priority.as_str())
            .bind(SqlxTimestamp::from(created_at))
            .fetch_optional(&mut **tx)
            .await?;

        if record.is_none() {
            debug!(ticket_number, "ticket number already taken");
        }

        Ok(record)
    }

    pub(crate) async fn get_ticket(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ticket: TicketUuid,
    ) -> Result<TicketRecord, sqlx::Error> {
        query_as::<Postgres, TicketRecord>(GET_TICKET_SQL)
            .bind(ticket.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_ticket_by_number(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ticket_number: &str,
    ) -> Result<TicketRecord, sqlx::Error> {
        query_as::<Postgres, TicketRecord>(GET_TICKET_BY_NUMBER_SQL)
            .bind(ticket_number)
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch a ticket and hold its row lock until the transaction ends.
    pub(crate) async fn lock_ticket(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ticket: TicketUuid,
    ) -> Result<TicketRecord, sqlx::Error> {
        query_as::<Postgres, TicketRecord>(LOCK_TICKET_SQL)
            .bind(ticket.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_tickets(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        status: Option<TicketStatus>,
    ) -> Result<Vec<TicketRecord>, sqlx::Error> {
        query_as::<Postgres, TicketRecord>(LIST_TICKETS_SQL)
            .bind(status.map(TicketStatus::as_str))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_lifecycle(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ticket: TicketUuid,
        lifecycle: &TicketLifecycle,
        updated_at: Timestamp,
    ) -> Result<TicketRecord, sqlx::Error> {
        let record = query_as::<Postgres, TicketRecord>(UPDATE_TICKET_LIFECYCLE_SQL)
            .bind(ticket.into_uuid())
            .bind(lifecycle.status.as_str())
            .bind(lifecycle.resolved_at.map(SqlxTimestamp::from))
            .bind(lifecycle.closed_at.map(SqlxTimestamp::from))
            .bind(SqlxTimestamp::from(updated_at))
            .fetch_one(&mut **tx)
            .await?;

        debug!(
            ticket_number = %record.ticket_number,
            status = %record.status,
            "updated ticket lifecycle"
        );

        Ok(record)
    }

    pub(crate) async fn respond(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ticket: TicketUuid,
        response: &str,
        lifecycle: &TicketLifecycle,
        updated_at: Timestamp,
    ) -> Result<TicketRecord, sqlx::Error> {
        query_as::<Postgres, TicketRecord>(RESPOND_TO_TICKET_SQL)
            .bind(ticket.into_uuid())
            .bind(response)
            .bind(lifecycle.responded_at.map(SqlxTimestamp::from))
            .bind(SqlxTimestamp::from(updated_at))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn rate(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ticket: TicketUuid,
        rating: Rating,
        feedback: Option<String>,
        updated_at: Timestamp,
    ) -> Result<TicketRecord, sqlx::Error> {
        query_as::<Postgres, TicketRecord>(RATE_TICKET_SQL)
            .bind(ticket.into_uuid())
            .bind(i16::from(rating.get()))
            .bind(feedback)
            .bind(SqlxTimestamp::from(updated_at))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_priority(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ticket: TicketUuid,
        priority: TicketPriority,
        updated_at: Timestamp,
    ) -> Result<TicketRecord, sqlx::Error> {
        query_as::<Postgres, TicketRecord>(SET_TICKET_PRIORITY_SQL)
            .bind(ticket.into_uuid())
            .bind(priority.as_str())
            .bind(SqlxTimestamp::from(updated_at))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_resolution_notes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ticket: TicketUuid,
        notes: Option<&str>,
        updated_at: Timestamp,
    ) -> Result<TicketRecord, sqlx::Error> {
        query_as::<Postgres, TicketRecord>(SET_RESOLUTION_NOTES_SQL)
            .bind(ticket.into_uuid())
            .bind(notes)
            .bind(SqlxTimestamp::from(updated_at))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_reply(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reply: NewTicketReply,
        created_at: Timestamp,
    ) -> Result<TicketReplyRecord, sqlx::Error> {
        let record = query_as::<Postgres, TicketReplyRecord>(CREATE_TICKET_REPLY_SQL)
            .bind(TicketReplyUuid::new().into_uuid())
            .bind(reply.ticket_uuid.into_uuid())
            .bind(reply.user_uuid.map(UserUuid::into_uuid))
            .bind(reply.is_staff_reply)
            .bind(reply.message)
            .bind(SqlxTimestamp::from(created_at))
            .fetch_one(&mut **tx)
            .await?;

        debug!(
            reply_uuid = %record.uuid,
            is_staff_reply = record.is_staff_reply,
            "inserted ticket reply"
        );

        Ok(record)
    }

    pub(crate) async fn list_replies(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ticket: TicketUuid,
    ) -> Result<Vec<TicketReplyRecord>, sqlx::Error> {
        query_as::<Postgres, TicketReplyRecord>(LIST_TICKET_REPLIES_SQL)
            .bind(ticket.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for TicketRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let rating = row
            .try_get::<Option<i16>, _>("rating")?
            .map(|rating| Rating::new(i64::from(rating)))
            .transpose()
            .map_err(|error| sqlx::Error::ColumnDecode {
                index: "rating".to_string(),
                source: Box::new(error),
            })?;

        Ok(Self {
            uuid: TicketUuid::from_uuid(row.try_get("uuid")?),
            ticket_number: row.try_get("ticket_number")?,
            user_uuid: row
                .try_get::<Option<uuid::Uuid>, _>("user_uuid")?
                .map(UserUuid::from_uuid),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            order_number: row.try_get("order_number")?,
            subject: try_get_text(row, "subject")?,
            message: row.try_get("message")?,
            status: try_get_text(row, "status")?,
            priority: try_get_text(row, "priority")?,
            admin_response: row.try_get("admin_response")?,
            resolution_notes: row.try_get("resolution_notes")?,
            rating,
            feedback: row.try_get("feedback")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            responded_at: try_get_optional_timestamp(row, "responded_at")?,
            resolved_at: try_get_optional_timestamp(row, "resolved_at")?,
            closed_at: try_get_optional_timestamp(row, "closed_at")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for TicketReplyRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: TicketReplyUuid::from_uuid(row.try_get("uuid")?),
            ticket_uuid: TicketUuid::from_uuid(row.try_get("ticket_uuid")?),
            user_uuid: row
                .try_get::<Option<uuid::Uuid>, _>("user_uuid")?
                .map(UserUuid::from_uuid),
            is_staff_reply: row.try_get("is_staff_reply")?,
            message: row.try_get("message")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
