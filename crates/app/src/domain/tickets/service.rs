//! Support tickets service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use storefront::tickets::{
    Rating, TicketError, TicketPriority, TicketStatus, TicketTransition, generate_ticket_number,
};
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::{
        tickets::{
            TicketsServiceError,
            data::{NewTicket, NewTicketReply},
            records::{TicketRecord, TicketReplyRecord, TicketUuid},
            repository::PgTicketsRepository,
        },
        users::records::UserIdentity,
    },
};

/// Fresh ticket numbers tried before giving up.
const TICKET_NUMBER_ATTEMPTS: usize = 5;

#[derive(Debug, Clone)]
pub struct PgTicketsService {
    db: Db,
    repository: PgTicketsRepository,
    entropy: fn() -> u32,
}

impl PgTicketsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self::with_entropy(db, rand::random::<u32>)
    }

    /// Service drawing ticket number suffixes from `entropy`.
    #[must_use]
    pub fn with_entropy(db: Db, entropy: fn() -> u32) -> Self {
        Self {
            db,
            repository: PgTicketsRepository::new(),
            entropy,
        }
    }
}

#[async_trait]
impl TicketsService for PgTicketsService {
    #[tracing::instrument(
        name = "tickets.service.create_ticket",
        skip(self, ticket),
        fields(subject = %ticket.subject, ticket_number = tracing::field::Empty),
        err
    )]
    async fn create_ticket(
        &self,
        identity: UserIdentity,
        ticket: NewTicket,
    ) -> Result<TicketRecord, TicketsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created_at = Timestamp::now();

        for _ in 0..TICKET_NUMBER_ATTEMPTS {
            let ticket_number = generate_ticket_number(created_at, (self.entropy)());

            let Some(record) = self
                .repository
                .create_ticket(&mut tx, &ticket, &ticket_number, identity.user(), created_at)
                .await?
            else {
                continue;
            };

            tx.commit().await?;

            Span::current().record(
                "ticket_number",
                tracing::field::display(&record.ticket_number),
            );

            info!(ticket_uuid = %record.uuid, "opened support ticket");

            return Ok(record);
        }

        Err(TicketsServiceError::NumberExhausted)
    }

    #[tracing::instrument(
        name = "tickets.service.get_ticket",
        skip(self),
        fields(ticket_uuid = %ticket),
        err
    )]
    async fn get_ticket(&self, ticket: TicketUuid) -> Result<TicketRecord, TicketsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.repository.get_ticket(&mut tx, ticket).await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(name = "tickets.service.get_ticket_by_number", skip(self), err)]
    async fn get_ticket_by_number(
        &self,
        ticket_number: &str,
    ) -> Result<TicketRecord, TicketsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self
            .repository
            .get_ticket_by_number(&mut tx, ticket_number)
            .await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(name = "tickets.service.list_tickets", skip(self), err)]
    async fn list_tickets(
        &self,
        status: Option<TicketStatus>,
    ) -> Result<Vec<TicketRecord>, TicketsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let tickets = self.repository.list_tickets(&mut tx, status).await?;

        tx.commit().await?;

        Ok(tickets)
    }

    #[tracing::instrument(
        name = "tickets.service.transition_ticket",
        skip(self, transition),
        fields(ticket_uuid = %ticket, transition = %transition),
        err
    )]
    async fn transition_ticket(
        &self,
        ticket: TicketUuid,
        transition: TicketTransition,
    ) -> Result<TicketRecord, TicketsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let locked = self.repository.lock_ticket(&mut tx, ticket).await?;

        let mut lifecycle = locked.lifecycle();
        let now = Timestamp::now();

        let from = lifecycle.status;
        let to = lifecycle.apply(transition, now)?;

        let updated = self
            .repository
            .update_lifecycle(&mut tx, ticket, &lifecycle, now)
            .await?;

        tx.commit().await?;

        info!(
            ticket_number = %updated.ticket_number,
            from = %from,
            to = %to,
            "ticket status changed"
        );

        Ok(updated)
    }

    async fn mark_in_progress(&self, ticket: TicketUuid) -> Result<TicketRecord, TicketsServiceError> {
        self.transition_ticket(ticket, TicketTransition::MarkInProgress)
            .await
    }

    async fn mark_waiting_customer(
        &self,
        ticket: TicketUuid,
    ) -> Result<TicketRecord, TicketsServiceError> {
        self.transition_ticket(ticket, TicketTransition::MarkWaitingCustomer)
            .await
    }

    async fn mark_resolved(&self, ticket: TicketUuid) -> Result<TicketRecord, TicketsServiceError> {
        self.transition_ticket(ticket, TicketTransition::MarkResolved)
            .await
    }

    async fn close_ticket(&self, ticket: TicketUuid) -> Result<TicketRecord, TicketsServiceError> {
        self.transition_ticket(ticket, TicketTransition::Close).await
    }

    #[tracing::instrument(
        name = "tickets.service.respond",
        skip(self, response),
        fields(ticket_uuid = %ticket),
        err
    )]
    async fn respond(
        &self,
        ticket: TicketUuid,
        response: String,
    ) -> Result<TicketRecord, TicketsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let locked = self.repository.lock_ticket(&mut tx, ticket).await?;

        let mut lifecycle = locked.lifecycle();
        let now = Timestamp::now();

        lifecycle.respond(now)?;

        let updated = self
            .repository
            .respond(&mut tx, ticket, &response, &lifecycle, now)
            .await?;

        tx.commit().await?;

        info!(
            ticket_number = %updated.ticket_number,
            first_response = locked.responded_at.is_none(),
            "responded to ticket"
        );

        Ok(updated)
    }

    #[tracing::instrument(
        name = "tickets.service.rate_ticket",
        skip(self, feedback),
        fields(ticket_uuid = %ticket, rating = rating.get()),
        err
    )]
    async fn rate_ticket(
        &self,
        ticket: TicketUuid,
        rating: Rating,
        feedback: Option<String>,
    ) -> Result<TicketRecord, TicketsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let locked = self.repository.lock_ticket(&mut tx, ticket).await?;

        locked.lifecycle().ensure_rateable()?;

        let updated = self
            .repository
            .rate(&mut tx, ticket, rating, feedback, Timestamp::now())
            .await?;

        tx.commit().await?;

        info!(ticket_number = %updated.ticket_number, "ticket rated");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "tickets.service.set_priority",
        skip(self),
        fields(ticket_uuid = %ticket),
        err
    )]
    async fn set_priority(
        &self,
        ticket: TicketUuid,
        priority: TicketPriority,
    ) -> Result<TicketRecord, TicketsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let updated = self
            .repository
            .set_priority(&mut tx, ticket, priority, Timestamp::now())
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "tickets.service.set_resolution_notes",
        skip(self, notes),
        fields(ticket_uuid = %ticket),
        err
    )]
    async fn set_resolution_notes(
        &self,
        ticket: TicketUuid,
        notes: Option<String>,
    ) -> Result<TicketRecord, TicketsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let updated = self
            .repository
            .set_resolution_notes(&mut tx, ticket, notes.as_deref(), Timestamp::now())
            .await?;

        tx.commit().await?;

        info!(ticket_number = %updated.ticket_number, "updated resolution notes");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "tickets.service.add_reply",
        skip(self, reply),
        fields(ticket_uuid = %reply.ticket_uuid, is_staff_reply = reply.is_staff_reply),
        err
    )]
    async fn add_reply(
        &self,
        reply: NewTicketReply,
    ) -> Result<TicketReplyRecord, TicketsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let locked = self.repository.lock_ticket(&mut tx, reply.ticket_uuid).await?;

        if locked.status.is_terminal() {
            return Err(TicketError::Closed.into());
        }

        let record = self
            .repository
            .create_reply(&mut tx, reply, Timestamp::now())
            .await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(
        name = "tickets.service.list_replies",
        skip(self),
        fields(ticket_uuid = %ticket),
        err
    )]
    async fn list_replies(
        &self,
        ticket: TicketUuid,
    ) -> Result<Vec<TicketReplyRecord>, TicketsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let replies = self.repository.list_replies(&mut tx, ticket).await?;

        tx.commit().await?;

        Ok(replies)
    }
}

#[automock]
#[async_trait]
pub trait TicketsService: Send + Sync {
    /// Open a ticket under a freshly generated ticket number.
    async fn create_ticket(
        &self,
        identity: UserIdentity,
        ticket: NewTicket,
    ) -> Result<TicketRecord, TicketsServiceError>;

    /// Retrieve a single ticket.
    async fn get_ticket(&self, ticket: TicketUuid) -> Result<TicketRecord, TicketsServiceError>;

    /// Retrieve a ticket by its `TKT-` number.
    async fn get_ticket_by_number(
        &self,
        ticket_number: &str,
    ) -> Result<TicketRecord, TicketsServiceError>;

    /// Tickets newest first, optionally limited to one status.
    async fn list_tickets(
        &self,
        status: Option<TicketStatus>,
    ) -> Result<Vec<TicketRecord>, TicketsServiceError>;

    /// Apply a status transition under a row lock.
    async fn transition_ticket(
        &self,
        ticket: TicketUuid,
        transition: TicketTransition,
    ) -> Result<TicketRecord, TicketsServiceError>;

    async fn mark_in_progress(&self, ticket: TicketUuid) -> Result<TicketRecord, TicketsServiceError>;

    async fn mark_waiting_customer(
        &self,
        ticket: TicketUuid,
    ) -> Result<TicketRecord, TicketsServiceError>;

    async fn mark_resolved(&self, ticket: TicketUuid) -> Result<TicketRecord, TicketsServiceError>;

    async fn close_ticket(&self, ticket: TicketUuid) -> Result<TicketRecord, TicketsServiceError>;

    /// Store the staff response; the first one stamps `responded_at`.
    async fn respond(
        &self,
        ticket: TicketUuid,
        response: String,
    ) -> Result<TicketRecord, TicketsServiceError>;

    /// Record customer satisfaction on a resolved or closed ticket.
    async fn rate_ticket(
        &self,
        ticket: TicketUuid,
        rating: Rating,
        feedback: Option<String>,
    ) -> Result<TicketRecord, TicketsServiceError>;

    async fn set_priority(
        &self,
        ticket: TicketUuid,
        priority: TicketPriority,
    ) -> Result<TicketRecord, TicketsServiceError>;

    /// Replace the internal notes on how the ticket was resolved.
    async fn set_resolution_notes(
        &self,
        ticket: TicketUuid,
        notes: Option<String>,
    ) -> Result<TicketRecord, TicketsServiceError>;

    /// Append a message to the ticket thread.
    async fn add_reply(&self, reply: NewTicketReply)
    -> Result<TicketReplyRecord, TicketsServiceError>;

    /// The ticket thread, oldest first.
    async fn list_replies(
        &self,
        ticket: TicketUuid,
    ) -> Result<Vec<TicketReplyRecord>, TicketsServiceError>;
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use storefront::{ErrorKind, tickets::TICKET_NUMBER_PREFIX};
    use testresult::TestResult;

    use crate::test::{
        TestContext,
        helpers::{create_user, new_ticket, open_ticket},
    };

    use super::*;

    #[tokio::test]
    async fn new_tickets_are_open_with_a_generated_number() -> TestResult {
        let ctx = TestContext::new().await;

        let ticket = open_ticket(&ctx).await?;

        assert_eq!(ticket.status, TicketStatus::Open);
        assert_eq!(ticket.priority, TicketPriority::Medium);
        assert!(ticket.ticket_number.starts_with(TICKET_NUMBER_PREFIX));
        assert_eq!(ticket.ticket_number.len(), "TKT-20261019-ABCDEF".len());
        assert!(ticket.user_uuid.is_none());
        assert_eq!(ticket.response_time(), None);

        let found = ctx.tickets.get_ticket_by_number(&ticket.ticket_number).await?;

        assert_eq!(found.uuid, ticket.uuid);

        Ok(())
    }

    static SUFFIX_CALLS: AtomicU32 = AtomicU32::new(0);

    fn taken_twice_then_free() -> u32 {
        if SUFFIX_CALLS.fetch_add(1, Ordering::SeqCst) < 2 {
            0x00C0_FFEE
        } else {
            0x00BE_EF00
        }
    }

    #[tokio::test]
    async fn taken_ticket_numbers_are_retried() -> TestResult {
        let ctx = TestContext::new().await;

        let first = PgTicketsService::with_entropy(Db::new(ctx.db_pool()), || 0x00C0_FFEE)
            .create_ticket(UserIdentity::Anonymous, new_ticket())
            .await?;

        assert!(first.ticket_number.ends_with("-C0FFEE"), "{}", first.ticket_number);

        let second = PgTicketsService::with_entropy(Db::new(ctx.db_pool()), taken_twice_then_free)
            .create_ticket(UserIdentity::Anonymous, new_ticket())
            .await?;

        assert!(second.ticket_number.ends_with("-BEEF00"), "{}", second.ticket_number);
        assert_eq!(SUFFIX_CALLS.load(Ordering::SeqCst), 3);
        assert_eq!(ctx.tickets.list_tickets(None).await?.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn numbers_run_out_when_every_attempt_collides() -> TestResult {
        let ctx = TestContext::new().await;

        let service = PgTicketsService::with_entropy(Db::new(ctx.db_pool()), || 0x0000_0042);

        service
            .create_ticket(UserIdentity::Anonymous, new_ticket())
            .await?;

        let result = service
            .create_ticket(UserIdentity::Anonymous, new_ticket())
            .await;

        assert!(
            matches!(result, Err(TicketsServiceError::NumberExhausted)),
            "expected NumberExhausted, got {result:?}"
        );
        assert_eq!(ctx.tickets.list_tickets(None).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn tickets_from_signed_in_users_keep_the_user() -> TestResult {
        let ctx = TestContext::new().await;

        let user = create_user(&ctx, "rahim").await?;

        let ticket = ctx
            .tickets
            .create_ticket(user.identity(), new_ticket())
            .await?;

        assert_eq!(ticket.user_uuid, Some(user.uuid));

        Ok(())
    }

    #[tokio::test]
    async fn resolving_and_closing_stamp_timestamps() -> TestResult {
        let ctx = TestContext::new().await;

        let ticket = open_ticket(&ctx).await?;

        ctx.tickets.mark_in_progress(ticket.uuid).await?;
        ctx.tickets.mark_waiting_customer(ticket.uuid).await?;
        ctx.tickets.mark_in_progress(ticket.uuid).await?;

        let resolved = ctx.tickets.mark_resolved(ticket.uuid).await?;

        assert_eq!(resolved.status, TicketStatus::Resolved);
        assert!(resolved.resolved_at.is_some());
        assert!(resolved.resolution_time().is_some());

        let closed = ctx.tickets.close_ticket(ticket.uuid).await?;

        assert_eq!(closed.status, TicketStatus::Closed);
        assert!(closed.closed_at.is_some());
        assert_eq!(closed.resolved_at, resolved.resolved_at);

        Ok(())
    }

    #[tokio::test]
    async fn open_tickets_cannot_be_resolved_directly() -> TestResult {
        let ctx = TestContext::new().await;

        let ticket = open_ticket(&ctx).await?;

        let result = ctx.tickets.mark_resolved(ticket.uuid).await;

        assert!(
            matches!(result, Err(ref error) if error.kind() == ErrorKind::Validation),
            "expected a validation error, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn closed_tickets_stay_closed() -> TestResult {
        let ctx = TestContext::new().await;

        let ticket = open_ticket(&ctx).await?;

        ctx.tickets.close_ticket(ticket.uuid).await?;

        let result = ctx.tickets.mark_in_progress(ticket.uuid).await;

        assert!(
            matches!(
                result,
                Err(TicketsServiceError::Ticket(TicketError::IllegalTransition { .. }))
            ),
            "expected IllegalTransition, got {result:?}"
        );

        let result = ctx.tickets.respond(ticket.uuid, "too late".to_string()).await;

        assert!(
            matches!(result, Err(TicketsServiceError::Ticket(TicketError::Closed))),
            "expected Closed, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn only_the_first_response_is_timed() -> TestResult {
        let ctx = TestContext::new().await;

        let ticket = open_ticket(&ctx).await?;

        let first = ctx
            .tickets
            .respond(ticket.uuid, "Looking into it".to_string())
            .await?;

        let responded_at = first.responded_at;

        assert!(responded_at.is_some());
        assert!(first.response_time().is_some());
        assert_eq!(first.status, TicketStatus::Open);

        let second = ctx
            .tickets
            .respond(ticket.uuid, "Refund issued".to_string())
            .await?;

        assert_eq!(second.responded_at, responded_at);
        assert_eq!(second.admin_response.as_deref(), Some("Refund issued"));

        Ok(())
    }

    #[tokio::test]
    async fn ratings_require_a_resolved_or_closed_ticket() -> TestResult {
        let ctx = TestContext::new().await;

        let ticket = open_ticket(&ctx).await?;

        let result = ctx
            .tickets
            .rate_ticket(ticket.uuid, Rating::new(4)?, None)
            .await;

        assert!(
            matches!(
                result,
                Err(TicketsServiceError::Ticket(TicketError::NotRateable(TicketStatus::Open)))
            ),
            "expected NotRateable, got {result:?}"
        );

        ctx.tickets.mark_in_progress(ticket.uuid).await?;
        ctx.tickets.mark_resolved(ticket.uuid).await?;

        let rated = ctx
            .tickets
            .rate_ticket(ticket.uuid, Rating::new(5)?, Some("Quick help".to_string()))
            .await?;

        assert_eq!(rated.rating, Some(Rating::new(5)?));
        assert_eq!(rated.feedback.as_deref(), Some("Quick help"));

        Ok(())
    }

    #[tokio::test]
    async fn list_tickets_filters_by_status() -> TestResult {
        let ctx = TestContext::new().await;

        let first = open_ticket(&ctx).await?;
        let second = open_ticket(&ctx).await?;

        ctx.tickets.mark_in_progress(second.uuid).await?;

        let open = ctx.tickets.list_tickets(Some(TicketStatus::Open)).await?;
        let all = ctx.tickets.list_tickets(None).await?;

        assert_eq!(
            open.iter().map(|ticket| ticket.uuid).collect::<Vec<_>>(),
            vec![first.uuid]
        );
        assert_eq!(all.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn set_priority_updates_the_ticket() -> TestResult {
        let ctx = TestContext::new().await;

        let ticket = open_ticket(&ctx).await?;

        let updated = ctx
            .tickets
            .set_priority(ticket.uuid, TicketPriority::Urgent)
            .await?;

        assert_eq!(updated.priority, TicketPriority::Urgent);

        Ok(())
    }

    #[tokio::test]
    async fn resolution_notes_are_stored_and_cleared() -> TestResult {
        let ctx = TestContext::new().await;

        let ticket = open_ticket(&ctx).await?;

        assert_eq!(ticket.resolution_notes, None);

        ctx.tickets.mark_in_progress(ticket.uuid).await?;
        ctx.tickets.mark_resolved(ticket.uuid).await?;

        let noted = ctx
            .tickets
            .set_resolution_notes(ticket.uuid, Some("Courier re-delivered".to_string()))
            .await?;

        assert_eq!(noted.resolution_notes.as_deref(), Some("Courier re-delivered"));
        assert_eq!(noted.status, TicketStatus::Resolved);

        let found = ctx.tickets.get_ticket(ticket.uuid).await?;

        assert_eq!(found.resolution_notes, noted.resolution_notes);

        let cleared = ctx.tickets.set_resolution_notes(ticket.uuid, None).await?;

        assert_eq!(cleared.resolution_notes, None);

        Ok(())
    }

    #[tokio::test]
    async fn resolution_notes_on_unknown_ticket_are_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .tickets
            .set_resolution_notes(TicketUuid::new(), Some("n/a".to_string()))
            .await;

        assert!(
            matches!(result, Err(TicketsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn replies_are_listed_oldest_first() -> TestResult {
        let ctx = TestContext::new().await;

        let user = create_user(&ctx, "karim").await?;
        let ticket = ctx
            .tickets
            .create_ticket(user.identity(), new_ticket())
            .await?;

        ctx.tickets
            .add_reply(NewTicketReply {
                ticket_uuid: ticket.uuid,
                user_uuid: Some(user.uuid),
                is_staff_reply: false,
                message: "Any update?".to_string(),
            })
            .await?;

        ctx.tickets
            .add_reply(NewTicketReply {
                ticket_uuid: ticket.uuid,
                user_uuid: None,
                is_staff_reply: true,
                message: "Shipped today.".to_string(),
            })
            .await?;

        let replies = ctx.tickets.list_replies(ticket.uuid).await?;

        assert_eq!(
            replies
                .iter()
                .map(|reply| (reply.is_staff_reply, reply.message.as_str()))
                .collect::<Vec<_>>(),
            vec![(false, "Any update?"), (true, "Shipped today.")]
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_ticket_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.tickets.get_ticket(TicketUuid::new()).await;

        assert!(
            matches!(result, Err(TicketsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
