//! Contact messages service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::contact::{
        ContactServiceError,
        data::NewContactMessage,
        records::{ContactMessageRecord, ContactMessageUuid},
        repository::PgContactRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgContactService {
    db: Db,
    repository: PgContactRepository,
}

impl PgContactService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgContactRepository::new(),
        }
    }

    async fn set_read(
        &self,
        message: ContactMessageUuid,
        is_read: bool,
    ) -> Result<ContactMessageRecord, ContactServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.repository.set_read(&mut tx, message, is_read).await?;

        tx.commit().await?;

        Ok(record)
    }
}

#[async_trait]
impl ContactService for PgContactService {
    #[tracing::instrument(name = "contact.service.create_message", skip(self, message), err)]
    async fn create_message(
        &self,
        message: NewContactMessage,
    ) -> Result<ContactMessageRecord, ContactServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self
            .repository
            .create_message(&mut tx, message, Timestamp::now())
            .await?;

        tx.commit().await?;

        info!(message_uuid = %record.uuid, "received contact message");

        Ok(record)
    }

    #[tracing::instrument(name = "contact.service.list_messages", skip(self), err)]
    async fn list_messages(
        &self,
        is_read: Option<bool>,
    ) -> Result<Vec<ContactMessageRecord>, ContactServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let messages = self.repository.list_messages(&mut tx, is_read).await?;

        tx.commit().await?;

        Ok(messages)
    }

    #[tracing::instrument(
        name = "contact.service.mark_read",
        skip(self),
        fields(message_uuid = %message),
        err
    )]
    async fn mark_read(
        &self,
        message: ContactMessageUuid,
    ) -> Result<ContactMessageRecord, ContactServiceError> {
        self.set_read(message, true).await
    }

    #[tracing::instrument(
        name = "contact.service.mark_unread",
        skip(self),
        fields(message_uuid = %message),
        err
    )]
    async fn mark_unread(
        &self,
        message: ContactMessageUuid,
    ) -> Result<ContactMessageRecord, ContactServiceError> {
        self.set_read(message, false).await
    }
}

#[automock]
#[async_trait]
pub trait ContactService: Send + Sync {
    /// Store a message from the contact form.
    async fn create_message(
        &self,
        message: NewContactMessage,
    ) -> Result<ContactMessageRecord, ContactServiceError>;

    /// Messages newest first, optionally filtered by read state.
    async fn list_messages(
        &self,
        is_read: Option<bool>,
    ) -> Result<Vec<ContactMessageRecord>, ContactServiceError>;

    async fn mark_read(
        &self,
        message: ContactMessageUuid,
    ) -> Result<ContactMessageRecord, ContactServiceError>;

    async fn mark_unread(
        &self,
        message: ContactMessageUuid,
    ) -> Result<ContactMessageRecord, ContactServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::{TestContext, helpers::new_contact_message};

    use super::*;

    #[tokio::test]
    async fn messages_start_unread() -> TestResult {
        let ctx = TestContext::new().await;

        let message = ctx
            .contact
            .create_message(new_contact_message("Bulk order"))
            .await?;

        assert!(!message.is_read);

        Ok(())
    }

    #[tokio::test]
    async fn mark_read_and_unread_toggle_the_flag() -> TestResult {
        let ctx = TestContext::new().await;

        let message = ctx
            .contact
            .create_message(new_contact_message("Late delivery"))
            .await?;

        let read = ctx.contact.mark_read(message.uuid).await?;

        assert!(read.is_read);

        let unread = ctx.contact.mark_unread(message.uuid).await?;

        assert!(!unread.is_read);

        Ok(())
    }

    #[tokio::test]
    async fn list_messages_filters_by_read_state() -> TestResult {
        let ctx = TestContext::new().await;

        let first = ctx
            .contact
            .create_message(new_contact_message("First"))
            .await?;
        let second = ctx
            .contact
            .create_message(new_contact_message("Second"))
            .await?;

        ctx.contact.mark_read(first.uuid).await?;

        let unread = ctx.contact.list_messages(Some(false)).await?;
        let all = ctx.contact.list_messages(None).await?;

        assert_eq!(
            unread.iter().map(|message| message.uuid).collect::<Vec<_>>(),
            vec![second.uuid]
        );
        assert_eq!(all.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn marking_an_unknown_message_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.contact.mark_read(ContactMessageUuid::new()).await;

        assert!(
            matches!(result, Err(ContactServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
