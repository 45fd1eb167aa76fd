//! Contact Messages Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::contact::{
    data::NewContactMessage,
    records::{ContactMessageRecord, ContactMessageUuid},
};

const CREATE_MESSAGE_SQL: &str = include_str!("sql/create_message.sql");
const LIST_MESSAGES_SQL: &str = include_str!("sql/list_messages.sql");
const SET_MESSAGE_READ_SQL: &str = include_str!("sql/set_message_read.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgContactRepository;

impl PgContactRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_message(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        message: NewContactMessage,
        created_at: Timestamp,
    ) -> Result<ContactMessageRecord, sqlx::Error> {
        query_as::<Postgres, ContactMessageRecord>(CREATE_MESSAGE_SQL)
            .bind(ContactMessageUuid::new().into_uuid())
            .bind(message.name)
            .bind(message.email)
            .bind(message.phone)
            .bind(message.subject)
            .bind(message.message)
            .bind(SqlxTimestamp::from(created_at))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_messages(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        is_read: Option<bool>,
    ) -> Result<Vec<ContactMessageRecord>, sqlx::Error> {
        query_as::<Postgres, ContactMessageRecord>(LIST_MESSAGES_SQL)
            .bind(is_read)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn set_read(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        message: ContactMessageUuid,
        is_read: bool,
    ) -> Result<ContactMessageRecord, sqlx::Error> {
        query_as::<Postgres, ContactMessageRecord>(SET_MESSAGE_READ_SQL)
            .bind(message.into_uuid())
            .bind(is_read)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ContactMessageRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ContactMessageUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            subject: row.try_get("subject")?,
            message: row.try_get("message")?,
            is_read: row.try_get("is_read")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
