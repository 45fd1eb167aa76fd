//! FAQs Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use storefront::faqs::{FaqCounter, FaqCounters};
use tracing::debug;

use crate::{
    database::{try_get_amount, try_get_text},
    domain::faqs::{
        data::NewFaq,
        records::{FaqRecord, FaqUuid},
    },
};

const CREATE_FAQ_SQL: &str = include_str!("sql/create_faq.sql");
const GET_FAQ_SQL: &str = include_str!("sql/get_faq.sql");
const LIST_FAQS_SQL: &str = include_str!("sql/list_faqs.sql");
const INCREMENT_FAQ_VIEWS_SQL: &str = include_str!("sql/increment_faq_views.sql");
const INCREMENT_FAQ_HELPFUL_SQL: &str = include_str!("sql/increment_faq_helpful.sql");
const INCREMENT_FAQ_NOT_HELPFUL_SQL: &str = include_str!("sql/increment_faq_not_helpful.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgFaqsRepository;

impl PgFaqsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_faq(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        faq: NewFaq,
        created_at: Timestamp,
    ) -> Result<FaqRecord, sqlx::Error> {
        query_as::<Postgres, FaqRecord>(CREATE_FAQ_SQL)
            .bind(faq.uuid.into_uuid())
            .bind(faq.category.as_str())
            .bind(faq.question)
            .bind(faq.answer)
            .bind(faq.display_order)
            .bind(faq.is_active)
            .bind(SqlxTimestamp::from(created_at))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_faq(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        faq: FaqUuid,
    ) -> Result<FaqRecord, sqlx::Error> {
        query_as::<Postgres, FaqRecord>(GET_FAQ_SQL)
            .bind(faq.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_faqs(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<FaqRecord>, sqlx::Error> {
        query_as::<Postgres, FaqRecord>(LIST_FAQS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// Bump one counter in place; no other column is written.
    pub(crate) async fn increment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        faq: FaqUuid,
        counter: FaqCounter,
    ) -> Result<FaqRecord, sqlx::Error> {
        let sql = match counter {
            FaqCounter::Views => INCREMENT_FAQ_VIEWS_SQL,
            FaqCounter::Helpful => INCREMENT_FAQ_HELPFUL_SQL,
            FaqCounter::NotHelpful => INCREMENT_FAQ_NOT_HELPFUL_SQL,
        };

        let record = query_as::<Postgres, FaqRecord>(sql)
            .bind(faq.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        debug!(faq_uuid = %record.uuid, ?counter, "incremented faq counter");

        Ok(record)
    }
}

impl<'r> FromRow<'r, PgRow> for FaqRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: FaqUuid::from_uuid(row.try_get("uuid")?),
            category: try_get_text(row, "category")?,
            question: row.try_get("question")?,
            answer: row.try_get("answer")?,
            display_order: row.try_get("display_order")?,
            is_active: row.try_get("is_active")?,
            counters: FaqCounters {
                views: try_get_amount(row, "views")?,
                helpful_count: try_get_amount(row, "helpful_count")?,
                not_helpful_count: try_get_amount(row, "not_helpful_count")?,
            },
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
