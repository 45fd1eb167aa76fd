//! FAQs service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use storefront::faqs::FaqCounter;

use crate::{
    database::Db,
    domain::faqs::{
        FaqsServiceError,
        data::NewFaq,
        records::{FaqRecord, FaqUuid},
        repository::PgFaqsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgFaqsService {
    db: Db,
    repository: PgFaqsRepository,
}

impl PgFaqsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgFaqsRepository::new(),
        }
    }
}

#[async_trait]
impl FaqsService for PgFaqsService {
    #[tracing::instrument(
        name = "faqs.service.create_faq",
        skip(self, faq),
        fields(faq_uuid = %faq.uuid, category = %faq.category),
        err
    )]
    async fn create_faq(&self, faq: NewFaq) -> Result<FaqRecord, FaqsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self
            .repository
            .create_faq(&mut tx, faq, Timestamp::now())
            .await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(
        name = "faqs.service.get_faq",
        skip(self),
        fields(faq_uuid = %faq),
        err
    )]
    async fn get_faq(&self, faq: FaqUuid) -> Result<FaqRecord, FaqsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.repository.get_faq(&mut tx, faq).await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(name = "faqs.service.list_faqs", skip(self), err)]
    async fn list_faqs(&self) -> Result<Vec<FaqRecord>, FaqsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let faqs = self.repository.list_faqs(&mut tx).await?;

        tx.commit().await?;

        Ok(faqs)
    }

    #[tracing::instrument(
        name = "faqs.service.increment_counter",
        skip(self),
        fields(faq_uuid = %faq),
        err
    )]
    async fn increment_counter(
        &self,
        faq: FaqUuid,
        counter: FaqCounter,
    ) -> Result<FaqRecord, FaqsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.repository.increment(&mut tx, faq, counter).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn increment_views(&self, faq: FaqUuid) -> Result<FaqRecord, FaqsServiceError> {
        self.increment_counter(faq, FaqCounter::Views).await
    }

    async fn mark_helpful(&self, faq: FaqUuid) -> Result<FaqRecord, FaqsServiceError> {
        self.increment_counter(faq, FaqCounter::Helpful).await
    }

    async fn mark_not_helpful(&self, faq: FaqUuid) -> Result<FaqRecord, FaqsServiceError> {
        self.increment_counter(faq, FaqCounter::NotHelpful).await
    }
}

#[automock]
#[async_trait]
pub trait FaqsService: Send + Sync {
    async fn create_faq(&self, faq: NewFaq) -> Result<FaqRecord, FaqsServiceError>;

    async fn get_faq(&self, faq: FaqUuid) -> Result<FaqRecord, FaqsServiceError>;

    /// Active entries ordered by category, then display order.
    async fn list_faqs(&self) -> Result<Vec<FaqRecord>, FaqsServiceError>;

    /// Atomically add one to a single counter.
    async fn increment_counter(
        &self,
        faq: FaqUuid,
        counter: FaqCounter,
    ) -> Result<FaqRecord, FaqsServiceError>;

    async fn increment_views(&self, faq: FaqUuid) -> Result<FaqRecord, FaqsServiceError>;

    async fn mark_helpful(&self, faq: FaqUuid) -> Result<FaqRecord, FaqsServiceError>;

    async fn mark_not_helpful(&self, faq: FaqUuid) -> Result<FaqRecord, FaqsServiceError>;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use storefront::faqs::{FaqCategory, FaqCounters};
    use testresult::TestResult;

    use crate::test::{
        TestContext,
        helpers::{create_faq, new_faq},
    };

    use super::*;

    #[tokio::test]
    async fn two_views_from_zero_leave_other_counters_alone() -> TestResult {
        let ctx = TestContext::new().await;

        let faq = create_faq(&ctx, FaqCategory::Orders, 1).await?;

        assert_eq!(faq.counters, FaqCounters::default());

        ctx.faqs.increment_views(faq.uuid).await?;
        let viewed = ctx.faqs.increment_views(faq.uuid).await?;

        assert_eq!(viewed.counters.views, 2);
        assert_eq!(viewed.counters.helpful_count, 0);
        assert_eq!(viewed.counters.not_helpful_count, 0);
        assert_eq!(viewed.updated_at, faq.updated_at);

        Ok(())
    }

    #[tokio::test]
    async fn votes_track_the_in_memory_counters() -> TestResult {
        let ctx = TestContext::new().await;

        let faq = create_faq(&ctx, FaqCategory::Payments, 1).await?;

        let mut expected = faq.counters;

        for counter in [FaqCounter::Helpful, FaqCounter::Helpful, FaqCounter::NotHelpful] {
            expected.increment(counter);
            ctx.faqs.increment_counter(faq.uuid, counter).await?;
        }

        let stored = ctx.faqs.get_faq(faq.uuid).await?;

        assert_eq!(stored.counters, expected);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_views_are_not_lost() -> TestResult {
        let ctx = TestContext::new().await;

        let faq = create_faq(&ctx, FaqCategory::General, 1).await?;
        let faqs = Arc::new(ctx.faqs.clone());

        let handles = (0..8)
            .map(|_| {
                let faqs = Arc::clone(&faqs);
                tokio::spawn(async move { faqs.increment_views(faq.uuid).await })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            handle.await??;
        }

        let stored = ctx.faqs.get_faq(faq.uuid).await?;

        assert_eq!(stored.counters.views, 8);

        Ok(())
    }

    #[tokio::test]
    async fn list_faqs_hides_inactive_and_orders_by_category() -> TestResult {
        let ctx = TestContext::new().await;

        let second = create_faq(&ctx, FaqCategory::Shipping, 2).await?;
        let first = create_faq(&ctx, FaqCategory::Shipping, 1).await?;
        let general = create_faq(&ctx, FaqCategory::General, 5).await?;

        let mut hidden = new_faq(FaqCategory::General, 0);
        hidden.is_active = false;
        ctx.faqs.create_faq(hidden).await?;

        let faqs = ctx.faqs.list_faqs().await?;

        assert_eq!(
            faqs.iter().map(|faq| faq.uuid).collect::<Vec<_>>(),
            vec![general.uuid, first.uuid, second.uuid]
        );

        Ok(())
    }

    #[tokio::test]
    async fn counting_an_unknown_faq_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.faqs.mark_helpful(FaqUuid::new()).await;

        assert!(
            matches!(result, Err(FaqsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
