//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartsService},
        contact::{ContactService, PgContactService},
        faqs::{FaqsService, PgFaqsService},
        orders::{OrdersService, PgOrdersService},
        products::{PgProductsService, ProductsService},
        tickets::{PgTicketsService, TicketsService},
        users::{PgUsersService, UsersService},
    },
};

/// Errors raised while wiring the application.
#[derive(Debug, Error)]
pub enum AppInitError {
    /// The database could not be reached.
    #[error("failed to connect to database: {0}")]
    Database(#[source] sqlx::Error),
}

/// Every storefront service behind its trait, sharing one pool.
#[derive(Clone)]
pub struct AppContext {
    pub users: Arc<dyn UsersService>,
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub tickets: Arc<dyn TicketsService>,
    pub faqs: Arc<dyn FaqsService>,
    pub contact: Arc<dyn ContactService>,
}

impl AppContext {
    /// Wire every service onto one shared pool.
    #[must_use]
    pub fn new(db: &Db) -> Self {
        Self {
            users: Arc::new(PgUsersService::new(db.clone())),
            products: Arc::new(PgProductsService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone())),
            tickets: Arc::new(PgTicketsService::new(db.clone())),
            faqs: Arc::new(PgFaqsService::new(db.clone())),
            contact: Arc::new(PgContactService::new(db.clone())),
        }
    }

    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::new(&Db::new(pool)))
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use storefront::orders::{OrderStatus, OrderTransition};
    use testresult::TestResult;

    use crate::{
        domain::orders::{MockOrdersService, OrdersServiceError, records::OrderUuid},
        test::TestContext,
    };

    use super::*;

    #[tokio::test]
    async fn context_services_share_one_database() -> TestResult {
        let test = TestContext::new().await;
        let ctx = AppContext::new(&Db::new(test.db_pool()));

        assert!(ctx.products.list_products().await?.is_empty());
        assert!(ctx.orders.list_all_orders(None).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn services_can_be_replaced_with_mocks() {
        let test = TestContext::new().await;
        let mut ctx = AppContext::new(&Db::new(test.db_pool()));

        let mut orders = MockOrdersService::new();

        orders
            .expect_transition_order()
            .withf(|_, transition| *transition == OrderTransition::Refund)
            .returning(|_, _| Err(OrdersServiceError::NotFound));

        ctx.orders = Arc::new(orders);

        let result = ctx
            .orders
            .transition_order(OrderUuid::new(), OrderTransition::Refund)
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
        assert_eq!(OrderTransition::Refund.target(), OrderStatus::Refunded);
    }
}
