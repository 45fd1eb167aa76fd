//! Products service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::products::{
        ProductsServiceError,
        data::NewProduct,
        records::{ProductRecord, ProductUuid},
        repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    #[tracing::instrument(name = "products.service.list_products", skip(self), err)]
    async fn list_products(&self) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let products = self.repository.list_products(&mut tx).await?;

        tx.commit().await?;

        Ok(products)
    }

    #[tracing::instrument(
        name = "products.service.get_product",
        skip(self),
        fields(product_uuid = %product),
        err
    )]
    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    #[tracing::instrument(
        name = "products.service.create_product",
        skip(self, product),
        fields(product_uuid = %product.uuid, sku = product.sku),
        err
    )]
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = self
            .repository
            .create_product(&mut tx, product, Timestamp::now())
            .await?;

        tx.commit().await?;

        info!(product_uuid = %created.uuid, "created product");

        Ok(created)
    }

    #[tracing::instrument(
        name = "products.service.delete_product",
        skip(self),
        fields(product_uuid = %product),
        err
    )]
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        info!(product_uuid = %product, "deleted product");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves all products.
    async fn list_products(&self) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, ProductsServiceError>;

    /// Creates a new product.
    async fn create_product(&self, product: NewProduct)
    -> Result<ProductRecord, ProductsServiceError>;

    /// Deletes a product along with every cart line and order that references it.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use storefront::prelude::Quantity;
    use testresult::TestResult;

    use crate::{
        domain::{
            carts::CartsService,
            orders::{OrdersService, OrdersServiceError},
        },
        test::{
            TestContext,
            helpers::{create_product, create_user, new_product},
        },
    };

    use super::*;

    #[tokio::test]
    async fn create_product_returns_the_stored_product() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.products.create_product(new_product(1001, Some(500))).await?;

        assert_eq!(product.sku, 1001);
        assert_eq!(product.price, Some(500));
        assert!(product.display_price()?.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn products_may_be_unpriced() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.products.create_product(new_product(1002, None)).await?;

        assert_eq!(product.price, None);
        assert_eq!(product.display_price()?, None);

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_sku_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.products.create_product(new_product(1003, Some(100))).await?;

        let result = ctx.products.create_product(new_product(1003, Some(200))).await;

        assert!(
            matches!(result, Err(ProductsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn get_product_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.products.get_product(ProductUuid::new()).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_products_returns_every_product() -> TestResult {
        let ctx = TestContext::new().await;

        create_product(&ctx, 2001, Some(100)).await?;
        create_product(&ctx, 2002, Some(200)).await?;

        let products = ctx.products.list_products().await?;

        assert_eq!(products.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn delete_product_cascades_to_cart_lines_and_orders() -> TestResult {
        let ctx = TestContext::new().await;

        let user = create_user(&ctx, "farhan").await?;
        let product = create_product(&ctx, 3001, Some(750)).await?;

        ctx.carts
            .add_item(user.identity(), product.uuid, Quantity::ONE)
            .await?;

        let order = ctx.orders.place_order(user.identity(), product.uuid).await?;

        ctx.products.delete_product(product.uuid).await?;

        let cart = ctx.carts.get_cart(user.identity()).await?;

        assert!(cart.totals.is_empty(), "expected the cart line to be removed");

        let result = ctx.orders.get_order(order.uuid).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_product_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.products.delete_product(ProductUuid::new()).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
