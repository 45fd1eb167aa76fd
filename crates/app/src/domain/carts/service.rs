//! Carts service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use storefront::cart::{CartTotals, Quantity};
use tracing::info;

use crate::{
    database::Db,
    domain::{
        carts::{
            CartsServiceError,
            records::{CartLineRecord, CartLineUuid, CartSummary},
            repository::PgCartsRepository,
        },
        products::records::ProductUuid,
        users::records::UserIdentity,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    repository: PgCartsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCartsRepository::new(),
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, quantity),
        fields(product_uuid = %product, quantity = quantity.get()),
        err
    )]
    async fn add_item(
        &self,
        identity: UserIdentity,
        product: ProductUuid,
        quantity: Quantity,
    ) -> Result<CartLineRecord, CartsServiceError> {
        let user = identity.require_user()?;

        let mut tx = self.db.begin_transaction().await?;

        let line = self
            .repository
            .upsert_line(&mut tx, user, product, quantity, Timestamp::now())
            .await?;

        tx.commit().await?;

        info!(
            cart_line_uuid = %line.uuid,
            quantity = line.quantity.get(),
            "added item to cart"
        );

        Ok(line)
    }

    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip(self),
        fields(cart_line_uuid = %line),
        err
    )]
    async fn remove_item(
        &self,
        identity: UserIdentity,
        line: CartLineUuid,
    ) -> Result<(), CartsServiceError> {
        let user = identity.require_user()?;

        let mut tx = self.db.begin_transaction().await?;

        let Some(owner) = self.repository.lock_line(&mut tx, line).await? else {
            return Err(CartsServiceError::NotFound);
        };

        if owner.user_uuid != user {
            return Err(CartsServiceError::PermissionDenied);
        }

        self.repository.delete_line(&mut tx, line).await?;

        tx.commit().await?;

        info!(cart_line_uuid = %line, "removed item from cart");

        Ok(())
    }

    #[tracing::instrument(name = "carts.service.get_cart", skip(self), err)]
    async fn get_cart(&self, identity: UserIdentity) -> Result<CartSummary, CartsServiceError> {
        let user = identity.require_user()?;

        let mut tx = self.db.begin_transaction().await?;

        let lines = self.repository.get_lines(&mut tx, user).await?;

        tx.commit().await?;

        let totals = CartTotals::from_lines(&lines)?;

        Ok(CartSummary { lines, totals })
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Add `quantity` of a product, merging into the existing line for it.
    async fn add_item(
        &self,
        identity: UserIdentity,
        product: ProductUuid,
        quantity: Quantity,
    ) -> Result<CartLineRecord, CartsServiceError>;

    /// Remove one of the caller's own cart lines.
    async fn remove_item(
        &self,
        identity: UserIdentity,
        line: CartLineUuid,
    ) -> Result<(), CartsServiceError>;

    /// The caller's cart lines, oldest first, with totals.
    async fn get_cart(&self, identity: UserIdentity) -> Result<CartSummary, CartsServiceError>;
}
