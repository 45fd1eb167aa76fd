//! Orders service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use storefront::orders::{OrderStatus, OrderTransition};
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::{
        carts::{records::CartLineUuid, repository::PgCartsRepository},
        orders::{
            OrdersServiceError,
            records::{OrderRecord, OrderUuid},
            repository::PgOrdersRepository,
        },
        products::records::ProductUuid,
        users::records::UserIdentity,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders: PgOrdersRepository,
    carts: PgCartsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            carts: PgCartsRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.place_order",
        skip(self),
        fields(product_uuid = %product, order_uuid = tracing::field::Empty),
        err
    )]
    async fn place_order(
        &self,
        identity: UserIdentity,
        product: ProductUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let user = identity.require_user()?;

        let mut tx = self.db.begin_transaction().await?;

        let order = self
            .orders
            .create_order(&mut tx, user, product, Timestamp::now())
            .await?;

        tx.commit().await?;

        Span::current().record("order_uuid", tracing::field::display(order.uuid));

        info!(order_number = %order.order_number(), "placed order");

        Ok(order)
    }

    #[tracing::instrument(
        name = "orders.service.checkout_line",
        skip(self),
        fields(cart_line_uuid = %line),
        err
    )]
    async fn checkout_line(
        &self,
        identity: UserIdentity,
        line: CartLineUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let user = identity.require_user()?;

        let mut tx = self.db.begin_transaction().await?;

        let Some(owner) = self.carts.lock_line(&mut tx, line).await? else {
            return Err(OrdersServiceError::NotFound);
        };

        if owner.user_uuid != user {
            return Err(OrdersServiceError::PermissionDenied);
        }

        let order = self
            .orders
            .create_order(&mut tx, user, owner.product_uuid, Timestamp::now())
            .await?;

        self.carts.delete_line(&mut tx, line).await?;

        tx.commit().await?;

        info!(order_number = %order.order_number(), "checked out cart line");

        Ok(order)
    }

    #[tracing::instrument(
        name = "orders.service.checkout_cart",
        skip(self),
        fields(order_count = tracing::field::Empty),
        err
    )]
    async fn checkout_cart(
        &self,
        identity: UserIdentity,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let user = identity.require_user()?;

        let mut tx = self.db.begin_transaction().await?;

        let lines = self.carts.lock_lines(&mut tx, user).await?;

        if lines.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let placed_at = Timestamp::now();
        let mut orders = Vec::with_capacity(lines.len());

        for line in lines {
            let order = self
                .orders
                .create_order(&mut tx, user, line.product_uuid, placed_at)
                .await?;

            self.carts.delete_line(&mut tx, line.uuid).await?;

            orders.push(order);
        }

        tx.commit().await?;

        Span::current().record("order_count", tracing::field::display(orders.len()));

        info!("checked out cart");

        Ok(orders)
    }

    #[tracing::instrument(
        name = "orders.service.get_order",
        skip(self),
        fields(order_uuid = %order),
        err
    )]
    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let order = self.orders.get_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(order)
    }

    #[tracing::instrument(name = "orders.service.get_order_by_number", skip(self), err)]
    async fn get_order_by_number(&self, order_id: i64) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let order = self.orders.get_order_by_id(&mut tx, order_id).await?;

        tx.commit().await?;

        Ok(order)
    }

    #[tracing::instrument(name = "orders.service.list_orders", skip(self), err)]
    async fn list_orders(
        &self,
        identity: UserIdentity,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let user = identity.require_user()?;

        let mut tx = self.db.begin_transaction().await?;

        let orders = self.orders.list_user_orders(&mut tx, user).await?;

        tx.commit().await?;

        Ok(orders)
    }

    #[tracing::instrument(name = "orders.service.list_all_orders", skip(self), err)]
    async fn list_all_orders(
        &self,
        status: Option<OrderStatus>,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let orders = self.orders.list_orders(&mut tx, status).await?;

        tx.commit().await?;

        Ok(orders)
    }

    #[tracing::instrument(
        name = "orders.service.transition_order",
        skip(self, transition),
        fields(order_uuid = %order, transition = %transition),
        err
    )]
    async fn transition_order(
        &self,
        order: OrderUuid,
        transition: OrderTransition,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let locked = self.orders.lock_order(&mut tx, order).await?;

        let mut lifecycle = locked.lifecycle();
        let now = Timestamp::now();

        let from = lifecycle.status;
        let to = lifecycle.apply(transition, now)?;

        let updated = self
            .orders
            .update_lifecycle(&mut tx, order, &lifecycle, now)
            .await?;

        tx.commit().await?;

        info!(
            order_number = %updated.order_number(),
            from = %from,
            to = %to,
            "order status changed"
        );

        Ok(updated)
    }

    async fn confirm(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        self.transition_order(order, OrderTransition::Confirm).await
    }

    async fn mark_processing(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        self.transition_order(order, OrderTransition::MarkProcessing)
            .await
    }

    async fn mark_shipped(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        self.transition_order(order, OrderTransition::MarkShipped)
            .await
    }

    async fn mark_delivered(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        self.transition_order(order, OrderTransition::MarkDelivered)
            .await
    }

    async fn cancel(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        self.transition_order(order, OrderTransition::Cancel).await
    }

    async fn refund(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        self.transition_order(order, OrderTransition::Refund).await
    }

    #[tracing::instrument(
        name = "orders.service.update_notes",
        skip(self, notes),
        fields(order_uuid = %order),
        err
    )]
    async fn update_notes(
        &self,
        order: OrderUuid,
        notes: Option<String>,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let order = self
            .orders
            .update_notes(&mut tx, order, notes, Timestamp::now())
            .await?;

        tx.commit().await?;

        Ok(order)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Place a direct purchase of one product.
    async fn place_order(
        &self,
        identity: UserIdentity,
        product: ProductUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Turn one of the caller's cart lines into an order, removing the line.
    async fn checkout_line(
        &self,
        identity: UserIdentity,
        line: CartLineUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Turn every line in the caller's cart into an order and empty the cart.
    async fn checkout_cart(
        &self,
        identity: UserIdentity,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Retrieve a single order.
    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;

    /// Retrieve an order by its sequential number.
    async fn get_order_by_number(&self, order_id: i64) -> Result<OrderRecord, OrdersServiceError>;

    /// The caller's orders, newest first.
    async fn list_orders(
        &self,
        identity: UserIdentity,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Every order newest first, optionally limited to one status.
    async fn list_all_orders(
        &self,
        status: Option<OrderStatus>,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Apply a status transition under a row lock, stamping its timestamp.
    async fn transition_order(
        &self,
        order: OrderUuid,
        transition: OrderTransition,
    ) -> Result<OrderRecord, OrdersServiceError>;

    async fn confirm(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;

    async fn mark_processing(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;

    async fn mark_shipped(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;

    async fn mark_delivered(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;

    async fn cancel(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;

    /// Administrative refund; allowed from any status except `refunded`.
    async fn refund(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;

    /// Replace the admin notes on an order.
    async fn update_notes(
        &self,
        order: OrderUuid,
        notes: Option<String>,
    ) -> Result<OrderRecord, OrdersServiceError>;
}
