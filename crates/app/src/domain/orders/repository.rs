//! Orders Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use storefront::orders::{OrderLifecycle, OrderStatus};
use tracing::debug;

use crate::{
    database::{try_get_optional_amount, try_get_optional_timestamp, try_get_text},
    domain::{
        orders::records::{OrderRecord, OrderUuid},
        products::records::ProductUuid,
        users::records::UserUuid,
    },
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const GET_ORDER_BY_ID_SQL: &str = include_str!("sql/get_order_by_id.sql");
const LOCK_ORDER_SQL: &str = include_str!("sql/lock_order.sql");
const LIST_USER_ORDERS_SQL: &str = include_str!("sql/list_user_orders.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const UPDATE_ORDER_LIFECYCLE_SQL: &str = include_str!("sql/update_order_lifecycle.sql");
const UPDATE_ORDER_NOTES_SQL: &str = include_str!("sql/update_order_notes.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
        placed_at: Timestamp,
    ) -> Result<OrderRecord, sqlx::Error> {
        let order = query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(OrderUuid::new().into_uuid())
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .bind(SqlxTimestamp::from(placed_at))
            .fetch_one(&mut **tx)
            .await?;

        debug!(order_uuid = %order.uuid, order_id = order.order_id, "inserted order");

        Ok(order)
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order_by_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order_id: i64,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_BY_ID_SQL)
            .bind(order_id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch an order and hold its row lock until the transaction ends.
    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_USER_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        status: Option<OrderStatus>,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(status.map(OrderStatus::as_str))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_lifecycle(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        lifecycle: &OrderLifecycle,
        updated_at: Timestamp,
    ) -> Result<OrderRecord, sqlx::Error> {
        let order = query_as::<Postgres, OrderRecord>(UPDATE_ORDER_LIFECYCLE_SQL)
            .bind(order.into_uuid())
            .bind(lifecycle.status.as_str())
            .bind(lifecycle.confirmed_at.map(SqlxTimestamp::from))
            .bind(lifecycle.shipped_at.map(SqlxTimestamp::from))
            .bind(lifecycle.delivered_at.map(SqlxTimestamp::from))
            .bind(lifecycle.cancelled_at.map(SqlxTimestamp::from))
            .bind(lifecycle.refunded_at.map(SqlxTimestamp::from))
            .bind(SqlxTimestamp::from(updated_at))
            .fetch_one(&mut **tx)
            .await?;

        debug!(order_uuid = %order.uuid, status = %order.status, "updated order lifecycle");

        Ok(order)
    }

    pub(crate) async fn update_notes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        notes: Option<String>,
        updated_at: Timestamp,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(UPDATE_ORDER_NOTES_SQL)
            .bind(order.into_uuid())
            .bind(notes)
            .bind(SqlxTimestamp::from(updated_at))
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            order_id: row.try_get("order_id")?,
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            product_name: row.try_get("product_name")?,
            product_price: try_get_optional_amount(row, "product_price")?,
            status: try_get_text(row, "status")?,
            notes: row.try_get("notes")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            confirmed_at: try_get_optional_timestamp(row, "confirmed_at")?,
            shipped_at: try_get_optional_timestamp(row, "shipped_at")?,
            delivered_at: try_get_optional_timestamp(row, "delivered_at")?,
            cancelled_at: try_get_optional_timestamp(row, "cancelled_at")?,
            refunded_at: try_get_optional_timestamp(row, "refunded_at")?,
        })
    }
}
