//! Carts Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use storefront::cart::Quantity;
use tracing::debug;

use crate::{
    database::try_get_optional_amount,
    domain::{
        carts::records::{CartLineOwner, CartLineRecord, CartLineUuid},
        products::records::ProductUuid,
        users::records::UserUuid,
    },
};

const UPSERT_CART_LINE_SQL: &str = include_str!("sql/upsert_cart_line.sql");
const GET_CART_LINES_SQL: &str = include_str!("sql/get_cart_lines.sql");
const LOCK_CART_LINE_SQL: &str = include_str!("sql/lock_cart_line.sql");
const LOCK_CART_LINES_SQL: &str = include_str!("sql/lock_cart_lines.sql");
const DELETE_CART_LINE_SQL: &str = include_str!("sql/delete_cart_line.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert a line for `(user, product)` or add `quantity` to the existing one.
    pub(crate) async fn upsert_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
        quantity: Quantity,
        at: Timestamp,
    ) -> Result<CartLineRecord, sqlx::Error> {
        let line = query_as::<Postgres, CartLineRecord>(UPSERT_CART_LINE_SQL)
            .bind(CartLineUuid::new().into_uuid())
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .bind(i64::from(quantity))
            .bind(SqlxTimestamp::from(at))
            .fetch_one(&mut **tx)
            .await?;

        debug!(
            cart_line_uuid = %line.uuid,
            quantity = line.quantity.get(),
            "upserted cart line"
        );

        Ok(line)
    }

    pub(crate) async fn get_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<CartLineRecord>, sqlx::Error> {
        query_as::<Postgres, CartLineRecord>(GET_CART_LINES_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn lock_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        line: CartLineUuid,
    ) -> Result<Option<CartLineOwner>, sqlx::Error> {
        query_as::<Postgres, CartLineOwner>(LOCK_CART_LINE_SQL)
            .bind(line.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn lock_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<CartLineOwner>, sqlx::Error> {
        query_as::<Postgres, CartLineOwner>(LOCK_CART_LINES_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn delete_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        line: CartLineUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_LINE_SQL)
            .bind(line.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        debug!(cart_line_uuid = %line, rows_affected, "deleted cart line");

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartLineRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity =
            Quantity::new(row.try_get("quantity")?).map_err(|error| sqlx::Error::ColumnDecode {
                index: "quantity".to_string(),
                source: Box::new(error),
            })?;

        Ok(Self {
            uuid: CartLineUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            product_name: row.try_get("product_name")?,
            product_price: try_get_optional_amount(row, "product_price")?,
            quantity,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CartLineOwner {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartLineUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
        })
    }
}
