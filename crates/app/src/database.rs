//! Database connection management

use std::{error::Error as StdError, str::FromStr};

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{PgPool, Postgres, Row, Transaction, migrate::MigrateError, postgres::PgRow};

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction; every service call runs inside exactly one.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction fails.
    pub async fn begin_transaction(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Returns the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Apply pending schema migrations.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

fn column_decode_error<E>(column: &str, error: E) -> sqlx::Error
where
    E: StdError + Send + Sync + 'static,
{
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(error),
    }
}

/// Read a non-negative `BIGINT` column as `u64`.
pub(crate) fn try_get_amount(row: &PgRow, column: &str) -> sqlx::Result<u64> {
    let value: i64 = row.try_get(column)?;

    u64::try_from(value).map_err(|error| column_decode_error(column, error))
}

/// Read a nullable non-negative `BIGINT` column as `Option<u64>`.
pub(crate) fn try_get_optional_amount(row: &PgRow, column: &str) -> sqlx::Result<Option<u64>> {
    let value: Option<i64> = row.try_get(column)?;

    value
        .map(u64::try_from)
        .transpose()
        .map_err(|error| column_decode_error(column, error))
}

/// Read a nullable `TIMESTAMPTZ` column.
pub(crate) fn try_get_optional_timestamp(
    row: &PgRow,
    column: &str,
) -> sqlx::Result<Option<Timestamp>> {
    Ok(row
        .try_get::<Option<SqlxTimestamp>, _>(column)?
        .map(SqlxTimestamp::to_jiff))
}

/// Read a `TEXT` column holding one of a closed set of values.
pub(crate) fn try_get_text<T>(row: &PgRow, column: &str) -> sqlx::Result<T>
where
    T: FromStr,
    T::Err: StdError + Send + Sync + 'static,
{
    let value: String = row.try_get(column)?;

    value
        .parse()
        .map_err(|error| column_decode_error(column, error))
}

/// Convert a domain value into a column, reporting failures as encode errors.
pub(crate) fn try_encode<T, U>(column: &str, value: T) -> sqlx::Result<U>
where
    U: TryFrom<T>,
    U::Error: StdError + Send + Sync + 'static,
{
    U::try_from(value).map_err(|error| column_decode_error(column, error))
}
