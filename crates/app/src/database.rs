//! Database connection management

use std::{error::Error as StdError, str::FromStr};

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow, query, query_scalar};

use crate::domain::tenants::models::TenantUuid;

/// SQL used to set tenant context for row-level security.
pub const SET_TENANT_CONTEXT_SQL: &str = "SELECT set_config('app.current_tenant_uuid', $1, true)";

const ROLE_BYPASSES_RLS_SQL: &str =
    "SELECT rolsuper OR rolbypassrls FROM pg_roles WHERE rolname = current_user";

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for statements that run outside a tenant.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a transaction and set tenant context for RLS policies.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction or setting tenant context fails.
    pub async fn begin_tenant_transaction(
        &self,
        tenant: TenantUuid,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        query(SET_TENANT_CONTEXT_SQL)
            .bind(tenant.into_uuid().to_string())
            .execute(&mut *tx)
            .await?;

        Ok(tx)
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

/// Whether the connected role skips row-level security (superuser or `BYPASSRLS`).
///
/// # Errors
///
/// Returns an error if the role lookup fails.
pub async fn role_bypasses_rls(pool: &PgPool) -> Result<bool, sqlx::Error> {
    query_scalar(ROLE_BYPASSES_RLS_SQL).fetch_one(pool).await
}

pub(crate) fn decode_error<E>(column: &str, error: E) -> sqlx::Error
where
    E: StdError + Send + Sync + 'static,
{
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(error),
    }
}

/// Reads a text column and parses it into a domain value.
pub(crate) fn try_get_parsed<T>(row: &PgRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: StdError + Send + Sync + 'static,
{
    let raw: String = row.try_get(column)?;

    raw.parse().map_err(|error| decode_error(column, error))
}

/// Reads a nullable text column and parses it into a domain value.
pub(crate) fn try_get_parsed_opt<T>(row: &PgRow, column: &str) -> Result<Option<T>, sqlx::Error>
where
    T: FromStr,
    T::Err: StdError + Send + Sync + 'static,
{
    let raw: Option<String> = row.try_get(column)?;

    raw.map(|value| value.parse().map_err(|error| decode_error(column, error)))
        .transpose()
}

pub(crate) fn try_get_quantity(row: &PgRow, column: &str) -> Result<u32, sqlx::Error> {
    let quantity: i32 = row.try_get(column)?;

    u32::try_from(quantity).map_err(|error| decode_error(column, error))
}

pub(crate) fn try_get_timestamp(row: &PgRow, column: &str) -> Result<jiff::Timestamp, sqlx::Error> {
    Ok(row.try_get::<SqlxTimestamp, _>(column)?.to_jiff())
}
