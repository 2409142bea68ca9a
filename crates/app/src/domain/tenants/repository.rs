//! Tenants Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::try_get_timestamp,
    domain::tenants::models::{NewTenant, Tenant, TenantUuid},
};

const CREATE_TENANT_SQL: &str = include_str!("sql/create_tenant.sql");
const GET_TENANT_SQL: &str = include_str!("sql/get_tenant.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgTenantsRepository;

impl PgTenantsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_tenant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: NewTenant,
    ) -> Result<Tenant, sqlx::Error> {
        query_as::<Postgres, Tenant>(CREATE_TENANT_SQL)
            .bind(tenant.uuid.into_uuid())
            .bind(tenant.name)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_tenant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
    ) -> Result<Tenant, sqlx::Error> {
        query_as::<Postgres, Tenant>(GET_TENANT_SQL)
            .bind(tenant.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Tenant {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: TenantUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}
