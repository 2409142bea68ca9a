//! Tenants service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::tenants::{
        errors::TenantsServiceError,
        models::{NewTenant, Tenant, TenantUuid},
        repository::PgTenantsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgTenantsService {
    db: Db,
    repository: PgTenantsRepository,
}

impl PgTenantsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgTenantsRepository::new(),
        }
    }
}

#[async_trait]
impl TenantsService for PgTenantsService {
    async fn create_tenant(&self, tenant: NewTenant) -> Result<Tenant, TenantsServiceError> {
        if tenant.name.trim().is_empty() {
            return Err(TenantsServiceError::InvalidData);
        }

        // The row is inserted under its own tenant context so the RLS check passes.
        let mut tx = self.db.begin_tenant_transaction(tenant.uuid).await?;

        let created = self.repository.create_tenant(&mut tx, tenant).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_tenant(&self, tenant: TenantUuid) -> Result<Tenant, TenantsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let found = self.repository.get_tenant(&mut tx, tenant).await?;

        tx.commit().await?;

        Ok(found)
    }
}

#[automock]
#[async_trait]
/// Tenant persistence operations.
pub trait TenantsService: Send + Sync {
    /// Creates a new tenant.
    async fn create_tenant(&self, tenant: NewTenant) -> Result<Tenant, TenantsServiceError>;

    /// Retrieve a tenant, failing with `NotFound` for unknown tenants.
    async fn get_tenant(&self, tenant: TenantUuid) -> Result<Tenant, TenantsServiceError>;
}
