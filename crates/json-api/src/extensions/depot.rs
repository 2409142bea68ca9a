//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};
use trolley_app::{
    domain::tenants::models::TenantUuid,
    identity::{Identity, UserUuid},
};

const TENANT_UUID_DEPOT_KEY: &str = "tenant_uuid";
const IDENTITY_DEPOT_KEY: &str = "identity";

/// Helpers for storing request identity in the depot and mapping extraction failures to HTTP
/// errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_tenant_uuid(&mut self, tenant: TenantUuid);

    fn tenant_uuid_or_401(&self) -> Result<TenantUuid, StatusError>;

    fn insert_identity(&mut self, identity: Identity);

    /// The caller's identity; anonymous callers are rejected.
    fn identity_or_401(&self) -> Result<Identity, StatusError>;

    /// The logged-in user; guests are rejected.
    fn user_or_401(&self) -> Result<UserUuid, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_tenant_uuid(&mut self, tenant: TenantUuid) {
        self.insert(TENANT_UUID_DEPOT_KEY, tenant);
    }

    fn tenant_uuid_or_401(&self) -> Result<TenantUuid, StatusError> {
        self.get::<TenantUuid>(TENANT_UUID_DEPOT_KEY)
            .copied()
            .map_err(|_ignored| {
                StatusError::unauthorized()
                    .brief("Missing tenant")
                    .detail("MISSING_TENANT")
            })
    }

    fn insert_identity(&mut self, identity: Identity) {
        self.insert(IDENTITY_DEPOT_KEY, identity);
    }

    fn identity_or_401(&self) -> Result<Identity, StatusError> {
        self.get::<Identity>(IDENTITY_DEPOT_KEY)
            .ok()
            .copied()
            .filter(|identity| !identity.is_anonymous())
            .ok_or_else(|| {
                StatusError::unauthorized()
                    .brief("A user or session identifier is required")
                    .detail("MISSING_IDENTITY")
            })
    }

    fn user_or_401(&self) -> Result<UserUuid, StatusError> {
        self.get::<Identity>(IDENTITY_DEPOT_KEY)
            .ok()
            .and_then(|identity| identity.user)
            .ok_or_else(|| {
                StatusError::unauthorized()
                    .brief("A logged-in user is required")
                    .detail("USER_REQUIRED")
            })
    }
}
