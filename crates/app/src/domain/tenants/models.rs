//! Tenant Models

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Tenant UUID
pub type TenantUuid = TypedUuid<Tenant>;

/// Tenant Model
#[derive(Debug, Clone)]
pub struct Tenant {
    /// Unique tenant identifier.
    pub uuid: TenantUuid,

    /// Human-readable tenant name.
    pub name: String,

    /// Tenant creation timestamp.
    pub created_at: Timestamp,

    /// Last update timestamp.
    pub updated_at: Timestamp,
}

/// New Tenant Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewTenant {
    /// UUID to assign to the tenant row.
    pub uuid: TenantUuid,

    /// Tenant name to persist.
    pub name: String,
}
