//! Tenants
//!
//! Every cart and order row is owned by a tenant; the service here registers tenants and lets
//! request handlers confirm one exists before touching its data.

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::TenantsServiceError;
pub use service::{MockTenantsService, PgTenantsService, TenantsService};
