//! Trolley Domain Concerns

pub mod carts;
pub mod orders;
pub mod tenants;
