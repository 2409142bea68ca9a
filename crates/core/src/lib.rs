//! Trolley
//!
//! Trolley is the pricing and lifecycle engine behind a multi-tenant cart and checkout service.
//! It normalizes item configurations, fingerprints cart lines for deduplication, selects tiered
//! prices, computes cart and order totals, and enforces the order status state machine.
//!
//! Nothing in this crate performs IO; persistence and catalog access live in `trolley-app`.

pub mod carts;
pub mod configuration;
pub mod currency;
pub mod orders;
pub mod pricing;
pub mod products;

pub mod prelude;
