//! Carts
//!
//! Guest and user carts, their priced line items, and the claim/merge/validate/complete
//! lifecycle.

pub mod errors;
pub mod models;
mod repositories;
pub mod service;

pub use errors::CartsServiceError;
pub use service::{CartsService, MockCartsService, PgCartsService};
