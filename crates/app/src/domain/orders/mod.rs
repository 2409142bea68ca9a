//! Orders

pub mod checkout;
pub mod errors;
pub mod gateways;
pub mod models;
mod repositories;
pub mod service;

pub use checkout::*;
pub use errors::OrdersServiceError;
pub use gateways::{
    CartGateway, CartGatewayError, CartServiceConfig, HttpCartGateway, LocalCartGateway,
    MockCartGateway,
};
pub use service::*;
