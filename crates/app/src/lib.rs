//! Trolley application services: catalog pricing, carts, checkout and orders over `PostgreSQL`.

pub mod catalog;
pub mod context;
pub mod database;
pub mod domain;
pub mod identity;

#[cfg(test)]
mod test;

pub mod uuids;
