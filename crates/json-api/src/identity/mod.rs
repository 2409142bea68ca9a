//! Caller identity extraction.

mod middleware;

pub(crate) use middleware::handler;
