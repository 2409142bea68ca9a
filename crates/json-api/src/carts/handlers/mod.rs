//! Cart Handlers

pub(crate) mod clear;
pub(crate) mod complete;
pub(crate) mod get;
pub(crate) mod merge;
pub(crate) mod validate;
