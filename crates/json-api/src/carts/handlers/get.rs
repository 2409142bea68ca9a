//! Get Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Get Cart Handler
///
/// Returns the caller's active cart, creating it on first use. A logged-in user who still
/// carries a guest session takes over that session's cart.
#[endpoint(
    tags("carts"),
    summary = "Get Cart",
    responses(
        (status_code = StatusCode::OK, description = "Active cart"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing identity"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let identity = depot.identity_or_401()?;

    let cart = state
        .app
        .carts
        .get_active_cart(tenant, identity)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
