//! Validate Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{errors::into_status_error, models::CartValidationResponse},
    extensions::*,
    state::State,
};

/// Validate Cart Handler
///
/// Re-prices every item against the catalog. Items the catalog can no longer price keep their
/// previous price and are listed under `skipped`.
#[endpoint(
    tags("carts"),
    summary = "Validate Cart",
    responses(
        (status_code = StatusCode::OK, description = "Re-priced cart and skipped items"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing identity"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartValidationResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let identity = depot.identity_or_401()?;

    let validation = state
        .app
        .carts
        .validate_cart(tenant, identity)
        .await
        .map_err(into_status_error)?;

    Ok(Json(validation.into()))
}
