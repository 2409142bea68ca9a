//! Complete Cart Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use trolley_app::domain::carts::models::CartUuid;

use crate::{
    carts::{
        errors::into_status_error,
        models::{CartResponse, CompleteCartRequest},
    },
    extensions::*,
    state::State,
};

/// Complete Cart Handler
///
/// Marks an active cart owned by the caller as completed. Called by checkout once the order is
/// stored.
#[endpoint(
    tags("carts"),
    summary = "Complete Cart",
    responses(
        (status_code = StatusCode::OK, description = "Completed cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Cart not active"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing identity"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CompleteCartRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let identity = depot.identity_or_401()?;

    let cart = state
        .app
        .carts
        .complete_cart(tenant, identity, CartUuid::from_uuid(json.into_inner().cart_id))
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
