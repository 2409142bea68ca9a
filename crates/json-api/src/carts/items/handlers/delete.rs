//! Remove Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use trolley_app::domain::carts::models::CartItemUuid;
use uuid::Uuid;

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Remove Cart Item Handler
#[endpoint(
    tags("carts"),
    summary = "Remove Cart Item",
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart item not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing identity"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let identity = depot.identity_or_401()?;

    let cart = state
        .app
        .carts
        .remove_item(tenant, identity, CartItemUuid::from_uuid(item.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
