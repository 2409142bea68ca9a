//! Update Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use trolley_app::domain::carts::models::CartItemUuid;
use uuid::Uuid;

use crate::{
    carts::{
        errors::into_status_error,
        items::quantity,
        models::{CartResponse, UpdateCartItemRequest},
    },
    extensions::*,
    state::State,
};

/// Update Cart Item Handler
///
/// Sets the quantity of an item in the caller's active cart. The unit price is kept.
#[endpoint(
    tags("carts"),
    summary = "Update Cart Item Quantity",
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart item not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing identity"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    json: JsonBody<UpdateCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let identity = depot.identity_or_401()?;
    let quantity = quantity(json.into_inner().quantity)?;

    let cart = state
        .app
        .carts
        .update_item_quantity(
            tenant,
            identity,
            CartItemUuid::from_uuid(item.into_inner()),
            quantity,
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
