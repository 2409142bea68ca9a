//! Add Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use trolley::configuration::Configuration;
use trolley_app::domain::carts::models::NewCartItem;

use crate::{
    carts::{
        errors::into_status_error,
        items::quantity,
        models::{AddCartItemRequest, CartResponse},
    },
    extensions::*,
    state::State,
};

impl TryFrom<AddCartItemRequest> for NewCartItem {
    type Error = StatusError;

    fn try_from(request: AddCartItemRequest) -> Result<Self, Self::Error> {
        let configuration = request
            .configuration
            .as_ref()
            .map(Configuration::normalize)
            .transpose()
            .or_400("INVALID_CONFIGURATION")?
            .flatten();

        Ok(NewCartItem {
            product_uuid: request.product_id,
            variant_uuid: request.variant_id,
            quantity: quantity(request.quantity)?,
            configuration,
        })
    }
}

/// Add Cart Item Handler
///
/// Prices the item against the catalog and adds it to the caller's active cart. An item with
/// the same product, variant and configuration as an existing line increases that line's
/// quantity instead.
#[endpoint(
    tags("carts"),
    summary = "Add Item to Cart",
    responses(
        (status_code = StatusCode::CREATED, description = "Item added"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing identity"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddCartItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let identity = depot.identity_or_401()?;
    let item = NewCartItem::try_from(json.into_inner())?;

    let cart = state
        .app
        .carts
        .add_item(tenant, identity, item)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(cart.into()))
}
