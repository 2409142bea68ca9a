//! Checkout Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use crate::{
    extensions::*,
    observability::{CheckoutOutcome, observe_checkout},
    orders::{
        errors::into_status_error,
        models::{CheckoutRequest, OrderResponse},
    },
    state::State,
};

/// Checkout Handler
///
/// Converts the user's active cart into a confirmed order. Prices are refreshed against the
/// catalog first; the cart is marked completed once the order is stored.
#[endpoint(
    tags("orders"),
    summary = "Checkout",
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Cart empty or failed validation"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "User required"),
        (status_code = StatusCode::CONFLICT, description = "Cart already checked out"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let identity = depot.identity_or_401()?;

    let placed = state
        .app
        .checkout
        .checkout(tenant, identity, json.into_inner().into())
        .await
        .map_err(into_status_error);

    let order = match placed {
        Ok(order) => {
            observe_checkout(CheckoutOutcome::Placed);
            order
        }
        Err(status) => {
            observe_checkout(if status.code.is_server_error() {
                CheckoutOutcome::Failed
            } else {
                CheckoutOutcome::Rejected
            });

            return Err(status);
        }
    };

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
