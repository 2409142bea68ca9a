//! Get Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use trolley_app::domain::orders::models::OrderUuid;
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// Get Order Handler
///
/// Returns one of the user's orders with its items and status history.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    responses(
        (status_code = StatusCode::OK, description = "Order"),
        (status_code = StatusCode::FORBIDDEN, description = "Order belongs to another user"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "User required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let user = depot.user_or_401()?;

    let order = state
        .app
        .orders
        .get_order(tenant, user, OrderUuid::from_uuid(order.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
