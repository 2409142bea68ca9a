//! Merge Carts Handler

use std::sync::Arc;

use salvo::prelude::*;
use trolley_app::identity::SESSION_HEADER;

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Merge Carts Handler
///
/// Moves the guest session's items into the logged-in user's cart. Without a user cart the
/// guest cart is claimed instead.
#[endpoint(
    tags("carts"),
    summary = "Merge Guest Cart",
    responses(
        (status_code = StatusCode::OK, description = "The user's cart after the merge"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing guest session"),
        (status_code = StatusCode::UNAUTHORIZED, description = "User required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let user = depot.user_or_401()?;

    let session = depot.identity_or_401()?.session.ok_or_else(|| {
        StatusError::bad_request()
            .brief(format!("The {SESSION_HEADER} header is required to merge"))
            .detail("MISSING_SESSION")
    })?;

    let cart = state
        .app
        .carts
        .merge_carts(tenant, user, session)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
