//! App Router

use salvo::Router;

use crate::{carts, identity, orders};

/// Tenant-scoped cart and order routes, behind the identity middleware.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(identity::handler)
        .push(
            Router::with_path("cart")
                .get(carts::handlers::get::handler)
                .delete(carts::handlers::clear::handler)
                .push(
                    Router::with_path("items")
                        .post(carts::items::handlers::create::handler)
                        .push(
                            Router::with_path("{item}")
                                .put(carts::items::handlers::update::handler)
                                .delete(carts::items::handlers::delete::handler),
                        ),
                )
                .push(Router::with_path("validate").post(carts::handlers::validate::handler))
                .push(Router::with_path("merge").post(carts::handlers::merge::handler))
                .push(Router::with_path("complete").post(carts::handlers::complete::handler)),
        )
        .push(
            Router::with_path("orders")
                .get(orders::handlers::index::handler)
                .post(orders::handlers::create::handler)
                .push(
                    Router::with_path("{order}")
                        .get(orders::handlers::get::handler)
                        .push(Router::with_path("cancel").post(orders::handlers::cancel::handler)),
                ),
        )
}
