//! Trolley JSON API Server

use std::process;

use salvo::{
    affix_state::inject,
    oapi::{OpenApi, swagger_ui::SwaggerUi},
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info};

use trolley_app::context::AppContext;

use crate::{
    config::ServerConfig,
    observability::{Observability, metrics_handler, request_logging},
    state::State,
};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod carts;
mod config;
mod extensions;
mod healthcheck;
mod identity;
mod observability;
mod orders;
mod router;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

/// Trolley JSON API Server entry point
#[tokio::main]
pub async fn main() {
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    let observability = match Observability::init(&config) {
        Ok(observability) => observability,
        Err(init_error) => {
            #[expect(
                clippy::print_stderr,
                reason = "the subscriber failed to install, so tracing output would be lost"
            )]
            {
                eprintln!("Observability error: {init_error}");
            }

            process::exit(1);
        }
    };

    let app = match AppContext::from_config(config.app_config()).await {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");

            observability.shutdown();
            process::exit(1);
        }
    };

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    let listener = TcpListener::new(addr).bind().await;

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(inject(State::from_app_context(app)))
        .hoop(request_logging)
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(metrics_handler))
        .push(router::app_router());

    let doc = OpenApi::new("Trolley API", env!("CARGO_PKG_VERSION")).merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);
    let handle = server.handle();
    let grace = config.server.shutdown_timeout();

    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle, grace).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    server.serve(router).await;

    observability.shutdown();
}
