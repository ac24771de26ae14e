//! HTTP server facade for Eddy & Ink with Axum, error handling, and OpenAPI support.

use anyhow::Context;
use axum::{routing::get, Router};
use eddy_db::Gateway;
use eddy_kernel::{settings::Settings, ModuleRegistry};

pub mod diagnostics;
pub mod error;
pub mod router;

use router::RouterBuilder;

/// Start the HTTP server and serve until Ctrl-C or SIGTERM
pub async fn start_server(
    registry: &ModuleRegistry,
    settings: &Settings,
    gateway: Gateway,
) -> anyhow::Result<()> {
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    tracing::info!("starting HTTP server on {}", addr);

    let app = build_router(registry, settings, gateway);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to address {addr}"))?;

    tracing::info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Build the main HTTP router: service endpoints, module routes under `/api`,
/// OpenAPI docs, then the global middleware stack
pub fn build_router(registry: &ModuleRegistry, settings: &Settings, gateway: Gateway) -> Router {
    RouterBuilder::new()
        .route("/", get(diagnostics::root))
        .mount_modules(registry)
        .with_openapi(registry)
        .with_fallback()
        .with_timeout(settings.server.request_timeout_ms)
        // Routes added after the timeout layer are not wrapped by it; `/test`
        // bounds its own database call.
        .route("/test", get(diagnostics::test_database).with_state(gateway))
        .with_cors()
        .with_request_id()
        .with_tracing()
        .build()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
