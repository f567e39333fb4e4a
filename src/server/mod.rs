//! HTTP servers: the balance-sheet backend and the mock upstream.

pub mod backend;
pub mod mock;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::error::{Result, ShowMeError};

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

pub(crate) fn health_routes() -> Router {
    Router::new().route("/health", get(health))
}

/// Serve `router` on `0.0.0.0:port` until Ctrl-C.
pub fn run(router: Router, port: u16, name: &str) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
        let addr = listener.local_addr()?;
        tracing::info!(%addr, "{name} listening");
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("{name} stopped");
        Ok::<(), ShowMeError>(())
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
