//! HTTP front end for the predictor.
//!
//! # Endpoints
//!
//! - `GET  /api/health`               - Liveness probe
//! - `GET  /api/questions/:test_type` - Questions for a test variant
//! - `POST /api/predict`              - Type prediction from answers and optional text

pub mod routes;

pub use routes::{app_router, AppState, PredictRequest, PredictResponse};

use tracing::info;

use crate::error::Result;

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(state: AppState, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("EchoType API listening on {}", listener.local_addr()?);
    info!("Endpoints:");
    info!("  GET  /api/health");
    info!("  GET  /api/questions/:test_type");
    info!("  POST /api/predict");

    axum::serve(listener, app_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
