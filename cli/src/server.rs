//! HTTP decode service in front of the receiver.

use crate::{decode_request, DecodeRequest, DecodeResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tracing::info;

async fn handle_decode(Json(req): Json<DecodeRequest>) -> Json<DecodeResponse> {
    Json(decode_request(&req))
}

async fn handle_health() -> &'static str {
    "ok"
}

pub fn router() -> Router {
    Router::new()
        .route("/decode", post(handle_decode))
        .route("/health", get(handle_health))
        .layer(CorsLayer::permissive())
}

/// Run the decode service until the process is killed.
pub fn serve(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let addr = format!("0.0.0.0:{port}");
        info!(%addr, "decode service listening");
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, router()).await?;
        Ok(())
    })
}
