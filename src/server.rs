//! HTTP relay for the provider: `GET /api/pins/info?url=...`.
//!
//! Keeps the provider key on the server. The provider envelope is returned
//! as-is; failures are reported as `{ "status": "error", "message": ... }`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::provider::PinSource;
use crate::types::ProviderEnvelope;

pub const INFO_PATH: &str = "/api/pins/info";

#[derive(Debug, Deserialize)]
struct InfoQuery {
    url: Option<String>,
}

pub fn router(source: Arc<dyn PinSource>) -> Router {
    Router::new().route(INFO_PATH, get(pin_info)).with_state(source)
}

pub async fn serve(addr: SocketAddr, source: Arc<dyn PinSource>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, path = INFO_PATH, "listening");
    axum::serve(listener, router(source)).await.context("serving requests")
}

async fn pin_info(
    State(source): State<Arc<dyn PinSource>>,
    Query(q): Query<InfoQuery>,
) -> Response {
    let Some(url) = q.url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "URL is required");
    };
    match source.fetch_raw(&url).await {
        Ok(envelope) => (StatusCode::OK, Json(envelope)).into_response(),
        Err(e) => {
            tracing::warn!(%url, error = %e, "upstream request failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ProviderEnvelope::error(message))).into_response()
}
