use std::{net::SocketAddr, sync::Arc};

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

use xgrab_core::stats::StatsStore;

/// Serve `GET /healthz` for liveness probes.
pub async fn serve(addr: SocketAddr, stats: Arc<StatsStore>) -> anyhow::Result<()> {
    let app = Router::new()
        .route("/healthz", get(handle_health))
        .with_state(stats);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("health endpoint listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn handle_health(State(stats): State<Arc<StatsStore>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "media_downloaded": stats.media_downloaded(),
        })),
    )
}
