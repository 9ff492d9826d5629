use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::podcast::{PodcastService, PodcastServiceApi};

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Ready when a generation backend is configured. Audio is optional, the
/// TTS chain is reported for visibility.
pub async fn health_ready(State(service): State<Arc<PodcastService>>) -> impl IntoResponse {
    let readiness = service.readiness();

    match readiness.generation_backend {
        Some((provider, model)) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "generation": { "provider": provider, "model": model },
                "tts": readiness.tts_chain,
            })),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "generation": null,
                "tts": readiness.tts_chain,
            })),
        ),
    }
}
