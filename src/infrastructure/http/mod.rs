pub mod request_id;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub use request_id::{request_id_middleware, X_REQUEST_ID};

use crate::controllers::{health, podcast::PodcastController};
use crate::domain::podcast::PodcastService;
use crate::infrastructure::config::Config;
use crate::infrastructure::storage::AUDIO_URL_PREFIX;

/// All routes, without binding a socket
pub fn build_router(
    podcast_service: Arc<PodcastService>,
    podcast_controller: Arc<PodcastController>,
    audio_dir: &Path,
    max_upload_bytes: usize,
) -> Router {
    let podcast_routes = Router::new()
        .route("/generate", post(PodcastController::generate))
        .route("/test-api", get(PodcastController::test_api))
        .with_state(podcast_controller)
        .layer(DefaultBodyLimit::max(max_upload_bytes));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(podcast_service)
        .merge(podcast_routes)
        .nest_service(AUDIO_URL_PREFIX, ServeDir::new(audio_dir))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    podcast_service: Arc<PodcastService>,
    podcast_controller: Arc<PodcastController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = build_router(
        podcast_service,
        podcast_controller,
        &config.audio_folder,
        config.max_upload_bytes,
    );

    // Browser frontends run on another port while developing
    if config.is_development() {
        app = app.layer(CorsLayer::permissive());
    }

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
