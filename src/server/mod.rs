pub mod handlers;
pub mod lifecycle;
mod types;
mod upload;

pub use handlers::AppState;
pub use types::{AnalyzeResponse, ErrorResponse, InputType, UploadForm, UploadRequest};

use crate::{
    Result,
    config::{Config, ServerConfig},
    llm::OpenAiClient,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::{net::SocketAddr, path::Path, sync::Arc};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::info;

/// Builds the HTTP surface: the analyze endpoint plus the frontend bundle, which falls back
/// to its `index.html` so client-side routes resolve.
pub fn router(state: AppState, server: &ServerConfig) -> Router {
    let index = Path::new(&server.static_dir).join("index.html");
    let frontend = ServeDir::new(&server.static_dir).fallback(ServeFile::new(index));

    Router::new()
        .route("/api/analyze", post(handlers::analyze))
        .route("/healthz", get(handlers::health))
        .fallback_service(frontend)
        .layer(DefaultBodyLimit::max(server.max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    let llm_client = OpenAiClient::new(config.llm.clone())?;
    info!("Using completion model {}", llm_client.model());

    let state = AppState::new(&config, Arc::new(llm_client));
    let app = router(state, &config.server);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
