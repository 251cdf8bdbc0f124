//! # voxql-server
//!
//! axum HTTP surface over the voxql pipeline:
//!
//! - `POST /upload`: store audio, return its transcription and `locked` flag
//! - `POST /query`: `{ "text": ... }` to SQL and rows
//! - `POST /voice-query`: upload, transcribe, and query in one call
//! - `GET /audio/<file>`: stored recordings
//! - `GET /health`

pub mod error;
pub mod routes;

pub use error::ServerError;
pub use routes::{AppState, build_router};

use std::sync::Arc;

use voxql_config::ServerConfig;
use voxql_pipeline::Pipeline;

/// Bind `server.host:server.port` and serve until Ctrl-C.
///
/// # Errors
///
/// Returns [`ServerError::Io`] if the audio directory cannot be created or the
/// address cannot be bound.
pub async fn serve(config: &ServerConfig, pipeline: Arc<Pipeline>) -> Result<(), ServerError> {
    tokio::fs::create_dir_all(&config.audio_dir).await?;
    let state = AppState::new(pipeline, &config.audio_dir);
    let app = build_router(state, config.max_upload_bytes);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, audio_dir = %config.audio_dir, "voxql server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(error) = tokio::signal::ctrl_c().await {
                tracing::warn!(%error, "failed to listen for ctrl-c");
            }
        })
        .await?;
    Ok(())
}
