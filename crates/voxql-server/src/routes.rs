//! HTTP routes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use voxql_core::responses::{ErrorResponse, QueryResponse, UploadResponse, VoiceQueryResponse};
use voxql_pipeline::Pipeline;

use crate::ServerError;

const DEFAULT_AUDIO_EXT: &str = ".webm";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub audio_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(pipeline: Arc<Pipeline>, audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            pipeline,
            audio_dir: Arc::new(audio_dir.into()),
        }
    }
}

/// Build the application router. Request bodies above `max_body_bytes` are
/// rejected with 413 and an `ErrorResponse` body.
pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    let audio = ServeDir::new(state.audio_dir.as_path());
    Router::new()
        .route("/health", get(health_check))
        .route("/upload", post(upload))
        .route("/query", post(query))
        .route("/voice-query", post(voice_query))
        .nest_service("/audio", audio)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "voxql",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Store the audio and transcribe it. Never prompts the LLM.
///
/// Transcription failures still answer 200, with `success: false` and the
/// stored file name, so a client can retry or play the recording back.
async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ServerError> {
    let (filename, path) = store_upload(&state.audio_dir, multipart?).await?;

    match state.pipeline.transcribe(&path).await {
        Ok(transcription) => Ok(Json(UploadResponse::new(filename, transcription)).into_response()),
        Err(error) => {
            tracing::warn!(%filename, %error, "transcription failed");
            Ok(Json(ErrorResponse::new(error.to_string()).with_filename(filename)).into_response())
        }
    }
}

#[derive(Debug, Deserialize)]
struct QueryRequest {
    text: String,
}

async fn query(
    State(state): State<AppState>,
    request: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, ServerError> {
    let Json(request) = request?;
    let generation = state.pipeline.query(&request.text).await?;
    Ok(Json(QueryResponse::new(generation.sql, generation.results)))
}

/// Upload, transcribe, and query in one request.
async fn voice_query(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<VoiceQueryResponse>, ServerError> {
    let (filename, path) = store_upload(&state.audio_dir, multipart?).await?;

    let outcome = state
        .pipeline
        .run(&path)
        .await
        .map_err(|source| ServerError::Pipeline {
            source,
            filename: Some(filename.clone()),
        })?;
    Ok(Json(VoiceQueryResponse {
        success: true,
        filename,
        transcription: outcome.transcript,
        sql: outcome.sql,
        results: outcome.results,
    }))
}

/// Write the `file` field to `audio_dir/audio_<unix-seconds><ext>`.
async fn store_upload(
    audio_dir: &Path,
    mut multipart: Multipart,
) -> Result<(String, PathBuf), ServerError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let ext = audio_extension(field.file_name());
        let bytes = field.bytes().await?;

        let filename = format!("audio_{}{ext}", chrono::Utc::now().timestamp());
        tokio::fs::create_dir_all(audio_dir).await?;
        let path = audio_dir.join(&filename);
        tokio::fs::write(&path, &bytes).await?;
        tracing::info!(%filename, bytes = bytes.len(), "audio stored");
        return Ok((filename, path));
    }
    Err(ServerError::MissingFile)
}

/// Extension of the uploaded name including the dot, or `.webm`.
fn audio_extension(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map_or_else(|| DEFAULT_AUDIO_EXT.to_string(), |ext| format!(".{ext}"))
}
