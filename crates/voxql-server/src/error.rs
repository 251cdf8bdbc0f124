//! HTTP error mapping.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use voxql_core::responses::ErrorResponse;
use voxql_pipeline::PipelineError;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("missing multipart field 'file'")]
    MissingFile,

    #[error("invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),

    /// The request was not `multipart/form-data`.
    #[error("invalid upload request: {}", .0.body_text())]
    NotMultipart(#[from] MultipartRejection),

    /// The `/query` body was not `{"text": "..."}` JSON, or was too large.
    #[error("invalid request body: {}", .0.body_text())]
    InvalidJson(#[from] JsonRejection),

    #[error("failed to store audio: {0}")]
    Io(#[from] std::io::Error),

    /// A pipeline failure, with the stored audio file name when there is one.
    #[error("{source}")]
    Pipeline {
        source: PipelineError,
        filename: Option<String>,
    },
}

impl From<PipelineError> for ServerError {
    fn from(source: PipelineError) -> Self {
        Self::Pipeline {
            source,
            filename: None,
        }
    }
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingFile => StatusCode::BAD_REQUEST,
            Self::Multipart(error) => error.status(),
            Self::NotMultipart(rejection) => rejection.status(),
            Self::InvalidJson(rejection) => rejection.status(),
            Self::Io(_) | Self::Pipeline { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "bad request");
        }

        let mut body = ErrorResponse::new(self.to_string());
        if let Self::Pipeline {
            filename: Some(filename),
            ..
        } = self
        {
            body = body.with_filename(filename);
        }
        (status, Json(body)).into_response()
    }
}
