//! Error responses.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use deck_net::UploadError;
use serde::Serialize;
use thiserror::Error;

/// Errors a request handler can fail with.
#[derive(Error, Debug)]
pub enum AppError {
    /// The script could not be rendered.
    #[error("Failed to generate presentation: {0}")]
    Render(#[from] deck_core::Error),

    /// The deck could not be packaged.
    #[error("Failed to write presentation: {0}")]
    Package(#[from] deck_pptx::Error),

    /// The blocking generation task panicked or was cancelled.
    #[error("Generation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The upload request itself was malformed.
    #[error("{0}")]
    BadUpload(String),

    /// The multipart body could not be read.
    #[error("Invalid upload body: {0}")]
    Multipart(#[from] MultipartError),

    /// The image host could not store the upload.
    #[error(transparent)]
    Upload(#[from] UploadError),
}

/// JSON body of a failed upload.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            Self::BadUpload(_) | Self::Upload(UploadError::EmptyFile) => {
                log::warn!("Rejected upload: {}", message);
                (StatusCode::BAD_REQUEST, Json(ErrorBody { error: message })).into_response()
            }
            Self::Multipart(e) => {
                log::warn!("Rejected upload: {}", message);
                (e.status(), Json(ErrorBody { error: message })).into_response()
            }
            Self::Upload(_) => {
                log::error!("{}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody { error: message }))
                    .into_response()
            }
            Self::Render(_) | Self::Package(_) | Self::Task(_) => {
                log::error!("{}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
        }
    }
}
