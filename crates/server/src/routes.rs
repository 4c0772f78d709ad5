//! HTTP routes.

use crate::error::AppError;
use crate::generate::{build_packages, DOWNLOAD_NAME};
use crate::page::INDEX_HTML;
use crate::state::AppState;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::HeaderValue;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use deck_pptx::PPTX_CONTENT_TYPE;
use serde::{Deserialize, Serialize};

/// Header carrying how many documents the script produced.
pub const DOCUMENT_COUNT_HEADER: &str = "x-deck-documents";

/// Multipart field holding the uploaded image.
const UPLOAD_FIELD: &str = "file";

/// Build the application router.
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/generate", post(generate))
        .route("/upload", post(upload))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Form body of `/generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub script: String,
}

async fn generate(
    State(state): State<AppState>,
    Form(form): Form<GenerateForm>,
) -> Result<Response, AppError> {
    let fetcher = state.fetcher.clone();
    let packages =
        tokio::task::spawn_blocking(move || build_packages(&*fetcher, &form.script)).await??;

    let count = packages.len();
    // split_documents always yields at least one document.
    let first = packages.into_iter().next().unwrap_or_default();

    log::info!("Serving {} ({} bytes, {} documents)", DOWNLOAD_NAME, first.len(), count);

    let mut response = (
        [
            (CONTENT_TYPE, PPTX_CONTENT_TYPE.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", DOWNLOAD_NAME),
            ),
        ],
        first,
    )
        .into_response();
    response
        .headers_mut()
        .insert(DOCUMENT_COUNT_HEADER, HeaderValue::from(count));

    Ok(response)
}

/// JSON body of a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let bytes = field.bytes().await?;

        log::info!("Forwarding upload {} ({} bytes)", filename, bytes.len());
        let url = state.host.upload(&filename, bytes.to_vec()).await?;
        return Ok(Json(UploadResponse { url }));
    }

    Err(AppError::BadUpload(format!(
        "missing multipart field '{}'",
        UPLOAD_FIELD
    )))
}
