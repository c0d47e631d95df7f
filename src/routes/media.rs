use crate::models::AppState;
use crate::types::{AppError, AppResult};
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::path::PathBuf;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/media/{filename}", get(serve_media))
        .with_state(state)
}

/// Serve one file from the local media directory. Only meaningful for the
/// local backend; S3 locators point straight at the bucket.
async fn serve_media(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    // Single path component only; anything that could escape the media dir
    // is treated as absent.
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Err(AppError::NotFound(filename));
    }

    let path = PathBuf::from(&state.config.storage.media_dir).join(&filename);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::NotFound(filename))?;

    let content_type = mime_guess::from_path(&path)
        .first_or_octet_stream()
        .to_string();
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}
