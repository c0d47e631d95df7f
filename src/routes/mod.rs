//! API Routes
//!
//! HTTP surface of the service:
//! - `/` - generator UI
//! - `/api/models` - available provider models
//! - `/api/generate` - generate and persist images
//! - `/media/{filename}` - locally stored image bytes
//! - `/gallery` - HTML gallery of stored images
//! - `/api/storage-info` - active storage backend

pub mod gallery;
pub mod generate;
pub mod media;
pub mod ui;

use crate::models::AppState;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    Router::new()
        .merge(ui::router())
        .merge(generate::router(state.clone()))
        .merge(media::router(state.clone()))
        .merge(gallery::router(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
