// Atelier - web front-end for AI image generation with a local or S3 gallery

pub mod config;
pub mod ingest;
pub mod models;
pub mod provider;
pub mod routes;
pub mod storage;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
