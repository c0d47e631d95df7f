use atelier::ingest::Ingestor;
use atelier::provider::ProviderClient;
use atelier::storage::Storage;
use atelier::{config::Config, routes::create_router, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atelier=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    // Ensure the media folder exists for local storage (and S3 fallback)
    tokio::fs::create_dir_all(&config.storage.media_dir).await?;

    // Create shared state
    let state = AppState {
        provider: Arc::new(ProviderClient::new(&config.provider)),
        storage: Arc::new(Storage::new(config.storage.clone())),
        ingestor: Arc::new(Ingestor::new()),
        config: config.clone(),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
