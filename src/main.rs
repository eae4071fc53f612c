use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use unicine_catalog::api::{self, AppState};
use unicine_catalog::config::{self, AppConfig};
use unicine_catalog::services::CatalogSession;

// 所有状态修改都在同一个事件循环线程上完成
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;
    let registry = config::load_registry(config.categories_file.as_deref()).await;

    // Initialize external API client
    let (client, cache) = config.catalog_client();

    let session = CatalogSession::new(client, registry, config.debounce_window);
    let app = api::router(AppState {
        session: Arc::new(session),
        cache,
        tmdb_configured: config.tmdb_api_key.is_some(),
    });

    let addr = config.bind_addr();
    tracing::info!("🚀 Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
