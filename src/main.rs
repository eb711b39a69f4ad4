use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flash_news::config::Config;
use flash_news::routes::{self, AppState};
use flash_news::upstream::Upstream;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flash_news=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load_or_default("flash.toml")?.with_env_overrides();
    info!("Proxying upstream feed at {}", config.upstream_url);

    let upstream = Arc::new(Upstream::new(config.upstream_url.clone())?);

    let state = Arc::new(AppState {
        upstream,
        items_per_page: config.items_per_page,
        gallery_items_per_page: config.gallery_items_per_page,
    });

    let app = routes::router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("Server starting on http://{}", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
