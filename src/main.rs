use site_search::config::Config;
use site_search::server;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;

    info!("Starting site search front end");
    info!("Search service URL: {}", config.api_url);

    server::serve(config).await
}
