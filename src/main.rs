use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use learnhub::api::router;
use learnhub::config::AppConfig;
use learnhub::network::build_network_descriptor;
use learnhub::state::AppState;
use learnhub::store::{Catalog, CourseStore, InMemoryStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "learnhub=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::new_from_env()?;

    let network = build_network_descriptor();
    let wallet = config.wallet_connector_config(vec![network.clone()])?;
    info!(
        "wallet connector ready for {} (chain {})",
        wallet.app_name, network.id
    );

    let store: Arc<dyn CourseStore> = match &config.catalog_path {
        Some(path) => Arc::new(InMemoryStore::with_catalog(Catalog::load(path)?)?),
        None => {
            tracing::warn!("CATALOG_PATH is not set, starting with an empty catalog");
            Arc::new(InMemoryStore::new())
        }
    };

    let state = AppState {
        store,
        network: Arc::new(network),
        wallet: Arc::new(wallet),
        passing_score_percent: config.passing_score_percent,
    };

    let app = router(state);

    info!("listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
