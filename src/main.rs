mod api_doc;
mod config;
mod error;
mod handlers;
mod models;
mod routes;
mod spanner;
mod state;

use anyhow::Context;
use config::Settings;
use spanner::KvStore;
use state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!("config-store starting");

    let settings = Settings::from_env()?;
    settings.log_startup();

    let store = KvStore::from_settings(&settings).await?;

    let addr = format!("{}:{}", settings.service_host, settings.service_port);
    let app = routes::router(AppState::new(store, settings));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
