use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::config::AppConfig;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = AppConfig::load().context("Failed to load config")?;
    info!(
        data_file = %config.storage.data_file.display(),
        uploads_dir = %config.storage.uploads_dir.display(),
        max_upload_size = config.storage.max_upload_size,
        "Storage configured"
    );

    let host = config.server.host.clone();
    let port = config.server.port;
    let app = server::build_router(AppState::from_config(config));

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}"))?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
