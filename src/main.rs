use anyhow::Result;
use dotenv::dotenv;
use issue_tracker::{app, config::AppConfig, services, AppState};

//Logging
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = AppConfig::from_env()?;

    let file_appender = rolling::daily(&config.log_dir, "issue-tracker.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Logging initialised");

    let store = services::db::connect_db::open_store(&config).await?;

    // one check at startup, the driver keeps trying on its own
    match store.ping().await {
        Ok(()) => tracing::info!("Connected to storage"),
        Err(err) => tracing::error!("Storage is not reachable yet: {}", err),
    }

    let app = app(AppState::new(store));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("Listening on {}", config.bind_addr());
    axum::serve(listener, app).await?;

    Ok(())
}
