use std::sync::Arc;
use anyhow::Context;
use evently_api::{app, AppState};
use evently_core::BookingRepository;
use evently_store::app_config::{Config, StorageBackend};
use evently_store::{DbClient, InMemoryBookingRepository, PostgresBookingRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "evently_api=debug,evently_store=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Evently API on port {}", config.server.port);

    let bookings: Arc<dyn BookingRepository> = match config.storage.backend {
        StorageBackend::Postgres => {
            let db = DbClient::new(&config.database).context("Invalid database configuration")?;
            if config.database.run_migrations {
                db.migrate().await.context("Failed to run migrations")?;
            }
            Arc::new(PostgresBookingRepository::new(db.pool.clone()))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, bookings are lost on restart");
            Arc::new(InMemoryBookingRepository::new())
        }
    };

    let app = app(AppState::new(bookings));

    let listener = tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .context("Failed to bind listener")?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
