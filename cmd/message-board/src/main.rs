//! # message-board
//!
//! Process entry point: load settings, initialise logging, open the
//! configured store and serve the HTTP API until a shutdown signal arrives.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::web::{middleware::cors_policy, router, AppState};
use configs::{LogFormat, LoggingSettings, Settings, StorageBackend, StorageSettings};
use domains::ThreadRepository;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load configuration")?;
    init_logging(&settings.logging);

    tracing::info!(backend = ?settings.storage.backend, "starting message board");

    let repo = open_store(&settings.storage).await?;
    let app = router(AppState::new(repo), cors_policy(&settings.cors.allowed_origins));

    let addr = settings.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_logging(logging: &LoggingSettings) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().pretty()).init(),
    }
}

async fn open_store(storage: &StorageSettings) -> anyhow::Result<Arc<dyn ThreadRepository>> {
    match storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("using in-memory store; data is lost on exit");
            Ok(Arc::new(storage_adapters::InMemoryThreadRepository::new()))
        }
        StorageBackend::Mongo => open_mongo(storage).await,
        StorageBackend::Postgres => open_postgres(storage).await,
    }
}

#[cfg(feature = "db-mongo")]
async fn open_mongo(storage: &StorageSettings) -> anyhow::Result<Arc<dyn ThreadRepository>> {
    use secrecy::ExposeSecret;

    let repo = storage_adapters::MongoThreadRepository::connect(storage.url.expose_secret(), &storage.database)
        .await
        .context("failed to connect to MongoDB")?;
    Ok(Arc::new(repo))
}

#[cfg(not(feature = "db-mongo"))]
async fn open_mongo(_: &StorageSettings) -> anyhow::Result<Arc<dyn ThreadRepository>> {
    anyhow::bail!("storage.backend = \"mongo\" but this binary was built without the db-mongo feature")
}

#[cfg(feature = "db-postgres")]
async fn open_postgres(storage: &StorageSettings) -> anyhow::Result<Arc<dyn ThreadRepository>> {
    use secrecy::ExposeSecret;

    let repo = storage_adapters::PgThreadRepository::connect(storage.url.expose_secret(), storage.max_connections)
        .await
        .context("failed to connect to PostgreSQL")?;
    Ok(Arc::new(repo))
}

#[cfg(not(feature = "db-postgres"))]
async fn open_postgres(_: &StorageSettings) -> anyhow::Result<Arc<dyn ThreadRepository>> {
    anyhow::bail!("storage.backend = \"postgres\" but this binary was built without the db-postgres feature")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => tracing::error!(error = %err, "failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
