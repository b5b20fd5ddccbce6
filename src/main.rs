//! EchoVault server binary.

use std::error::Error;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use echovault::adapters::{
    app_router, InMemoryMessageStore, MessageHandlers, PostgresMessageStore, StreamState,
    TopicRegistry,
};
use echovault::application::{ListMessagesHandler, SubmitMessageHandler};
use echovault::config::{AppConfig, DatabaseConfig, ServerConfig};
use echovault::ports::MessageStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server);

    let store = match &config.database {
        Some(database) => connect_store(database).await?,
        None => {
            tracing::warn!("No database configured, history is kept in memory only");
            Arc::new(InMemoryMessageStore::new()) as Arc<dyn MessageStore>
        }
    };

    let registry = Arc::new(TopicRegistry::new(config.stream.subscriber_buffer));

    let messages = MessageHandlers::new(
        Arc::new(SubmitMessageHandler::new(store.clone(), registry.clone())),
        Arc::new(ListMessagesHandler::new(store)),
    );
    let streams = StreamState::new(registry.clone(), config.stream.keepalive());
    let app = app_router(&config.server, messages, streams);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "EchoVault listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            // Ends every open stream, and any opened from here on, so the
            // server can drain.
            registry.shutdown();
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn connect_store(database: &DatabaseConfig) -> Result<Arc<dyn MessageStore>, Box<dyn Error>> {
    let pool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .connect(&database.url)
        .await?;

    if database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    tracing::info!(max_connections = database.max_connections, "Connected to PostgreSQL");
    Ok(Arc::new(PostgresMessageStore::new(pool)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received ctrl-c, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
