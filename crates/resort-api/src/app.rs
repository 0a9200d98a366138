//! Application builder: wires router + middleware + state into an Axum app.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use resort_core::config::{AppConfig, StoreBackend};
use resort_core::error::AppError;
use resort_core::traits::SystemClock;
use resort_database::migration::run_migrations;
use resort_database::{BookingStore, DatabasePool, MemoryBookingStore, PgBookingStore};

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let server = state.config.server.clone();
    build_router(state)
        .layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_seconds,
        )))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&server.cors))
        .layer(TraceLayer::new_for_http())
}

/// Open the booking store selected by `booking.store`.
///
/// PostgreSQL pending migrations are applied first when
/// `database.run_migrations` is set.
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn BookingStore>, AppError> {
    match config.booking.store {
        StoreBackend::Postgres => {
            let pool = DatabasePool::connect(&config.database).await?.into_pool();
            if config.database.run_migrations {
                run_migrations(&pool).await?;
            }
            Ok(Arc::new(PgBookingStore::new(pool)))
        }
        StoreBackend::Memory => {
            warn!("Using the in-memory booking store; data is lost on restart");
            Ok(Arc::new(MemoryBookingStore::new()))
        }
    }
}

/// Open the configured store and wire the services over the system clock.
pub async fn build_state(config: AppConfig) -> Result<AppState, AppError> {
    let store = open_store(&config).await?;
    AppState::new(config, store, Arc::new(SystemClock))
}

/// Serve the API until Ctrl+C.
pub async fn run_server(state: AppState) -> Result<(), AppError> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(%addr, "Resort booking server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
