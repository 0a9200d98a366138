//! Resort booking server.
//!
//! Main entry point that loads configuration, opens the booking store and
//! starts the HTTP API.

use tracing_subscriber::{EnvFilter, fmt};

use resort_core::config::AppConfig;
use resort_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load `config/default.toml`, the `RESORT_ENV` overlay and `RESORT__*` variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("RESORT_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        store = ?config.booking.store,
        utc_offset_minutes = config.booking.utc_offset_minutes,
        "Starting resort booking server"
    );

    let state = resort_api::build_state(config).await?;
    resort_api::run_server(state).await
}
