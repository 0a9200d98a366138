//! Start the booking server.

use clap::Args;

use resort_core::config::StoreBackend;
use resort_core::error::AppError;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Use the in-memory store regardless of configuration
    #[arg(long)]
    pub memory: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, config_path: &str) -> Result<(), AppError> {
    let mut config = super::load_config(config_path)?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if args.memory {
        config.booking.store = StoreBackend::Memory;
    }

    println!("Starting resort booking server...");
    println!("  Host: {}", config.server.host);
    println!("  Port: {}", config.server.port);

    let state = resort_api::build_state(config).await?;
    resort_api::run_server(state).await
}
