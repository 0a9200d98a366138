//! CLI command definitions and dispatch.

pub mod migrate;
pub mod occupancy;
pub mod serve;
pub mod services;
pub mod slots;

use clap::{Parser, Subcommand};

use resort_api::AppState;
use resort_core::config::AppConfig;
use resort_core::error::AppError;
use resort_core::types::id::UserId;
use resort_service::{CallerRole, RequestContext};

use crate::output::OutputFormat;

/// Resort booking administration
#[derive(Debug, Parser)]
#[command(name = "resort", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the booking server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Service catalog
    Services(services::ServicesArgs),
    /// Time slot management
    Slots(slots::SlotsArgs),
    /// Occupancy rollup for a service
    Occupancy(occupancy::OccupancyArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.config).await,
            Commands::Migrate(args) => migrate::execute(args, &self.config).await,
            Commands::Services(args) => services::execute(args, &self.config, self.format).await,
            Commands::Slots(args) => slots::execute(args, &self.config, self.format).await,
            Commands::Occupancy(args) => occupancy::execute(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load_from(config_path)
}

/// Helper: load configuration and wire the services
pub async fn load_state(config_path: &str) -> Result<AppState, AppError> {
    resort_api::build_state(load_config(config_path)?).await
}

/// Operator identity for commands run from the shell.
pub fn operator(actor: Option<UserId>) -> RequestContext {
    RequestContext::new(actor.unwrap_or_default(), CallerRole::Admin)
}
