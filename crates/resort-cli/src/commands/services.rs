//! Service catalog commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use resort_core::error::AppError;
use resort_core::types::id::UserId;
use resort_core::types::pagination::PageRequest;
use resort_entity::service::HotelService;
use resort_service::availability::format_duration;

use crate::output::{self, OutputFormat};

/// Arguments for service commands
#[derive(Debug, Args)]
pub struct ServicesArgs {
    /// Service subcommand
    #[command(subcommand)]
    pub command: ServicesCommand,
}

/// Service subcommands
#[derive(Debug, Subcommand)]
pub enum ServicesCommand {
    /// List services
    List {
        /// Include switched-off services
        #[arg(long)]
        all: bool,
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u64,
        /// Items per page
        #[arg(long, default_value_t = 50)]
        per_page: u64,
    },
    /// Switch a service on or off
    SetActive {
        /// Service ID
        id: resort_core::types::id::ServiceId,
        /// New state
        #[arg(long, action = clap::ArgAction::Set)]
        active: bool,
        /// Operator user ID recorded in logs
        #[arg(long)]
        actor: Option<UserId>,
    },
}

/// Service display row
#[derive(Debug, Serialize, Tabled)]
struct ServiceRow {
    id: String,
    name: String,
    kind: String,
    price: String,
    duration: String,
    capacity: String,
    window: String,
    days: String,
    active: String,
}

impl From<&HotelService> for ServiceRow {
    fn from(s: &HotelService) -> Self {
        Self {
            id: s.id.to_string(),
            name: s.name.clone(),
            kind: format!("{}/{}", s.service_type, s.category),
            price: if s.price_per_person {
                format!("{} pp", s.price)
            } else {
                s.price.to_string()
            },
            duration: format_duration(s.duration),
            capacity: format!("{}-{}", s.min_capacity, s.max_capacity),
            window: format!("{}-{} every {}min", s.start_time, s.end_time, s.slot_interval),
            days: s
                .available_days
                .iter()
                .map(|d| &d.as_str()[..3])
                .collect::<Vec<_>>()
                .join(","),
            active: if s.is_active { "yes" } else { "no" }.to_string(),
        }
    }
}

/// Execute service commands
pub async fn execute(
    args: &ServicesArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let state = super::load_state(config_path).await?;

    match &args.command {
        ServicesCommand::List {
            all,
            page,
            per_page,
        } => {
            let ctx = super::operator(None);
            let page = state
                .catalog
                .list(&ctx, *all, PageRequest::new(*page, *per_page))
                .await?;
            let rows: Vec<ServiceRow> = page.items.iter().map(ServiceRow::from).collect();
            output::print_list(&rows, format);
            if format == OutputFormat::Table {
                println!(
                    "Page {}/{} ({} services)",
                    page.page, page.total_pages, page.total_items
                );
            }
        }
        ServicesCommand::SetActive { id, active, actor } => {
            let service = state
                .catalog
                .set_active(&super::operator(*actor), *id, *active)
                .await?;
            output::print_success(&format!(
                "Service '{}' is now {}",
                service.name,
                if service.is_active { "active" } else { "inactive" }
            ));
        }
    }

    Ok(())
}
