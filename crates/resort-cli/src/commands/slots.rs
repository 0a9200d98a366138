//! Time slot commands.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use resort_core::error::AppError;
use resort_core::types::id::{ServiceId, UserId};
use resort_entity::slot::TimeSlot;

use crate::output::{self, OutputFormat};

/// Arguments for slot commands
#[derive(Debug, Args)]
pub struct SlotsArgs {
    /// Slot subcommand
    #[command(subcommand)]
    pub command: SlotsCommand,
}

/// Slot subcommands
#[derive(Debug, Subcommand)]
pub enum SlotsCommand {
    /// Materialize slots for an inclusive date range
    Generate {
        /// Service ID
        #[arg(short, long)]
        service: ServiceId,
        /// First date (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Last date (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,
        /// Operator user ID recorded in logs
        #[arg(long)]
        actor: Option<UserId>,
    },
    /// List persisted slots
    List {
        /// Service ID
        #[arg(short, long)]
        service: ServiceId,
        /// First date (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Last date (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,
    },
}

/// Slot display row
#[derive(Debug, Serialize, Tabled)]
struct SlotRow {
    id: String,
    date: String,
    time: String,
    booked: String,
    available: i32,
    status: String,
    open: String,
}

impl From<&TimeSlot> for SlotRow {
    fn from(slot: &TimeSlot) -> Self {
        Self {
            id: slot.id.to_string(),
            date: slot.date.to_string(),
            time: format!("{}-{}", slot.start_time, slot.end_time),
            booked: format!("{}/{}", slot.booked, slot.capacity),
            available: slot.available(),
            status: slot.status().to_string(),
            open: if slot.is_available { "yes" } else { "no" }.to_string(),
        }
    }
}

/// Execute slot commands
pub async fn execute(
    args: &SlotsArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let state = super::load_state(config_path).await?;

    match &args.command {
        SlotsCommand::Generate {
            service,
            from,
            to,
            actor,
        } => {
            let report = state
                .slots
                .generate(&super::operator(*actor), *service, *from, *to)
                .await?;
            match format {
                OutputFormat::Json => output::print_item(&report, format),
                OutputFormat::Table => output::print_success(&format!(
                    "{} slots from {} to {}: {} inserted, {} already present",
                    report.generated, report.from, report.to, report.inserted, report.skipped
                )),
            }
        }
        SlotsCommand::List { service, from, to } => {
            let slots = state
                .slots
                .list(&super::operator(None), *service, *from, *to)
                .await?;
            let rows: Vec<SlotRow> = slots.iter().map(SlotRow::from).collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
