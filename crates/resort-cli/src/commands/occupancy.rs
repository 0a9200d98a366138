//! Occupancy rollup command.

use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use resort_core::error::AppError;
use resort_core::types::id::ServiceId;
use resort_service::availability::DailyOccupancy;

use crate::output::{self, OutputFormat};

/// Arguments for the occupancy command
#[derive(Debug, Args)]
pub struct OccupancyArgs {
    /// Service ID
    #[arg(short, long)]
    pub service: ServiceId,
    /// First date (YYYY-MM-DD)
    #[arg(long)]
    pub from: NaiveDate,
    /// Last date (YYYY-MM-DD)
    #[arg(long)]
    pub to: NaiveDate,
}

/// Per-day display row
#[derive(Debug, Serialize, Tabled)]
struct DayRow {
    date: String,
    slots: u32,
    empty: u32,
    partial: u32,
    full: u32,
    closed: u32,
    booked: String,
    rate: String,
}

impl From<&DailyOccupancy> for DayRow {
    fn from(day: &DailyOccupancy) -> Self {
        let s = &day.summary;
        Self {
            date: day.date.to_string(),
            slots: s.total_slots,
            empty: s.empty_slots,
            partial: s.partial_slots,
            full: s.full_slots,
            closed: s.closed_slots,
            booked: format!("{}/{}", s.total_booked, s.total_capacity),
            rate: format!("{:.0}%", s.occupancy_rate * 100.0),
        }
    }
}

/// Execute the occupancy command
pub async fn execute(
    args: &OccupancyArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let state = super::load_state(config_path).await?;
    let report = state
        .slots
        .occupancy(&super::operator(None), args.service, args.from, args.to)
        .await?;

    match format {
        OutputFormat::Json => output::print_item(&report, format),
        OutputFormat::Table => {
            let rows: Vec<DayRow> = report.daily.iter().map(DayRow::from).collect();
            output::print_list(&rows, format);
            let s = &report.summary;
            output::print_kv("Total slots", &s.total_slots.to_string());
            output::print_kv("Booked / capacity", &format!("{}/{}", s.total_booked, s.total_capacity));
            output::print_kv("Overbooked slots", &s.overbooked_slots.to_string());
            output::print_kv("Occupancy", &format!("{:.1}%", s.occupancy_rate * 100.0));
        }
    }

    Ok(())
}
