//! Spots command implementation.
//!
//! This module implements the `spots` command, which displays the spot
//! inventory with its occupancy in various formats (table, JSON, CSV).

use crate::error::CliError;
use crate::utils::{format_timestamp, load_configuration, open_database, GlobalOptions};
use clap::{Args, ValueEnum};
use parkit::{Database, ParkingSpot, Ticket, VehicleCategory};
use std::collections::HashMap;
use std::io::Write;

/// Column headers for CSV output.
const COLUMN_HEADERS: [&str; 5] = ["spot", "category", "available", "plate", "entered_at"];

/// Show the spot inventory.
#[derive(Args)]
pub struct SpotsCommand {
    /// Output format
    #[arg(
        long,
        value_enum,
        default_value = "table",
        env = "PARKIT_OUTPUT_FORMAT",
        ignore_case = true
    )]
    pub format: OutputFormat,

    /// Only show spots of this vehicle type (car or bike)
    #[arg(long, value_name = "TYPE", value_parser = parse_category_name)]
    pub category: Option<VehicleCategory>,

    /// Only show free spots
    #[arg(long)]
    pub available_only: bool,
}

/// Output format for listing commands.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated table format (human-readable)
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

fn parse_category_name(value: &str) -> Result<VehicleCategory, String> {
    value.parse().map_err(|e: parkit::Error| e.to_string())
}

/// A spot and, when taken, the ticket holding it.
struct SpotRow<'a> {
    spot: ParkingSpot,
    occupant: Option<&'a Ticket>,
}

impl SpotsCommand {
    /// Execute the spots command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        let mut spots = Database::list_spots(db.connection())?;
        let open_tickets = Database::list_open_tickets(db.connection())?;

        if let Some(category) = self.category {
            spots.retain(|s| s.category() == category);
        }
        if self.available_only {
            spots.retain(ParkingSpot::is_available);
        }

        let by_spot: HashMap<_, _> = open_tickets
            .iter()
            .map(|t| (t.spot().number(), t))
            .collect();
        let rows: Vec<SpotRow<'_>> = spots
            .into_iter()
            .map(|spot| SpotRow {
                spot,
                occupant: by_spot.get(&spot.number()).copied(),
            })
            .collect();

        match self.format {
            OutputFormat::Table => format_as_table(&rows)?,
            OutputFormat::Json => format_as_json(&rows)?,
            OutputFormat::Csv => format_as_csv(&rows)?,
        }

        Ok(())
    }
}

/// Format spots as a human-readable table.
fn format_as_table(rows: &[SpotRow<'_>]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let header_line = COLUMN_HEADERS
        .iter()
        .map(|s| s.to_uppercase())
        .collect::<Vec<_>>()
        .join("\t");
    writeln!(handle, "{header_line}")?;

    for row in rows {
        writeln!(
            handle,
            "{}\t{}\t{}\t{}\t{}",
            row.spot.number(),
            row.spot.category(),
            if row.spot.is_available() { "yes" } else { "no" },
            row.occupant.map_or("-", |t| t.registration().as_str()),
            row.occupant
                .map_or_else(|| "-".to_string(), |t| format_timestamp(t.entered_at())),
        )?;
    }

    Ok(())
}

/// Format spots as JSON.
fn format_as_json(rows: &[SpotRow<'_>]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let json_data: Vec<serde_json::Value> = rows
        .iter()
        .map(|row| {
            serde_json::json!({
                "spot": row.spot.number().value(),
                "category": row.spot.category().as_str(),
                "available": row.spot.is_available(),
                "plate": row.occupant.map(|t| t.registration().as_str()),
                "entered_at": row.occupant.map(|t| format_timestamp(t.entered_at())),
            })
        })
        .collect();

    serde_json::to_writer_pretty(&mut handle, &json_data).map_err(|e| CliError::Io(e.into()))?;
    writeln!(handle)?;

    Ok(())
}

/// Convert `csv::Error` to `CliError`.
pub(crate) fn csv_error(e: csv::Error) -> CliError {
    CliError::Io(std::io::Error::other(e))
}

/// Format spots as CSV.
fn format_as_csv(rows: &[SpotRow<'_>]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut writer = csv::WriterBuilder::new().from_writer(stdout.lock());

    writer.write_record(COLUMN_HEADERS).map_err(csv_error)?;
    for row in rows {
        writer
            .write_record([
                row.spot.number().to_string(),
                row.spot.category().to_string(),
                row.spot.is_available().to_string(),
                row.occupant
                    .map(|t| t.registration().to_string())
                    .unwrap_or_default(),
                row.occupant
                    .map(|t| format_timestamp(t.entered_at()))
                    .unwrap_or_default(),
            ])
            .map_err(csv_error)?;
    }
    writer.flush()?;

    Ok(())
}
