//! History command implementation.
//!
//! Shows every ticket of one registration, oldest first, or every open
//! ticket when no registration is given.

use crate::commands::spots::{csv_error, OutputFormat};
use crate::error::CliError;
use crate::utils::{
    format_price, format_timestamp, load_configuration, open_database, GlobalOptions,
};
use clap::Args;
use parkit::{Database, RegistrationId, Ticket};
use std::io::Write;

const COLUMN_HEADERS: [&str; 7] = [
    "ticket",
    "plate",
    "spot",
    "category",
    "entered_at",
    "exited_at",
    "price",
];

/// Show parking history.
#[derive(Args)]
pub struct HistoryCommand {
    /// Vehicle registration number (all open tickets when omitted)
    #[arg(long, value_name = "ID")]
    pub plate: Option<String>,

    /// Output format
    #[arg(
        long,
        value_enum,
        default_value = "table",
        env = "PARKIT_OUTPUT_FORMAT",
        ignore_case = true
    )]
    pub format: OutputFormat,
}

impl HistoryCommand {
    /// Execute the history command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        let tickets = match self.plate {
            Some(ref plate) => {
                let registration = RegistrationId::new(plate).map_err(parkit::Error::from)?;
                Database::tickets_for(db.connection(), &registration)?
            }
            None => Database::list_open_tickets(db.connection())?,
        };

        let rows: Vec<[String; 7]> = tickets.iter().map(ticket_row).collect();

        match self.format {
            OutputFormat::Table => {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                writeln!(handle, "{}", COLUMN_HEADERS.join("\t").to_uppercase())?;
                for row in &rows {
                    let cells: Vec<&str> = row
                        .iter()
                        .map(|c| if c.is_empty() { "-" } else { c.as_str() })
                        .collect();
                    writeln!(handle, "{}", cells.join("\t"))?;
                }
            }
            OutputFormat::Json => {
                let json_data: Vec<serde_json::Value> = tickets
                    .iter()
                    .map(|t| {
                        serde_json::json!({
                            "ticket": t.id().map(|id| id.0),
                            "plate": t.registration().as_str(),
                            "spot": t.spot().number().value(),
                            "category": t.spot().category().as_str(),
                            "entered_at": format_timestamp(t.entered_at()),
                            "exited_at": t.exited_at().map(format_timestamp),
                            "price": t.price(),
                        })
                    })
                    .collect();
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                serde_json::to_writer_pretty(&mut handle, &json_data)
                    .map_err(|e| CliError::Io(e.into()))?;
                writeln!(handle)?;
            }
            OutputFormat::Csv => {
                let mut writer = csv::Writer::from_writer(std::io::stdout().lock());
                writer.write_record(COLUMN_HEADERS).map_err(csv_error)?;
                for row in &rows {
                    writer.write_record(row).map_err(csv_error)?;
                }
                writer.flush()?;
            }
        }

        Ok(())
    }
}

// Empty cells stand for "not yet" (open ticket) and are rendered per format
fn ticket_row(ticket: &Ticket) -> [String; 7] {
    [
        ticket.id().map(|id| id.to_string()).unwrap_or_default(),
        ticket.registration().to_string(),
        ticket.spot().number().to_string(),
        ticket.spot().category().to_string(),
        format_timestamp(ticket.entered_at()),
        ticket.exited_at().map(format_timestamp).unwrap_or_default(),
        ticket.price().map(format_price).unwrap_or_default(),
    ]
}
