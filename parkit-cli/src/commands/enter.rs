//! Enter command implementation.
//!
//! Parks an arriving vehicle: asks for the vehicle type and registration
//! (unless given as flags), claims the lowest free spot of that type and
//! issues a ticket.

use crate::console::{parse_category, ConsoleInput};
use crate::error::CliError;
use crate::utils::{format_timestamp, load_configuration, open_database, GlobalOptions};
use clap::Args;
use parkit::{EntryOutcome, FareCalculator, SessionOrchestrator};
use std::io;

/// Park an arriving vehicle.
#[derive(Args)]
pub struct EnterCommand {
    /// Vehicle type: car, bike, or the menu number (1 or 2)
    #[arg(long, value_name = "TYPE", value_parser = parse_category)]
    pub category: Option<i64>,

    /// Vehicle registration number
    #[arg(long, value_name = "ID")]
    pub plate: Option<String>,
}

impl EnterCommand {
    /// Execute the enter command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        let stdin = io::stdin();
        let input = ConsoleInput::new(stdin.lock(), io::stderr())
            .with_selection(self.category)
            .with_registration(self.plate);
        let fares = FareCalculator::new(config.rate_table());
        let mut sessions = SessionOrchestrator::new(&db, &db, input, fares);

        match sessions.process_incoming_vehicle()? {
            EntryOutcome::Parked { ticket, recurring } => {
                let spot = ticket.spot();
                println!(
                    "Parked {} at spot {} ({})",
                    ticket.registration(),
                    spot.number(),
                    spot.category()
                );
                if !global.quiet {
                    if let Some(id) = ticket.id() {
                        println!("Ticket: {id}");
                    }
                    println!("In-time: {}", format_timestamp(ticket.entered_at()));
                }
                if recurring {
                    println!("Welcome back! A 5% loyalty discount will be applied on exit");
                }
                Ok(())
            }
            EntryOutcome::AlreadyParked { registration } => Err(CliError::SemanticFailure(
                format!("{registration} is already parked (exit it first)"),
            )),
            EntryOutcome::NoSpotAvailable { category } => Err(CliError::SemanticFailure(
                format!("No {category} spot available"),
            )),
            EntryOutcome::SpotNotClaimed { category, spot } => Err(CliError::SemanticFailure(
                format!("{category} spot {spot} could not be claimed; please retry"),
            )),
            EntryOutcome::TicketNotSaved {
                registration,
                spot,
                spot_released,
            } => {
                if !spot_released {
                    eprintln!(
                        "Warning: spot {} could not be released and still shows as taken",
                        spot.number()
                    );
                }
                Err(CliError::SemanticFailure(format!(
                    "Ticket for {registration} could not be saved"
                )))
            }
        }
    }
}
