//! Exit command implementation.
//!
//! Bills a departing vehicle and frees its spot.

use crate::console::ConsoleInput;
use crate::error::CliError;
use crate::utils::{
    format_price, format_timestamp, load_configuration, open_database, GlobalOptions,
};
use clap::Args;
use parkit::{ExitOutcome, FareCalculator, SessionOrchestrator};
use std::io;

/// Bill a departing vehicle.
#[derive(Args)]
pub struct ExitCommand {
    /// Vehicle registration number
    #[arg(long, value_name = "ID")]
    pub plate: Option<String>,
}

impl ExitCommand {
    /// Execute the exit command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        let stdin = io::stdin();
        let input = ConsoleInput::new(stdin.lock(), io::stderr()).with_registration(self.plate);
        let fares = FareCalculator::new(config.rate_table());
        let mut sessions = SessionOrchestrator::new(&db, &db, input, fares);

        match sessions.process_exiting_vehicle()? {
            ExitOutcome::Exited {
                ticket,
                loyal,
                spot_released,
            } => {
                // A closed ticket always carries both
                let price = ticket.price().unwrap_or_default();
                let exited_at = ticket.exited_at().unwrap_or_else(|| ticket.entered_at());

                println!(
                    "{} left spot {}",
                    ticket.registration(),
                    ticket.spot().number()
                );
                if !global.quiet {
                    println!("In-time: {}", format_timestamp(ticket.entered_at()));
                    println!("Out-time: {}", format_timestamp(exited_at));
                }
                if loyal {
                    println!("Fare: {} (5% loyalty discount applied)", format_price(price));
                } else {
                    println!("Fare: {}", format_price(price));
                }
                if !spot_released {
                    eprintln!(
                        "Warning: spot {} could not be released and still shows as taken",
                        ticket.spot().number()
                    );
                }
                Ok(())
            }
            ExitOutcome::NoOpenTicket { registration } => Err(CliError::SemanticFailure(
                format!("No open ticket for {registration}"),
            )),
            ExitOutcome::TicketNotClosed { ticket } => Err(CliError::SemanticFailure(format!(
                "Ticket for {} could not be closed; spot {} stays taken",
                ticket.registration(),
                ticket.spot().number()
            ))),
        }
    }
}
