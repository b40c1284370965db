//! Main entry point for the parkit CLI.
//!
//! This is the operator console for a parkit lot. It provides commands for
//! running the lot:
//! - `enter`: Park an arriving vehicle
//! - `exit`: Bill a departing vehicle
//! - `spots`: Show the spot inventory
//! - `history`: Show tickets for a registration

mod cli;
mod commands;
mod console;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    // Installs the `log` backend the library reports through
    let _logger = parkit::init_logger(cli.verbose, cli.quiet);

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
        disable_autoinit: cli.disable_autoinit,
        config_file: cli.config,
    };

    let result = match cli.command {
        cli::Command::Init(cmd) => cmd.execute(&global),
        cli::Command::Enter(cmd) => cmd.execute(&global),
        cli::Command::Exit(cmd) => cmd.execute(&global),
        cli::Command::Spots(cmd) => cmd.execute(&global),
        cli::Command::History(cmd) => cmd.execute(&global),
        cli::Command::Reset(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
