//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CompletionsCommand, EnterCommand, ExitCommand, HistoryCommand, InitCommand, ResetCommand,
    SpotsCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Operator console for a small parking lot.
#[derive(Parser)]
#[command(name = "parkit")]
#[command(version, about = "Park vehicles, issue tickets and bill departures", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "PARKIT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "PARKIT_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization
    #[arg(long, global = true, env = "PARKIT_DISABLE_AUTOINIT")]
    pub disable_autoinit: bool,

    /// Read configuration from this file as well
    #[arg(long, value_name = "FILE", global = true, env = "PARKIT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and the spot inventory
    Init(InitCommand),

    /// Park an arriving vehicle and issue a ticket
    Enter(EnterCommand),

    /// Bill a departing vehicle and free its spot
    Exit(ExitCommand),

    /// Show the spot inventory
    Spots(SpotsCommand),

    /// Show the tickets of one registration or all open tickets
    History(HistoryCommand),

    /// Delete every ticket and free every spot
    Reset(ResetCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
