//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `init`: Create the data directory, database and spot inventory
//! - `enter`: Park an arriving vehicle
//! - `exit`: Bill a departing vehicle
//! - `spots`: Show the spot inventory
//! - `history`: Show tickets for a registration
//! - `reset`: Delete every ticket and free every spot
//! - `completions`: Generate shell completion scripts

pub mod completions;
pub mod enter;
pub mod exit;
pub mod history;
pub mod init;
pub mod reset;
pub mod spots;

pub use completions::CompletionsCommand;
pub use enter::EnterCommand;
pub use exit::ExitCommand;
pub use history::HistoryCommand;
pub use init::InitCommand;
pub use reset::ResetCommand;
pub use spots::SpotsCommand;
