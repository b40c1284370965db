//! Build script for parkit-cli.
//!
//! This script generates the `parkit.1` man page at build time using
//! clap_mangen. The page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
fn build_cli() -> Command {
    Command::new("parkit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Park vehicles, issue tickets and bill departures")
        .long_about(
            "Operator console for a small parking lot: allocates car and bike spots, \
             issues tickets on entry and computes the fare on exit",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("PARKIT_DATA_DIR"),
        )
        .arg(
            Arg::new("busy-timeout")
                .long("busy-timeout")
                .help("Override the default busy timeout (in seconds)")
                .value_name("SECONDS")
                .global(true)
                .env("PARKIT_BUSY_TIMEOUT"),
        )
        .arg(
            Arg::new("disable-autoinit")
                .long("disable-autoinit")
                .help("Disable automatic database initialization")
                .global(true)
                .action(ArgAction::SetTrue)
                .env("PARKIT_DISABLE_AUTOINIT"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Read configuration from this file as well")
                .value_name("FILE")
                .global(true)
                .env("PARKIT_CONFIG"),
        )
        .subcommands(vec![
            Command::new("init")
                .about("Initialize the data directory and the spot inventory")
                .long_about("Create the parkit database and seed the configured car and bike spots"),
            Command::new("enter")
                .about("Park an arriving vehicle and issue a ticket")
                .long_about(
                    "Allocate the lowest-numbered free spot for the vehicle type and open a ticket",
                ),
            Command::new("exit")
                .about("Bill a departing vehicle and free its spot")
                .long_about(
                    "Close the open ticket, compute the fare (with grace period and loyalty \
                     discount) and release the spot",
                ),
            Command::new("spots")
                .about("Show the spot inventory")
                .long_about("Display every spot, its availability and current occupant"),
            Command::new("history")
                .about("Show the tickets of one registration or all open tickets")
                .long_about("Display past and current parking sessions"),
            Command::new("reset")
                .about("Delete every ticket and free every spot")
                .long_about("Clear all parking history; requires --yes"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("parkit.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
