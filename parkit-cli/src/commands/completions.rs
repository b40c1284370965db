//! Shell completion generation command.

use crate::cli::Cli;
use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use std::io;

const BIN_NAME: &str = "parkit";

/// Generate shell completion scripts
#[derive(Parser)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    /// Execute the completions command.
    ///
    /// The script goes to stdout; installation hints go to stderr.
    pub fn execute(&self, global: &GlobalOptions) -> Result<(), CliError> {
        if !global.quiet {
            for line in install_hint(self.shell) {
                eprintln!("# {line}");
            }
            eprintln!();
        }

        generate(self.shell, &mut Cli::command(), BIN_NAME, &mut io::stdout());
        Ok(())
    }
}

fn install_hint(shell: Shell) -> Vec<String> {
    let target = match shell {
        Shell::Bash => "~/.local/share/bash-completion/completions/parkit",
        Shell::Zsh => "~/.zsh/completions/_parkit (a directory on your $fpath)",
        Shell::Fish => "~/.config/fish/completions/parkit.fish",
        Shell::PowerShell => "$PROFILE",
        _ => return vec![format!("Generating {shell} completion script")],
    };
    vec![
        format!("Generating {shell} completion script"),
        format!("Install with: {BIN_NAME} completions {shell} > {target}"),
    ]
}
