//! Operator console.
//!
//! Answers the session orchestrator's questions from command-line flags
//! when they were given, and by prompting on the terminal otherwise.

use std::io::{BufRead, Write};

use parkit::storage::OperatorInput;
use parkit::{Error, Result, VehicleCategory};

/// Operator input backed by a reader and a writer, usually stdin and stderr.
///
/// Prompts go to the writer so that stdout carries only command output.
#[derive(Debug)]
pub struct ConsoleInput<R, W> {
    reader: R,
    writer: W,
    selection: Option<i64>,
    registration: Option<String>,
}

impl<R: BufRead, W: Write> ConsoleInput<R, W> {
    /// Creates a console that prompts for every answer.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            selection: None,
            registration: None,
        }
    }

    /// Answer the vehicle-type question with `selection` instead of prompting.
    #[must_use]
    pub fn with_selection(mut self, selection: Option<i64>) -> Self {
        self.selection = selection;
        self
    }

    /// Answer the registration question with `registration` instead of
    /// prompting.
    #[must_use]
    pub fn with_registration(mut self, registration: Option<String>) -> Self {
        self.registration = registration;
        self
    }

    fn prompt(&mut self, lines: &[&str]) -> Result<String> {
        for line in lines {
            writeln!(self.writer, "{line}")?;
        }
        self.writer.flush()?;

        let mut answer = String::new();
        if self.reader.read_line(&mut answer)? == 0 {
            return Err(Error::Validation {
                field: "input".into(),
                message: "no answer given (end of input)".into(),
            });
        }
        Ok(answer.trim().to_string())
    }
}

impl<R: BufRead, W: Write> OperatorInput for ConsoleInput<R, W> {
    fn read_category_selection(&mut self) -> Result<i64> {
        if let Some(selection) = self.selection.take() {
            return Ok(selection);
        }

        let car = format!("{} {}", VehicleCategory::Car.selection_code(), VehicleCategory::Car);
        let bike = format!("{} {}", VehicleCategory::Bike.selection_code(), VehicleCategory::Bike);
        let answer = self.prompt(&["Please select vehicle type from menu", &car, &bike])?;

        answer.parse().map_err(|_| Error::Validation {
            field: "selection".into(),
            message: format!("'{answer}' is not a menu number"),
        })
    }

    fn read_registration_id(&mut self) -> Result<String> {
        if let Some(registration) = self.registration.take() {
            return Ok(registration);
        }
        self.prompt(&["Please type the vehicle registration number and press enter key"])
    }
}

/// Parses a `--category` value: a category name or its menu number.
///
/// Any integer is passed through unchanged so that out-of-menu codes are
/// rejected by the session itself.
///
/// # Errors
///
/// Returns a message for clap when the value is neither a name nor a number.
pub fn parse_category(value: &str) -> std::result::Result<i64, String> {
    if let Ok(code) = value.trim().parse::<i64>() {
        return Ok(code);
    }
    value
        .parse::<VehicleCategory>()
        .map(VehicleCategory::selection_code)
        .map_err(|e| format!("{e} (expected car, bike, 1 or 2)"))
}
