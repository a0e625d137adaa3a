//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::builder::PossibleValuesParser;
use clap::{Args, Subcommand};

use crate::booking::BookingRequest;
use crate::catalog;

fn cities() -> PossibleValuesParser {
    PossibleValuesParser::new(catalog::CITIES)
}

fn carriers() -> PossibleValuesParser {
    PossibleValuesParser::new(catalog::CARRIERS)
}

fn dates() -> PossibleValuesParser {
    PossibleValuesParser::new(catalog::DATES)
}

fn times() -> PossibleValuesParser {
    PossibleValuesParser::new(catalog::TIMES)
}

/// Book command arguments.
#[derive(Debug, Args)]
pub struct BookCommand {
    /// Passenger name
    pub name: String,

    /// Departure city
    #[arg(long, value_parser = cities())]
    pub from: String,

    /// Arrival city
    #[arg(long, value_parser = cities())]
    pub to: String,

    /// Carrier
    #[arg(long, value_parser = carriers(), default_value = catalog::CARRIERS[0])]
    pub carrier: String,

    /// Departure date
    #[arg(long, value_parser = dates(), default_value = catalog::DATES[0])]
    pub date: String,

    /// Departure time
    #[arg(long, value_parser = times(), default_value = catalog::TIMES[0])]
    pub time: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl BookCommand {
    /// The booking request described by these arguments.
    #[must_use]
    pub fn to_request(&self) -> BookingRequest {
        BookingRequest::new(
            self.name.trim(),
            &self.from,
            &self.to,
            &self.carrier,
            &self.date,
            &self.time,
        )
    }
}

/// Quote command arguments.
#[derive(Debug, Args)]
pub struct QuoteCommand {
    /// Departure city
    #[arg(long, value_parser = cities())]
    pub from: String,

    /// Arrival city
    #[arg(long, value_parser = cities())]
    pub to: String,

    /// Carrier
    #[arg(long, value_parser = carriers(), default_value = catalog::CARRIERS[0])]
    pub carrier: String,

    /// Departure time
    #[arg(long, value_parser = times(), default_value = catalog::TIMES[0])]
    pub time: String,
}

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Text to look for in any ledger line (name, booking id, city, ...)
    pub key: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Cancel command arguments.
#[derive(Debug, Args)]
pub struct CancelCommand {
    /// Booking id, or a passenger name to list that passenger's booking ids
    pub key: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Admin user name
    #[arg(short, long, env = "FLIGHTBOOK_ADMIN_USER")]
    pub username: String,

    /// Admin password
    #[arg(short, long, env = "FLIGHTBOOK_ADMIN_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Show ledger statistics instead of the raw listing
    #[arg(long)]
    pub stats: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration file
    Validate {
        /// Path to configuration file (uses default if not specified)
        file: Option<PathBuf>,
    },
}
