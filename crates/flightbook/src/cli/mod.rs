//! Command-line interface for flightbook.
//!
//! This module provides the CLI structure for the `fbook` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    BookCommand, CancelCommand, ConfigCommand, ListCommand, QuoteCommand, SearchCommand,
};

/// fbook - Book, find and cancel flights in a plain-text ledger
///
/// Every booking is kept as a short block of text in a single ledger file.
#[derive(Debug, Parser)]
#[command(name = "fbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Book a ticket
    Book(BookCommand),

    /// Show the fare for a route without booking
    Quote(QuoteCommand),

    /// Search ledger lines by name, booking id or any other text
    Search(SearchCommand),

    /// Cancel a booking
    Cancel(CancelCommand),

    /// List every booking (admin only)
    List(ListCommand),

    /// Show the cities, carriers, dates and times on offer
    Catalog,

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
