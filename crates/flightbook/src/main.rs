//! `fbook` - CLI for flightbook
//!
//! This binary is the presentation layer: it parses arguments, calls the
//! booking service and prints what comes back.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;

use flightbook::cli::{
    BookCommand, CancelCommand, Cli, Command, ConfigCommand, ListCommand, QuoteCommand,
    SearchCommand,
};
use flightbook::{catalog, init_logging, AdminGate, BookingService, CancelOutcome, Config};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Book(cmd) => handle_book(&config, &cmd),
        Command::Quote(cmd) => handle_quote(&cmd),
        Command::Search(cmd) => handle_search(&config, &cmd),
        Command::Cancel(cmd) => handle_cancel(&config, &cmd),
        Command::List(cmd) => handle_list(&config, &cmd),
        Command::Catalog => {
            handle_catalog();
            Ok(())
        }
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_service(config: &Config) -> anyhow::Result<BookingService> {
    BookingService::from_config(config)
        .with_context(|| format!("opening ledger {}", config.ledger_path().display()))
}

fn handle_book(config: &Config, cmd: &BookCommand) -> anyhow::Result<()> {
    let mut service = open_service(config)?;
    let booking = service.create(cmd.to_request())?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&booking)?);
    } else {
        println!("Ticket booked!");
        println!("  Booking ID: {}", booking.id);
        println!("  Name:       {}", booking.passenger_name);
        println!("  From:       {}", booking.origin);
        println!("  To:         {}", booking.destination);
        println!("  Flight:     {}", booking.carrier);
        println!("  Date:       {}", booking.departure_date);
        println!("  Time:       {}", booking.departure_time);
        println!("  Price:      \u{20b9} {}", booking.price);
    }
    Ok(())
}

fn handle_quote(cmd: &QuoteCommand) -> anyhow::Result<()> {
    let price = BookingService::quote(&cmd.from, &cmd.to, &cmd.carrier, &cmd.time)?;
    println!("\u{20b9} {price}");
    Ok(())
}

fn handle_search(config: &Config, cmd: &SearchCommand) -> anyhow::Result<()> {
    let key = cmd.key.trim();
    let lines = open_service(config)?.search(key)?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&lines)?);
    } else if lines.is_empty() {
        println!("No booking found for: {key}");
    } else {
        for line in lines {
            println!("{line}");
        }
    }
    Ok(())
}

fn handle_cancel(config: &Config, cmd: &CancelCommand) -> anyhow::Result<()> {
    let key = cmd.key.trim();
    let outcome = open_service(config)?.cancel(key)?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match outcome {
        CancelOutcome::Cancelled { booking } => {
            println!("Booking cancelled.");
            print!("{}", flightbook::codec::encode(&booking));
        }
        CancelOutcome::NotFound => println!("Booking ID not found: {key}"),
        CancelOutcome::AmbiguousMatch { candidate_ids } => {
            println!("Booking IDs for name '{key}':");
            for id in candidate_ids {
                println!("  {id}");
            }
            println!("Run `fbook cancel <BOOKING ID>` to cancel one of them.");
        }
    }
    Ok(())
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    AdminGate::from_config(&config.admin).authorize(&cmd.username, &cmd.password)?;
    let service = open_service(config)?;

    if cmd.stats {
        let stats = service.ledger().stats()?;
        println!("Ledger:   {}", service.ledger().path().display());
        println!("Bookings: {}", stats.total_records);
        println!("Lines:    {}", stats.total_lines);
        println!("Size:     {} bytes", stats.size_bytes);
        if let Some(modified) = stats.modified {
            println!("Modified: {}", modified.to_rfc3339());
        }
        return Ok(());
    }

    for line in service.list_all()? {
        println!("{line}");
    }
    Ok(())
}

fn handle_catalog() {
    println!("Cities:   {}", catalog::CITIES.join(", "));
    println!("Carriers: {}", catalog::CARRIERS.join(", "));
    println!("Dates:    {}", catalog::DATES.join(", "));
    println!("Times:    {}", catalog::TIMES.join(", "));
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Ledger]");
                println!("  Path:               {}", config.ledger_path().display());
                println!("  Sync writes:        {}", config.ledger.sync_writes);
                println!();
                println!("[Booking]");
                println!("  Id strategy:        {}", config.booking.id_strategy);
                println!("  Id range:           {}", config.booking.id_range);
                println!("  Max id attempts:    {}", config.booking.max_id_attempts);
                println!();
                println!("[Admin]");
                println!("  Username:           {}", config.admin.username);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
