//! `flightbook` - A flat-file flight reservation ledger
//!
//! Bookings are stored as fixed-shape text records in a single file, with no
//! database engine. This library provides the record codec, the fare
//! function, the ledger store and the booking service built on them.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod admin;
pub mod booking;
pub mod catalog;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod ids;
pub mod ledger;
pub mod logging;
pub mod pricing;
pub mod service;

pub use admin::AdminGate;
pub use booking::{Booking, BookingRequest};
pub use config::Config;
pub use error::{Error, Result};
pub use ids::{IdGenerator, IdStrategy};
pub use ledger::{Ledger, LedgerStats};
pub use logging::init_logging;
pub use service::{BookingService, CancelOutcome};
