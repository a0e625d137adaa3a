//! Booking operations exposed to front ends.
//!
//! [`BookingService`] ties the codec, the fare function and the ledger
//! together. Its four operations (create, search, cancel, list) are the whole
//! surface a front end needs. It never prints; outcomes are returned as
//! values.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::booking::{is_id_shaped, Booking, BookingRequest};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::ids::IdGenerator;
use crate::ledger::Ledger;
use crate::pricing;

/// Result of a cancel request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CancelOutcome {
    /// The booking was removed from the ledger.
    Cancelled {
        /// The removed booking.
        booking: Booking,
    },
    /// No booking id contained the key.
    NotFound,
    /// The key named a passenger rather than a single booking; nothing was
    /// removed. Resubmit with one of the candidate ids.
    AmbiguousMatch {
        /// Ids of the bookings whose passenger name matched.
        candidate_ids: Vec<String>,
    },
}

/// Booking operations over one ledger.
#[derive(Debug)]
pub struct BookingService {
    ledger: Ledger,
    ids: IdGenerator,
}

impl BookingService {
    /// Create a service over an open ledger.
    #[must_use]
    pub fn new(ledger: Ledger, ids: IdGenerator) -> Self {
        Self { ledger, ids }
    }

    /// Open the configured ledger and build a service for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be opened or created.
    pub fn from_config(config: &Config) -> Result<Self> {
        let ledger = Ledger::open(config.ledger_path())?.with_sync_writes(config.ledger.sync_writes);
        let ids = IdGenerator::new(
            config.booking.id_strategy,
            config.booking.id_range,
            config.booking.max_id_attempts,
        );
        Ok(Self::new(ledger, ids))
    }

    /// The underlying ledger.
    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Fare for a route and schedule, without booking anything.
    ///
    /// # Errors
    ///
    /// Returns a validation error if origin and destination are the same.
    pub fn quote(origin: &str, destination: &str, carrier: &str, time: &str) -> Result<u32> {
        let (origin, destination) = (origin.trim(), destination.trim());
        if origin == destination {
            return Err(Error::validation("origin and destination must differ"));
        }
        Ok(pricing::price(origin, destination, carrier.trim(), time.trim()))
    }

    /// Validate, price and append a new booking.
    ///
    /// Every field is trimmed before it is checked, priced and stored.
    ///
    /// # Errors
    ///
    /// Returns a validation error (and writes nothing) if the request is
    /// incomplete or origin equals destination, or an I/O error if the
    /// ledger cannot be written.
    pub fn create(&mut self, request: BookingRequest) -> Result<Booking> {
        let request = request.trimmed();
        validate_request(&request)?;

        let ledger = &self.ledger;
        let id = self.ids.next_id(|| live_ids(ledger))?;
        let price = pricing::price(
            &request.origin,
            &request.destination,
            &request.carrier,
            &request.departure_time,
        );
        let booking = request.into_booking(id, price);

        self.ledger.append_booking(&booking)?;
        info!(id = %booking.id, price, "Created booking");
        Ok(booking)
    }

    /// Every ledger line containing `key`, in file order.
    ///
    /// This is line-level: a match inside one field returns that line only,
    /// not the whole record. An empty result means nothing matched.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank key, or an I/O error if the
    /// ledger cannot be read.
    pub fn search(&self, key: &str) -> Result<Vec<String>> {
        require_key(key)?;
        self.ledger.search_lines(key)
    }

    /// Cancel a booking by id, or list candidates for a passenger name.
    ///
    /// Records whose name equals `key` (ignoring case) are collected first.
    /// More than one such record, or exactly one when `key` does not start
    /// with `BKG`, yields [`CancelOutcome::AmbiguousMatch`] without touching
    /// the ledger. Otherwise the first record whose id contains `key` is
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank key, or an I/O error if the
    /// ledger cannot be read or rewritten.
    pub fn cancel(&self, key: &str) -> Result<CancelOutcome> {
        require_key(key)?;

        let wanted = key.to_lowercase();
        let mut candidate_ids = Vec::new();
        for booking in self.ledger.records()? {
            let booking = booking?;
            if booking.passenger_name.to_lowercase() == wanted {
                candidate_ids.push(booking.id);
            }
        }

        if candidate_ids.len() > 1 || (candidate_ids.len() == 1 && !is_id_shaped(key)) {
            debug!(key, candidates = candidate_ids.len(), "Cancel key matches passenger name");
            return Ok(CancelOutcome::AmbiguousMatch { candidate_ids });
        }

        Ok(match self.ledger.delete_by_id(key)? {
            Some(booking) => CancelOutcome::Cancelled { booking },
            None => {
                debug!(key, "No booking id contains cancel key");
                CancelOutcome::NotFound
            }
        })
    }

    /// The full ledger content, line by line, unmodified.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the ledger cannot be read.
    pub fn list_all(&self) -> Result<Vec<String>> {
        self.ledger.read_all()
    }
}

fn live_ids(ledger: &Ledger) -> Result<HashSet<String>> {
    ledger
        .records()?
        .map(|booking| booking.map(|b| b.id))
        .collect()
}

fn require_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(Error::validation("key must not be empty"));
    }
    Ok(())
}

fn validate_request(request: &BookingRequest) -> Result<()> {
    let fields = [
        ("passenger name", &request.passenger_name),
        ("origin", &request.origin),
        ("destination", &request.destination),
        ("carrier", &request.carrier),
        ("departure date", &request.departure_date),
        ("departure time", &request.departure_time),
    ];
    for (field, value) in fields {
        if value.is_empty() {
            return Err(Error::validation(format!("{field} must not be empty")));
        }
        if value.contains(['\n', '\r']) {
            return Err(Error::validation(format!(
                "{field} must not contain line breaks"
            )));
        }
    }

    if request.origin == request.destination {
        return Err(Error::validation("origin and destination must differ"));
    }

    Ok(())
}
