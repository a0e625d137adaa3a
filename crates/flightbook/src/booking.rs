//! Core booking types for flightbook.
//!
//! A [`Booking`] is the only entity in the ledger. It is created once, with
//! its id and fare fixed at that moment, and never updated afterwards.

use serde::{Deserialize, Serialize};

/// Prefix every booking id starts with.
pub const ID_PREFIX: &str = "BKG";

/// A confirmed flight reservation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Booking {
    /// Booking id, `BKG` followed by decimal digits.
    pub id: String,

    /// Passenger name as entered, trimmed.
    pub passenger_name: String,

    /// Departure city.
    pub origin: String,

    /// Arrival city.
    pub destination: String,

    /// Operating carrier.
    pub carrier: String,

    /// Departure date, as selected.
    pub departure_date: String,

    /// Departure time slot, as selected.
    pub departure_time: String,

    /// Fare computed when the booking was created.
    pub price: u32,
}

/// The caller-supplied part of a booking.
///
/// Everything a front end collects from the user; the service adds the id
/// and fare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Passenger name.
    pub passenger_name: String,
    /// Departure city.
    pub origin: String,
    /// Arrival city.
    pub destination: String,
    /// Operating carrier.
    pub carrier: String,
    /// Departure date.
    pub departure_date: String,
    /// Departure time slot.
    pub departure_time: String,
}

impl BookingRequest {
    /// Build a request from its six fields.
    #[must_use]
    pub fn new(
        passenger_name: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        carrier: impl Into<String>,
        departure_date: impl Into<String>,
        departure_time: impl Into<String>,
    ) -> Self {
        Self {
            passenger_name: passenger_name.into(),
            origin: origin.into(),
            destination: destination.into(),
            carrier: carrier.into(),
            departure_date: departure_date.into(),
            departure_time: departure_time.into(),
        }
    }

    /// The same request with surrounding whitespace removed from every field.
    #[must_use]
    pub fn trimmed(self) -> Self {
        Self::new(
            self.passenger_name.trim(),
            self.origin.trim(),
            self.destination.trim(),
            self.carrier.trim(),
            self.departure_date.trim(),
            self.departure_time.trim(),
        )
    }

    /// Turn the request into a booking with the given id and fare.
    ///
    /// Fields are trimmed the same way as [`BookingRequest::trimmed`].
    #[must_use]
    pub fn into_booking(self, id: String, price: u32) -> Booking {
        let request = self.trimmed();
        Booking {
            id,
            passenger_name: request.passenger_name,
            origin: request.origin,
            destination: request.destination,
            carrier: request.carrier,
            departure_date: request.departure_date,
            departure_time: request.departure_time,
            price,
        }
    }
}

/// Check whether `key` syntactically resembles a booking id.
///
/// Only the prefix is checked, so a passenger whose name starts with `BKG`
/// is classified as an id.
#[must_use]
pub fn is_id_shaped(key: &str) -> bool {
    key.starts_with(ID_PREFIX)
}

/// Format a numeric id suffix as a booking id.
#[must_use]
pub fn format_id(n: u32) -> String {
    format!("{ID_PREFIX}{n}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_id() {
        assert_eq!(format_id(0), "BKG0");
        assert_eq!(format_id(4821), "BKG4821");
    }

    #[test]
    fn test_is_id_shaped() {
        assert!(is_id_shaped("BKG12"));
        assert!(is_id_shaped("BKGarcia"));
        assert!(!is_id_shaped("bkg12"));
        assert!(!is_id_shaped("Asha"));
    }

    #[test]
    fn test_into_booking_trims_name() {
        let request = BookingRequest::new("  Asha ", "Mumbai", "Delhi", "Indigo", "2025-10-16", "09:00");
        let booking = request.into_booking("BKG1".to_string(), 1959);
        assert_eq!(booking.passenger_name, "Asha");
        assert_eq!(booking.id, "BKG1");
        assert_eq!(booking.price, 1959);
        assert_eq!(booking.departure_time, "09:00");
    }

    #[test]
    fn test_trimmed_strips_every_field() {
        let request = BookingRequest::new(" Asha", "Mumbai ", "\tDelhi", "Indigo ", " 2025-10-16", "09:00 ");
        assert_eq!(
            request.trimmed(),
            BookingRequest::new("Asha", "Mumbai", "Delhi", "Indigo", "2025-10-16", "09:00")
        );
    }

    #[test]
    fn test_booking_serialization() {
        let booking = BookingRequest::new("Ravi", "Goa", "Pune", "GoAir", "2025-10-18", "12:00")
            .into_booking("BKG77".to_string(), 1817);
        let json = serde_json::to_string(&booking).unwrap();
        assert!(json.contains("\"passenger_name\":\"Ravi\""));
        let deserialized: Booking = serde_json::from_str(&json).unwrap();
        assert_eq!(booking, deserialized);
    }
}
