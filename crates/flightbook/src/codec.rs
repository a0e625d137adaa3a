//! Line-based record format for the ledger file.
//!
//! Each booking is written as one `Label: value` line per field, in a fixed
//! order, followed by a separator line of 21 dashes:
//!
//! ```text
//! Booking ID: BKG4821
//! Name: Asha
//! From: Mumbai
//! To: Delhi
//! Flight: Indigo
//! Date: 2025-10-16
//! Time: 09:00
//! Price: 1959
//! ---------------------
//! ```
//!
//! Decoding is lenient. Unknown lines inside a record are ignored, and a
//! record without an id or a name is dropped rather than failing the scan, so
//! a damaged region of the file only costs the records it touches.

use tracing::{trace, warn};

use crate::booking::Booking;

/// Line terminating every record.
pub const SEPARATOR: &str = "---------------------";

/// Number of lines one encoded record occupies, separator included.
pub const RECORD_LINES: usize = 9;

/// Field label for the booking id.
pub const LABEL_ID: &str = "Booking ID";
/// Field label for the passenger name.
pub const LABEL_NAME: &str = "Name";
/// Field label for the departure city.
pub const LABEL_FROM: &str = "From";
/// Field label for the arrival city.
pub const LABEL_TO: &str = "To";
/// Field label for the carrier.
pub const LABEL_FLIGHT: &str = "Flight";
/// Field label for the departure date.
pub const LABEL_DATE: &str = "Date";
/// Field label for the departure time.
pub const LABEL_TIME: &str = "Time";
/// Field label for the fare.
pub const LABEL_PRICE: &str = "Price";

/// Encode a booking as its text block, trailing newline included.
#[must_use]
pub fn encode(booking: &Booking) -> String {
    encode_lines(booking)
        .into_iter()
        .map(|line| line + "\n")
        .collect()
}

/// Encode a booking as its individual lines, without line terminators.
#[must_use]
pub fn encode_lines(booking: &Booking) -> Vec<String> {
    let price = booking.price.to_string();
    let fields = [
        (LABEL_ID, booking.id.as_str()),
        (LABEL_NAME, booking.passenger_name.as_str()),
        (LABEL_FROM, booking.origin.as_str()),
        (LABEL_TO, booking.destination.as_str()),
        (LABEL_FLIGHT, booking.carrier.as_str()),
        (LABEL_DATE, booking.departure_date.as_str()),
        (LABEL_TIME, booking.departure_time.as_str()),
        (LABEL_PRICE, price.as_str()),
    ];

    fields
        .iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .chain(std::iter::once(SEPARATOR.to_string()))
        .collect()
}

/// Check whether `line` terminates a record.
#[must_use]
pub fn is_separator(line: &str) -> bool {
    line.trim_end() == SEPARATOR
}

/// Check whether `line` opens a new record.
#[must_use]
pub fn starts_record(line: &str) -> bool {
    field_value(line, LABEL_ID).is_some()
}

/// Extract the value of a `Label: value` line if it carries `label`.
fn field_value<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    line.strip_prefix(label)?.strip_prefix(':').map(str::trim)
}

/// Parse a stored fare.
///
/// Leading decoration such as a currency sign is skipped, so `₹ 1959` and
/// `1959` both parse.
fn parse_price(value: &str) -> Option<u32> {
    let digits = value.trim_start_matches(|c: char| !c.is_ascii_digit());
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok()
}

/// Accumulates the field lines of one record.
#[derive(Debug, Default, Clone)]
pub struct RecordBuilder {
    id: Option<String>,
    passenger_name: Option<String>,
    origin: Option<String>,
    destination: Option<String>,
    carrier: Option<String>,
    departure_date: Option<String>,
    departure_time: Option<String>,
    price: Option<u32>,
}

impl RecordBuilder {
    /// Feed one line of the record. Lines without a known label are ignored.
    pub fn push_line(&mut self, line: &str) {
        let slots = [
            (LABEL_ID, &mut self.id),
            (LABEL_NAME, &mut self.passenger_name),
            (LABEL_FROM, &mut self.origin),
            (LABEL_TO, &mut self.destination),
            (LABEL_FLIGHT, &mut self.carrier),
            (LABEL_DATE, &mut self.departure_date),
            (LABEL_TIME, &mut self.departure_time),
        ];
        for (label, slot) in slots {
            if let Some(value) = field_value(line, label) {
                *slot = Some(value.to_string());
                return;
            }
        }

        if let Some(value) = field_value(line, LABEL_PRICE) {
            self.price = parse_price(value);
            if self.price.is_none() {
                trace!(value, "unparseable price");
            }
        } else {
            trace!(line, "ignoring unrecognised line in record");
        }
    }

    /// Finish the record.
    ///
    /// Returns `None` when the id or the name is missing (or empty). Other
    /// missing fields decode as empty strings and a missing fare as 0.
    #[must_use]
    pub fn build(self) -> Option<Booking> {
        let id = self.id.filter(|id| !id.is_empty())?;
        let passenger_name = self.passenger_name.filter(|name| !name.is_empty())?;
        Some(Booking {
            id,
            passenger_name,
            origin: self.origin.unwrap_or_default(),
            destination: self.destination.unwrap_or_default(),
            carrier: self.carrier.unwrap_or_default(),
            departure_date: self.departure_date.unwrap_or_default(),
            departure_time: self.departure_time.unwrap_or_default(),
            price: self.price.unwrap_or(0),
        })
    }
}

/// Lazy decoder from a stream of lines to bookings.
///
/// Errors from the underlying line source are passed through unchanged; the
/// decoder itself never fails.
#[derive(Debug)]
pub struct Records<I> {
    lines: I,
}

impl<I> Records<I> {
    /// Decode bookings from `lines`.
    pub fn new(lines: I) -> Self {
        Self { lines }
    }
}

impl<I, E> Iterator for Records<I>
where
    I: Iterator<Item = Result<String, E>>,
{
    type Item = Result<Booking, E>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut current: Option<RecordBuilder> = None;

        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e)),
            };

            if is_separator(&line) {
                if let Some(builder) = current.take() {
                    match builder.build() {
                        Some(booking) => return Some(Ok(booking)),
                        None => warn!("discarding record without booking id or name"),
                    }
                }
                continue;
            }

            if starts_record(&line) {
                if current.is_some() {
                    warn!("discarding unterminated record");
                }
                current = Some(RecordBuilder::default());
            }

            if let Some(builder) = current.as_mut() {
                builder.push_line(&line);
            }
        }
    }
}

/// Decode every complete record in an in-memory ledger text.
#[must_use]
pub fn decode_str(text: &str) -> Vec<Booking> {
    Records::new(
        text.lines()
            .map(|line| Ok::<_, std::convert::Infallible>(line.to_string())),
    )
    .filter_map(Result::ok)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::BookingRequest;

    fn sample(id: &str, name: &str) -> Booking {
        BookingRequest::new(name, "Mumbai", "Delhi", "Indigo", "2025-10-16", "09:00")
            .into_booking(id.to_string(), 1959)
    }

    #[test]
    fn test_separator_is_21_dashes() {
        assert_eq!(SEPARATOR.len(), 21);
        assert!(SEPARATOR.chars().all(|c| c == '-'));
    }

    #[test]
    fn test_encode_layout() {
        let text = encode(&sample("BKG4821", "Asha"));
        let expected = "Booking ID: BKG4821\n\
                        Name: Asha\n\
                        From: Mumbai\n\
                        To: Delhi\n\
                        Flight: Indigo\n\
                        Date: 2025-10-16\n\
                        Time: 09:00\n\
                        Price: 1959\n\
                        ---------------------\n";
        assert_eq!(text, expected);
        assert_eq!(text.lines().count(), RECORD_LINES);
    }

    #[test]
    fn test_decode_reproduces_fields() {
        let bookings = vec![sample("BKG1", "Asha"), sample("BKG2", "Ravi Kumar")];
        let text: String = bookings.iter().map(encode).collect();
        assert_eq!(decode_str(&text), bookings);
    }

    #[test]
    fn test_decode_ignores_unknown_lines() {
        let text = "Booking ID: BKG9\nSeat: 12A\nName: Asha\nPrice: 1500\n---------------------\n";
        let bookings = decode_str(text);
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].passenger_name, "Asha");
        assert_eq!(bookings[0].price, 1500);
        assert_eq!(bookings[0].origin, "");
    }

    #[test]
    fn test_decode_discards_record_without_name() {
        let text = format!(
            "Booking ID: BKG1\nFrom: Goa\n{SEPARATOR}\n{}",
            encode(&sample("BKG2", "Ravi"))
        );
        let bookings = decode_str(&text);
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].id, "BKG2");
    }

    #[test]
    fn test_decode_skips_lines_outside_records() {
        let text = format!("stray line\n{SEPARATOR}\n{}", encode(&sample("BKG5", "Asha")));
        let bookings = decode_str(&text);
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].id, "BKG5");
    }

    #[test]
    fn test_decode_drops_unterminated_tail() {
        let text = format!("{}Booking ID: BKG7\nName: Partial\n", encode(&sample("BKG6", "Asha")));
        let bookings = decode_str(&text);
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].id, "BKG6");
    }

    #[test]
    fn test_new_id_line_abandons_open_record() {
        let text = format!("Booking ID: BKG1\nName: Lost\n{}", encode(&sample("BKG2", "Kept")));
        let bookings = decode_str(&text);
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].passenger_name, "Kept");
    }

    #[test]
    fn test_parse_price_with_currency_prefix() {
        assert_eq!(parse_price("\u{20b9} 1959"), Some(1959));
        assert_eq!(parse_price("1959"), Some(1959));
        assert_eq!(parse_price("free"), None);
    }

    #[test]
    fn test_decode_tolerates_crlf() {
        let text = encode(&sample("BKG3", "Asha")).replace('\n', "\r\n");
        let bookings = decode_str(&text);
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].price, 1959);
    }

    #[test]
    fn test_decode_passes_source_errors_through() {
        let lines = vec![
            Ok("Booking ID: BKG1".to_string()),
            Err("disk fell off"),
        ];
        let mut records = Records::new(lines.into_iter());
        assert_eq!(records.next(), Some(Err("disk fell off")));
        assert_eq!(records.next(), None);
    }

    #[test]
    fn test_field_value_requires_colon_after_label() {
        assert_eq!(field_value("Name: Asha", LABEL_NAME), Some("Asha"));
        assert_eq!(field_value("Named: Asha", LABEL_NAME), None);
        assert_eq!(field_value("Time:09:00", LABEL_TIME), Some("09:00"));
    }
}
