//! Deterministic fare computation.
//!
//! A fare is computed once, when a booking is created, and stored verbatim in
//! the ledger. It is never recomputed, so [`stable_hash`] must produce the
//! same value on every platform and in every release.

/// Base fare before route and schedule adjustments.
pub const BASE_FARE: u32 = 1000;

/// Route component modulus applied to each city hash.
const ROUTE_MODULUS: u32 = 500;

/// Per-carrier surcharge. Unlisted carriers add nothing.
const CARRIER_SURCHARGES: [(&str, u32); 5] = [
    ("Indigo", 200),
    ("Air India", 150),
    ("SpiceJet", 180),
    ("Vistara", 220),
    ("GoAir", 170),
];

/// Per-slot surcharge. Unlisted slots add nothing.
const TIME_SURCHARGES: [(&str, u32); 6] = [
    ("06:00", 100),
    ("09:00", 120),
    ("12:00", 150),
    ("15:00", 130),
    ("18:00", 180),
    ("21:00", 160),
];

/// 32-bit polynomial string hash.
///
/// `h = 31 * h + unit` over the UTF-16 code units of `s`, starting from zero,
/// with wrapping arithmetic, read as a signed 32-bit integer. This is the
/// pinned algorithm every stored fare was computed with.
#[must_use]
pub fn stable_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Route component for one city: `|stable_hash(city)| mod 500`.
///
/// The magnitude is taken without overflow, so `i32::MIN` contributes
/// `2147483648 mod 500` rather than a negative value.
#[must_use]
pub fn city_component(city: &str) -> u32 {
    stable_hash(city).unsigned_abs() % ROUTE_MODULUS
}

/// Surcharge for `carrier`, or 0 if it is not listed.
#[must_use]
pub fn carrier_surcharge(carrier: &str) -> u32 {
    lookup(&CARRIER_SURCHARGES, carrier)
}

/// Surcharge for the departure `time` slot, or 0 if it is not listed.
#[must_use]
pub fn time_surcharge(time: &str) -> u32 {
    lookup(&TIME_SURCHARGES, time)
}

/// Compute the fare for a flight.
///
/// Pure and total: any strings are accepted, including equal origin and
/// destination (rejecting that is the caller's job).
#[must_use]
pub fn price(origin: &str, destination: &str, carrier: &str, time: &str) -> u32 {
    BASE_FARE
        + city_component(origin)
        + city_component(destination)
        + carrier_surcharge(carrier)
        + time_surcharge(time)
}

fn lookup(table: &[(&str, u32)], key: &str) -> u32 {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map_or(0, |(_, surcharge)| *surcharge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn test_stable_hash_known_values() {
        assert_eq!(stable_hash(""), 0);
        assert_eq!(stable_hash("Goa"), 71_769);
        assert_eq!(stable_hash("Delhi"), 65_915_436);
        assert_eq!(stable_hash("Mumbai"), -1_979_126_203);
    }

    #[test]
    fn test_city_component_takes_magnitude() {
        assert_eq!(city_component("Mumbai"), 203);
        assert_eq!(city_component("Delhi"), 436);
        assert_eq!(city_component("Thiruvananthapuram"), 40);
    }

    #[test]
    fn test_surcharges() {
        assert_eq!(carrier_surcharge("Vistara"), 220);
        assert_eq!(carrier_surcharge("Unknown Air"), 0);
        assert_eq!(time_surcharge("18:00"), 180);
        assert_eq!(time_surcharge("03:00"), 0);
    }

    #[test]
    fn test_price_scenario() {
        assert_eq!(price("Mumbai", "Delhi", "Indigo", "09:00"), 1959);
    }

    #[test]
    fn test_price_unknown_inputs_fall_back_to_base_and_route() {
        assert_eq!(price("", "", "nobody", "never"), BASE_FARE);
    }

    #[test]
    fn test_price_is_deterministic() {
        for origin in catalog::CITIES {
            for destination in catalog::destinations_from(origin) {
                let first = price(origin, destination, "GoAir", "12:00");
                let second = price(origin, destination, "GoAir", "12:00");
                assert_eq!(first, second);
            }
        }
    }

    #[test]
    fn test_price_bounds_over_catalog() {
        for origin in catalog::CITIES {
            for destination in catalog::destinations_from(origin) {
                for carrier in catalog::CARRIERS {
                    for time in catalog::TIMES {
                        let fare = price(origin, destination, carrier, time);
                        assert!(fare >= BASE_FARE + 150 + 100);
                        assert!(fare < BASE_FARE + 2 * ROUTE_MODULUS + 220 + 180);
                    }
                }
            }
        }
    }

    #[test]
    fn test_non_ascii_hash_uses_utf16_units() {
        // U+20B9 is a single UTF-16 unit, so the hash equals its code point.
        assert_eq!(stable_hash("\u{20b9}"), 0x20b9);
    }
}
