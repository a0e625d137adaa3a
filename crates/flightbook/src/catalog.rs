//! Fixed selection catalogs.
//!
//! Origin, destination, carrier, date and time are always chosen from these
//! lists by the front end. The core does not require membership; pricing
//! simply adds no surcharge for values it does not know.

/// Cities served, in display order.
pub const CITIES: [&str; 20] = [
    "Mumbai",
    "Delhi",
    "Bangalore",
    "Hyderabad",
    "Chennai",
    "Kolkata",
    "Pune",
    "Ahmedabad",
    "Jaipur",
    "Lucknow",
    "Bhubaneswar",
    "Goa",
    "Coimbatore",
    "Chandigarh",
    "Nagpur",
    "Thiruvananthapuram",
    "Patna",
    "Amritsar",
    "Indore",
    "Guwahati",
];

/// Carriers, in display order.
pub const CARRIERS: [&str; 5] = ["Indigo", "Air India", "SpiceJet", "Vistara", "GoAir"];

/// Departure dates. No calendar arithmetic is ever done on these.
pub const DATES: [&str; 6] = [
    "2025-10-16",
    "2025-10-17",
    "2025-10-18",
    "2025-10-19",
    "2025-10-20",
    "2025-10-21",
];

/// Departure time slots.
pub const TIMES: [&str; 6] = ["06:00", "09:00", "12:00", "15:00", "18:00", "21:00"];

/// Check whether `city` is in [`CITIES`].
#[must_use]
pub fn is_city(city: &str) -> bool {
    CITIES.contains(&city)
}

/// Check whether `carrier` is in [`CARRIERS`].
#[must_use]
pub fn is_carrier(carrier: &str) -> bool {
    CARRIERS.contains(&carrier)
}

/// Check whether `date` is in [`DATES`].
#[must_use]
pub fn is_date(date: &str) -> bool {
    DATES.contains(&date)
}

/// Check whether `time` is in [`TIMES`].
#[must_use]
pub fn is_time(time: &str) -> bool {
    TIMES.contains(&time)
}

/// Every city except `origin`, in catalog order.
pub fn destinations_from(origin: &str) -> impl Iterator<Item = &'static str> + '_ {
    CITIES.iter().copied().filter(move |city| *city != origin)
}
