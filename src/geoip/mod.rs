mod reader;

pub use reader::GeoResolver;

use std::fmt;
use std::net::IpAddr;

/// Shown whenever a peer's location cannot be determined
pub const SENTINEL_LOCATION: &str = "??:unknown";

const UNKNOWN_COUNTRY: &str = "??";
const UNKNOWN_CITY: &str = "unknown";

/// Approximate location of an IP address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// ISO 3166-1 alpha-2 country code
    pub country: String,
    /// English city name
    pub city: String,
}

impl Location {
    pub fn new(country: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            city: city.into(),
        }
    }

    /// Build a location from the optional parts of a database record.
    /// A record carrying neither part counts as a miss.
    pub fn from_parts(country: Option<&str>, city: Option<&str>) -> Option<Self> {
        let country = country.filter(|c| !c.is_empty());
        let city = city.filter(|c| !c.is_empty());

        if country.is_none() && city.is_none() {
            return None;
        }

        Some(Self::new(
            country.unwrap_or(UNKNOWN_COUNTRY),
            city.unwrap_or(UNKNOWN_CITY),
        ))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.country, self.city)
    }
}

/// Maps an IP address to a location.
///
/// `None` means the address is not in the database; it is never a fault.
pub trait Resolver: Send + Sync {
    fn resolve(&self, ip: IpAddr) -> Option<Location>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        let location = Location::new("US", "Mountain View");
        assert_eq!(location.to_string(), "US:Mountain View");
    }

    #[test]
    fn test_from_parts_fills_missing_half() {
        assert_eq!(
            Location::from_parts(Some("DE"), None).unwrap().to_string(),
            "DE:unknown"
        );
        assert_eq!(
            Location::from_parts(None, Some("Paris")).unwrap().to_string(),
            "??:Paris"
        );
    }

    #[test]
    fn test_from_parts_empty_record_is_miss() {
        assert_eq!(Location::from_parts(None, None), None);
        assert_eq!(Location::from_parts(Some(""), Some("")), None);
    }
}
