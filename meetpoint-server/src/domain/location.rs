//! Geographic location types.

use std::fmt;

/// Error returned when constructing a location from invalid coordinates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid location ({longitude}, {latitude}): {reason}")]
pub struct InvalidLocation {
    longitude: f64,
    latitude: f64,
    reason: &'static str,
}

/// A WGS84 point given as longitude and latitude in degrees.
///
/// Both components are finite and within their geographic ranges. This type
/// guarantees that by construction.
///
/// # Examples
///
/// ```
/// use meetpoint_server::domain::Location;
///
/// let city_hall = Location::new(126.9780, 37.5665).unwrap();
/// assert_eq!(city_hall.longitude(), 126.9780);
///
/// // Latitude out of range is rejected
/// assert!(Location::new(126.9780, 137.5665).is_err());
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct Location {
    longitude: f64,
    latitude: f64,
}

impl Location {
    /// Create a location, rejecting non-finite or out-of-range coordinates.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, InvalidLocation> {
        let invalid = |reason| InvalidLocation {
            longitude,
            latitude,
            reason,
        };

        if !longitude.is_finite() || !latitude.is_finite() {
            return Err(invalid("coordinates must be finite"));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid("longitude must be within -180..=180"));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(invalid("latitude must be within -90..=90"));
        }

        Ok(Self {
            longitude,
            latitude,
        })
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Location({}, {})", self.longitude, self.latitude)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.longitude, self.latitude)
    }
}

/// A location confirmed to lie inside the serviceable region.
///
/// Only the regional adjustment step produces these, either by confirming
/// the input location or by relocating it to an in-region anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustedLocation {
    /// The location the user supplied.
    pub original: Location,

    /// The location used for every downstream computation.
    pub location: Location,
}

impl AdjustedLocation {
    /// The input was already in the region.
    pub fn unchanged(location: Location) -> Self {
        Self {
            original: location,
            location,
        }
    }

    /// The input was moved to an in-region anchor.
    pub fn relocated(original: Location, anchor: Location) -> Self {
        Self {
            original,
            location: anchor,
        }
    }

    /// Whether the location had to be moved.
    pub fn was_relocated(&self) -> bool {
        self.original != self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_coordinates() {
        assert!(Location::new(127.0276, 37.4979).is_ok());
        assert!(Location::new(-180.0, -90.0).is_ok());
        assert!(Location::new(180.0, 90.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Location::new(180.5, 37.0).is_err());
        assert!(Location::new(127.0, -90.5).is_err());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(Location::new(f64::NAN, 37.0).is_err());
        assert!(Location::new(127.0, f64::INFINITY).is_err());
    }

    #[test]
    fn error_display_names_the_coordinates() {
        let err = Location::new(200.0, 37.5).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid location (200, 37.5): longitude must be within -180..=180"
        );
    }

    #[test]
    fn adjusted_location_tracks_relocation() {
        let a = Location::new(127.0, 37.5).unwrap();
        let b = Location::new(127.1, 37.6).unwrap();

        assert!(!AdjustedLocation::unchanged(a).was_relocated());
        assert!(AdjustedLocation::relocated(a, b).was_relocated());
        assert_eq!(AdjustedLocation::relocated(a, b).location, b);
    }
}
