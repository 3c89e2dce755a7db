//! Planar midpoint of a group of locations.

use crate::domain::Location;

use super::projection::{PlanarPoint, TransverseMercator};

/// Average `locations` on the projected grid and convert the mean back.
///
/// Returns `None` for an empty slice, or if the mean falls outside
/// geographic ranges (only possible for inputs far outside the grid's zone).
pub fn midpoint(projection: &TransverseMercator, locations: &[Location]) -> Option<Location> {
    if locations.is_empty() {
        return None;
    }

    let n = locations.len() as f64;
    let (sum_x, sum_y) = locations
        .iter()
        .map(|&loc| projection.forward(loc))
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));

    let mean = PlanarPoint {
        x: sum_x / n,
        y: sum_y / n,
    };

    let (lon, lat) = projection.inverse(mean);
    Location::new(lon, lat).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(lon: f64, lat: f64) -> Location {
        Location::new(lon, lat).unwrap()
    }

    #[test]
    fn empty_input_has_no_midpoint() {
        assert!(midpoint(&TransverseMercator::default(), &[]).is_none());
    }

    #[test]
    fn single_point_is_its_own_midpoint() {
        let p = loc(127.0276, 37.4979);
        let m = midpoint(&TransverseMercator::default(), &[p]).unwrap();

        assert!((m.longitude() - p.longitude()).abs() < 1e-9);
        assert!((m.latitude() - p.latitude()).abs() < 1e-9);
    }

    #[test]
    fn two_points_meet_near_the_geographic_middle() {
        let a = loc(126.9780, 37.5665);
        let b = loc(127.0276, 37.4979);
        let m = midpoint(&TransverseMercator::default(), &[a, b]).unwrap();

        // Over a few kilometres the planar mean is within metres of the
        // naive degree average.
        assert!((m.longitude() - 127.0028).abs() < 1e-4);
        assert!((m.latitude() - 37.5322).abs() < 1e-4);
    }
}
