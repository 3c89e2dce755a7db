//! Transverse Mercator projection.
//!
//! Geographic coordinates cannot be averaged linearly without distortion, so
//! points are projected onto a planar grid first. The forward and inverse
//! series are Snyder's (USGS Professional Paper 1395, §8), accurate to well
//! below a millimetre within a few degrees of the central meridian.

use crate::domain::Location;

/// A point on the projected grid, in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

/// Reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis in metres.
    pub semi_major: f64,
    /// Inverse flattening.
    pub inverse_flattening: f64,
}

impl Ellipsoid {
    pub const GRS80: Ellipsoid = Ellipsoid {
        semi_major: 6_378_137.0,
        inverse_flattening: 298.257_222_101,
    };

    /// First eccentricity squared.
    fn e2(&self) -> f64 {
        let f = 1.0 / self.inverse_flattening;
        f * (2.0 - f)
    }
}

/// Parameters and precomputed constants of a Transverse Mercator grid.
#[derive(Debug, Clone, PartialEq)]
pub struct TransverseMercator {
    a: f64,
    e2: f64,
    ep2: f64,
    lon0: f64,
    k0: f64,
    false_easting: f64,
    false_northing: f64,
    m0: f64,
}

impl TransverseMercator {
    /// Create a projection. Origin angles are in degrees.
    pub fn new(
        ellipsoid: Ellipsoid,
        origin_latitude: f64,
        central_meridian: f64,
        scale: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let a = ellipsoid.semi_major;
        let e2 = ellipsoid.e2();
        let lat0 = origin_latitude.to_radians();

        let mut tm = Self {
            a,
            e2,
            ep2: e2 / (1.0 - e2),
            lon0: central_meridian.to_radians(),
            k0: scale,
            false_easting,
            false_northing,
            m0: 0.0,
        };
        tm.m0 = tm.meridian_arc(lat0);
        tm
    }

    /// Korean Central Belt grid (GRS80, origin 38°N 127°E, FE 200 km,
    /// FN 500 km), the planar system of the place-search provider.
    pub fn korea_central_belt() -> Self {
        Self::new(Ellipsoid::GRS80, 38.0, 127.0, 1.0, 200_000.0, 500_000.0)
    }

    /// Project a geographic location onto the grid.
    pub fn forward(&self, location: Location) -> PlanarPoint {
        let phi = location.latitude().to_radians();
        let lambda = location.longitude().to_radians();

        let (sin_phi, cos_phi) = phi.sin_cos();
        let tan_phi = phi.tan();

        let n = self.a / (1.0 - self.e2 * sin_phi * sin_phi).sqrt();
        let t = tan_phi * tan_phi;
        let c = self.ep2 * cos_phi * cos_phi;
        let a = (lambda - self.lon0) * cos_phi;
        let m = self.meridian_arc(phi);

        let a2 = a * a;
        let a3 = a2 * a;
        let a4 = a3 * a;
        let a5 = a4 * a;
        let a6 = a5 * a;

        let x = self.k0
            * n
            * (a + (1.0 - t + c) * a3 / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * self.ep2) * a5 / 120.0);

        let y = self.k0
            * (m - self.m0
                + n * tan_phi
                    * (a2 / 2.0
                        + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                        + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * self.ep2) * a6 / 720.0));

        PlanarPoint {
            x: x + self.false_easting,
            y: y + self.false_northing,
        }
    }

    /// Convert a grid point back to longitude/latitude degrees.
    ///
    /// Returns raw degrees rather than a [`Location`]: grid points far
    /// outside the projection's zone can map outside geographic ranges.
    pub fn inverse(&self, point: PlanarPoint) -> (f64, f64) {
        let x = point.x - self.false_easting;
        let y = point.y - self.false_northing;

        let e2 = self.e2;
        let e4 = e2 * e2;
        let e6 = e4 * e2;

        let m = self.m0 + y / self.k0;
        let mu = m / (self.a * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));

        let sqrt_1_e2 = (1.0 - e2).sqrt();
        let e1 = (1.0 - sqrt_1_e2) / (1.0 + sqrt_1_e2);
        let e1_2 = e1 * e1;
        let e1_3 = e1_2 * e1;
        let e1_4 = e1_3 * e1;

        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1_3 / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1_2 / 16.0 - 55.0 * e1_4 / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1_3 / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1_4 / 512.0) * (8.0 * mu).sin();

        let (sin_phi1, cos_phi1) = phi1.sin_cos();
        let tan_phi1 = phi1.tan();

        let c1 = self.ep2 * cos_phi1 * cos_phi1;
        let t1 = tan_phi1 * tan_phi1;
        let w = 1.0 - e2 * sin_phi1 * sin_phi1;
        let n1 = self.a / w.sqrt();
        let r1 = self.a * (1.0 - e2) / w.powf(1.5);
        let d = x / (n1 * self.k0);

        let d2 = d * d;
        let d3 = d2 * d;
        let d4 = d3 * d;
        let d5 = d4 * d;
        let d6 = d5 * d;

        let phi = phi1
            - (n1 * tan_phi1 / r1)
                * (d2 / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * self.ep2) * d4 / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                        - 252.0 * self.ep2
                        - 3.0 * c1 * c1)
                        * d6
                        / 720.0);

        let lambda = self.lon0
            + (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * self.ep2 + 24.0 * t1 * t1)
                    * d5
                    / 120.0)
                / cos_phi1;

        (lambda.to_degrees(), phi.to_degrees())
    }

    /// Meridian arc length from the equator to latitude `phi` (radians).
    fn meridian_arc(&self, phi: f64) -> f64 {
        let e2 = self.e2;
        let e4 = e2 * e2;
        let e6 = e4 * e2;

        self.a
            * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
                - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
                + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
                - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
    }
}

impl Default for TransverseMercator {
    fn default() -> Self {
        Self::korea_central_belt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(lon: f64, lat: f64) -> Location {
        Location::new(lon, lat).unwrap()
    }

    #[test]
    fn origin_maps_to_false_origin() {
        let tm = TransverseMercator::korea_central_belt();
        let p = tm.forward(loc(127.0, 38.0));

        assert!((p.x - 200_000.0).abs() < 1e-6);
        assert!((p.y - 500_000.0).abs() < 1e-6);
    }

    #[test]
    fn seoul_city_hall_grid_position() {
        // City Hall lies roughly 2 km west and 48 km south of the grid origin.
        let tm = TransverseMercator::korea_central_belt();
        let p = tm.forward(loc(126.9780, 37.5665));

        assert!((p.x - 198_056.4).abs() < 1.0, "x = {}", p.x);
        assert!((p.y - 451_885.0).abs() < 1.0, "y = {}", p.y);
    }

    #[test]
    fn east_is_positive_x_north_is_positive_y() {
        let tm = TransverseMercator::default();
        let centre = tm.forward(loc(127.0, 37.5));
        let east = tm.forward(loc(127.1, 37.5));
        let north = tm.forward(loc(127.0, 37.6));

        assert!(east.x > centre.x);
        assert!(north.y > centre.y);
    }

    #[test]
    fn round_trip_bessel_grid() {
        let bessel = Ellipsoid {
            semi_major: 6_377_397.155,
            inverse_flattening: 299.152_812_8,
        };
        let tm = TransverseMercator::new(bessel, 38.0, 127.0, 1.0, 200_000.0, 500_000.0);
        let original = loc(127.0276, 37.4979);
        let (lon, lat) = tm.inverse(tm.forward(original));

        assert!((lon - original.longitude()).abs() < 1e-9);
        assert!((lat - original.latitude()).abs() < 1e-9);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Points across the Seoul metropolitan area survive a round trip.
        #[test]
        fn inverse_undoes_forward(lon in 126.5f64..127.5, lat in 37.0f64..38.0) {
            let tm = TransverseMercator::korea_central_belt();
            let original = Location::new(lon, lat).unwrap();
            let (back_lon, back_lat) = tm.inverse(tm.forward(original));

            prop_assert!((back_lon - lon).abs() < 1e-6, "lon {} -> {}", lon, back_lon);
            prop_assert!((back_lat - lat).abs() < 1e-6, "lat {} -> {}", lat, back_lat);
        }
    }
}
