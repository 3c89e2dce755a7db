//! Coordinate transforms and midpoint computation.
//!
//! Locations are averaged on a planar Transverse Mercator grid rather than
//! in raw degrees, then converted back to longitude/latitude.

mod midpoint;
mod projection;

pub use midpoint::midpoint;
pub use projection::{Ellipsoid, PlanarPoint, TransverseMercator};
