//! Meeting-point station finder.
//!
//! Given a group's locations and amenity preferences, the finder answers:
//! "which nearby transit stations are the best place to meet?"
//!
//! Locations are first pulled inside the service region, then averaged on a
//! planar grid. Stations around that midpoint are scored by total travel
//! time relative to their weighted amenity appeal. Provider calls fan out
//! concurrently with bounded parallelism; routing failures degrade to a
//! fallback duration instead of failing the request.

mod config;
mod discovery;
mod error;
mod keys;
mod pipeline;
mod rank;
mod region;
mod retry;
mod transit;


pub use config::{FinderConfig, RetryPolicy};
pub use discovery::{PlaceHit, PlaceSearch, dedupe_stations, discover_stations};
pub use error::{FindError, RoutingError};
pub use keys::{KeyPool, KeyPoolError, KeyRotation};
pub use pipeline::{FindOutcome, Finder};
pub use rank::{AppliedFactor, ScoredStation, ScoringInput, final_score, rank_stations};
pub use region::{
    Region, RegionLevel, RegionProvider, ServiceRegion, UnknownRegionLevel, adjust_locations,
};
pub use retry::{Outcome, call_with_fallback};
pub use transit::{
    RouteOption, RoutingProvider, StationTransit, TransitDuration, TransitEstimate,
    TransitEstimator,
};
