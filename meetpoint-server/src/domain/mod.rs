//! Domain types for the meeting-point finder.
//!
//! This module contains the core domain model types: validated locations,
//! factor ids and weights, and station identity. All types enforce their
//! invariants at construction time, so code that receives these types can
//! trust their validity.

mod error;
mod factor;
mod location;
mod request;
mod station;

pub use error::ValidationError;
pub use factor::{FactorId, FactorWeights, InvalidFactorId, StationFactors};
pub use location::{AdjustedLocation, InvalidLocation, Location};
pub use request::{MAX_FACTORS, MAX_LOCATIONS, MIN_LOCATIONS, MeetingRequest};
pub use station::{CandidateStation, StationKey, leading_name};
