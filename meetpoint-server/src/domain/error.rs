//! Domain error types.
//!
//! These errors represent request validation failures in the domain layer.
//! They are distinct from provider/IO errors.

use super::{InvalidFactorId, InvalidLocation};

/// A malformed or out-of-range meeting request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Fewer than 2 or more than 5 locations
    #[error("2 to 5 locations must be provided, got {0}")]
    LocationCount(usize),

    /// More factors than there are factor ids
    #[error("up to 6 factors can be provided, got {0}")]
    FactorCount(usize),

    /// A location failed coordinate validation
    #[error("location {index}: {source}")]
    Location {
        index: usize,
        #[source]
        source: InvalidLocation,
    },

    /// A factor id outside the known set
    #[error(transparent)]
    Factor(#[from] InvalidFactorId),

    /// The same factor was requested twice
    #[error("factor {0} requested more than once")]
    DuplicateFactor(u8),

    /// A weight that is negative or not finite
    #[error("weight for factor {factor} must be finite and non-negative, got {weight}")]
    Weight { factor: u8, weight: f64 },
}
