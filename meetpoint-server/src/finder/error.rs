//! Finder error types.

use std::time::Duration;

use crate::domain::Location;

/// Failure of a single routing lookup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RoutingError {
    /// Network failure talking to the provider
    #[error("transport error: {0}")]
    Transport(String),

    /// Provider reported an error for this request or key
    #[error("provider error {code}: {message}")]
    Provider { code: String, message: String },

    /// Rate limited on the current key
    #[error("rate limited by routing provider")]
    RateLimited,

    /// The call exceeded the configured timeout
    #[error("routing call timed out after {0:?}")]
    Timeout(Duration),

    /// The provider found no route between the points
    #[error("no route found")]
    NoRoute,

    /// Origin and destination are too close for the provider to route
    #[error("origin and destination are within walking distance")]
    TooClose,

    /// Response body could not be understood
    #[error("malformed routing response: {0}")]
    Malformed(String),
}

impl RoutingError {
    /// Whether retrying, possibly with another key, can help.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RoutingError::Transport(_)
                | RoutingError::Provider { .. }
                | RoutingError::RateLimited
                | RoutingError::Timeout(_)
        )
    }
}

/// Error that aborts a meeting-point search.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FindError {
    /// A location could not be placed inside the service region
    #[error("location {index} {location} cannot be placed inside the service region: {reason}")]
    RegionAdjustment {
        index: usize,
        location: Location,
        reason: String,
    },

    /// The place-search provider failed
    #[error("station search failed: {0}")]
    Discovery(String),

    /// The midpoint fell outside geographic ranges
    #[error("midpoint of the adjusted locations could not be computed")]
    Midpoint,
}
