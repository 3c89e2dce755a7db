//! Concurrent transit-time estimation.
//!
//! Every (user, station) pair needs one routing lookup. Lookups fan out at
//! two levels, per station and per user within a station, each bounded. A
//! pair that cannot be routed gets the configured fallback duration, so a
//! slow or failing provider only shifts scores and never aborts the search.

use std::future::Future;

use futures::{StreamExt, stream};
use tracing::{debug, warn};

use crate::domain::{CandidateStation, Location};

use super::config::FinderConfig;
use super::error::RoutingError;
use super::keys::KeyPool;
use super::retry::{Outcome, call_with_fallback};

/// One public-transport itinerary returned by the routing provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteOption {
    /// Door-to-door duration in minutes.
    pub total_minutes: u32,
}

/// Public-transport routing between two points.
pub trait RoutingProvider: Send + Sync {
    /// Candidate itineraries from `from` to `to`, authenticated with
    /// `api_key`.
    fn route(
        &self,
        from: Location,
        to: Location,
        api_key: &str,
    ) -> impl Future<Output = Result<Vec<RouteOption>, RoutingError>> + Send;
}

/// Travel time for one pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitDuration {
    /// Shortest itinerary the provider returned.
    Measured(u32),

    /// The fallback sentinel, substituted after failure.
    Fallback(u32),
}

impl TransitDuration {
    pub fn minutes(&self) -> u32 {
        match self {
            TransitDuration::Measured(m) | TransitDuration::Fallback(m) => *m,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, TransitDuration::Fallback(_))
    }
}

/// Estimated travel time from one user to one station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitEstimate {
    /// Index into the user locations.
    pub user: usize,

    /// Index into the candidate stations.
    pub station: usize,

    pub duration: TransitDuration,
}

/// All users' estimates for one station, reduced to a total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationTransit {
    /// Index into the candidate stations.
    pub station: usize,

    /// One estimate per user, ordered by user index.
    pub estimates: Vec<TransitEstimate>,

    /// Sum of the per-user minutes.
    pub aggregate_minutes: u32,
}

impl StationTransit {
    /// Number of users whose time is the fallback sentinel.
    pub fn fallback_count(&self) -> usize {
        self.estimates
            .iter()
            .filter(|e| e.duration.is_fallback())
            .count()
    }
}

/// Computes transit times for every (user, station) pair.
pub struct TransitEstimator<'a, T: RoutingProvider> {
    provider: &'a T,
    keys: &'a KeyPool,
    config: &'a FinderConfig,
}

impl<'a, T: RoutingProvider> TransitEstimator<'a, T> {
    pub fn new(provider: &'a T, keys: &'a KeyPool, config: &'a FinderConfig) -> Self {
        Self {
            provider,
            keys,
            config,
        }
    }

    /// Estimate every pair. Results are ordered by station index.
    pub async fn estimate_all(
        &self,
        users: &[Location],
        stations: &[CandidateStation],
    ) -> Vec<StationTransit> {
        let mut results: Vec<StationTransit> = stream::iter(0..stations.len())
            .map(|index| self.estimate_station(index, &stations[index], users))
            .buffer_unordered(self.config.station_concurrency.max(1))
            .collect()
            .await;

        results.sort_by_key(|r| r.station);

        let fallbacks: usize = results.iter().map(StationTransit::fallback_count).sum();
        if fallbacks > 0 {
            warn!(
                fallbacks,
                pairs = users.len() * stations.len(),
                "transit lookups degraded to fallback duration"
            );
        }

        results
    }

    /// Estimate all users' times to one station and sum them.
    pub async fn estimate_station(
        &self,
        index: usize,
        station: &CandidateStation,
        users: &[Location],
    ) -> StationTransit {
        let mut estimates: Vec<TransitEstimate> = stream::iter(users.iter().copied().enumerate())
            .map(|(user, from)| self.estimate_pair(user, from, index, station))
            .buffer_unordered(self.config.pair_concurrency.max(1))
            .collect()
            .await;

        estimates.sort_by_key(|e| e.user);

        let aggregate_minutes = estimates
            .iter()
            .fold(0u32, |sum, e| sum.saturating_add(e.duration.minutes()));

        debug!(
            station = %station.name,
            aggregate_minutes,
            "station transit estimated"
        );

        StationTransit {
            station: index,
            estimates,
            aggregate_minutes,
        }
    }

    async fn estimate_pair(
        &self,
        user: usize,
        from: Location,
        station_index: usize,
        station: &CandidateStation,
    ) -> TransitEstimate {
        let provider = self.provider;
        let to = station.location;

        let outcome = call_with_fallback(
            &self.config.retry,
            self.keys,
            self.config.fallback_minutes,
            |key| async move {
                match provider.route(from, to, key).await {
                    Ok(options) => options
                        .iter()
                        .map(|o| o.total_minutes)
                        .min()
                        .ok_or(RoutingError::NoRoute),
                    // Within walking distance of the station.
                    Err(RoutingError::TooClose) => Ok(0),
                    Err(e) => Err(e),
                }
            },
        )
        .await;

        let duration = match outcome {
            Outcome::Success { value, .. } => TransitDuration::Measured(value),
            Outcome::Fallback {
                value,
                attempts,
                error,
            } => {
                debug!(
                    user,
                    station = %station.name,
                    attempts,
                    error = %error,
                    "using fallback transit duration"
                );
                TransitDuration::Fallback(value)
            }
        };

        TransitEstimate {
            user,
            station: station_index,
            duration,
        }
    }
}
