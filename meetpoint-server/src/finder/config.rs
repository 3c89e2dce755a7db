//! Finder configuration.

use std::time::Duration;

use crate::geo::TransverseMercator;

use super::region::ServiceRegion;

/// Retry behaviour for a single (user, station) routing lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Attempts per pair. `None` means one attempt per pooled key.
    pub max_attempts: Option<usize>,

    /// Delay between attempts.
    pub backoff: Duration,

    /// Upper bound on a single provider call. `None` disables the timeout.
    pub call_timeout: Option<Duration>,
}

impl RetryPolicy {
    /// Attempts to make given the size of the key pool. Always at least 1.
    pub fn attempts_for(&self, pool_size: usize) -> usize {
        self.max_attempts.unwrap_or(pool_size).max(1)
    }

    /// Set a fixed attempt count.
    pub fn with_max_attempts(mut self, n: usize) -> Self {
        self.max_attempts = Some(n);
        self
    }

    /// Set the delay between attempts.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Set the per-call timeout.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: None,
            backoff: Duration::from_millis(100),
            call_timeout: Some(Duration::from_secs(10)),
        }
    }
}

/// Configuration parameters for a meeting-point search.
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// Region every location must lie in.
    pub service_region: ServiceRegion,

    /// Planar grid used for midpoint averaging.
    pub projection: TransverseMercator,

    /// Station search radius around the midpoint (metres).
    pub search_radius_m: u32,

    /// How far to look for an in-region anchor when a location lies
    /// outside the region (metres).
    pub adjustment_radius_m: u32,

    /// Maximum number of ranked stations to return.
    pub max_results: usize,

    /// Duration substituted when a pair's transit time cannot be obtained
    /// (minutes).
    pub fallback_minutes: u32,

    /// Concurrent per-location region adjustments.
    pub location_concurrency: usize,

    /// Concurrent per-station transit orchestrations.
    pub station_concurrency: usize,

    /// Concurrent (user, station) lookups within one station.
    pub pair_concurrency: usize,

    pub retry: RetryPolicy,
}

impl FinderConfig {
    /// Set the serviceable region.
    pub fn with_service_region(mut self, region: ServiceRegion) -> Self {
        self.service_region = region;
        self
    }

    /// Set the fallback duration in minutes.
    pub fn with_fallback_minutes(mut self, minutes: u32) -> Self {
        self.fallback_minutes = minutes;
        self
    }

    /// Set the number of results returned.
    pub fn with_max_results(mut self, n: usize) -> Self {
        self.max_results = n;
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set all three concurrency limits.
    pub fn with_concurrency(mut self, locations: usize, stations: usize, pairs: usize) -> Self {
        self.location_concurrency = locations;
        self.station_concurrency = stations;
        self.pair_concurrency = pairs;
        self
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            service_region: ServiceRegion::default(),
            projection: TransverseMercator::default(),
            search_radius_m: 20_000,
            adjustment_radius_m: 20_000,
            max_results: 3,
            fallback_minutes: 120,
            location_concurrency: 5,
            station_concurrency: 4,
            pair_concurrency: 5,
            retry: RetryPolicy::default(),
        }
    }
}
