//! Caching layer for routing responses.
//!
//! Users and candidate stations repeat across requests (popular stations,
//! the same group searching again with different factors), so routing
//! results are cached by quantised endpoints. Only successful, non-empty
//! responses are cached; failures are retried with other keys instead.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::Location;
use crate::finder::{RouteOption, RoutingError, RoutingProvider};

/// Coordinates are quantised to 1e-5 degrees (about a metre).
const QUANTUM: f64 = 1e5;

/// Cache key: quantised (origin, destination) in (lon, lat) order.
type RouteKey = ((i64, i64), (i64, i64));

/// Cached route options.
type RouteEntry = Arc<Vec<RouteOption>>;

/// Configuration for the route cache.
#[derive(Debug, Clone)]
pub struct RouteCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for RouteCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10 * 60),
            max_capacity: 10_000,
        }
    }
}

fn quantise(location: Location) -> (i64, i64) {
    (
        (location.longitude() * QUANTUM).round() as i64,
        (location.latitude() * QUANTUM).round() as i64,
    )
}

fn route_key(from: Location, to: Location) -> RouteKey {
    (quantise(from), quantise(to))
}

/// Routing provider with caching.
///
/// Wraps any [`RoutingProvider`]. The API key is not part of the cache key:
/// a route is the same whichever key fetched it.
pub struct CachedRoutingClient<T> {
    inner: T,
    routes: MokaCache<RouteKey, RouteEntry>,
}

impl<T: RoutingProvider> CachedRoutingClient<T> {
    /// Create a new cached client.
    pub fn new(inner: T, config: &RouteCacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, routes }
    }
}

impl<T: RoutingProvider> RoutingProvider for CachedRoutingClient<T> {
    async fn route(
        &self,
        from: Location,
        to: Location,
        api_key: &str,
    ) -> Result<Vec<RouteOption>, RoutingError> {
        let key = route_key(from, to);

        if let Some(cached) = self.routes.get(&key).await {
            trace!(from = %from, to = %to, "route cache hit");
            return Ok(cached.as_ref().clone());
        }

        let options = self.inner.route(from, to, api_key).await?;

        if !options.is_empty() {
            self.routes.insert(key, Arc::new(options.clone())).await;
        }

        Ok(options)
    }
}
