//! Regional adjustment of input locations.
//!
//! Discovery and routing providers only return useful data inside one
//! metropolitan area. Every location is checked against the service region
//! and, if outside, moved to the nearest in-region anchor. One location that
//! cannot be placed fails the whole request.

use std::future::Future;
use std::str::FromStr;

use futures::{StreamExt, TryStreamExt, stream};
use tracing::{debug, info};

use crate::domain::{AdjustedLocation, Location};

use super::error::FindError;

/// Administrative region containing a point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Top-level division (e.g. 서울특별시).
    pub province: String,

    /// Second-level division (e.g. 강남구).
    pub district: String,
}

/// Which administrative level the service region is defined at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionLevel {
    Province,
    District,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown region level {0:?}, expected \"province\" or \"district\"")]
pub struct UnknownRegionLevel(pub String);

impl FromStr for RegionLevel {
    type Err = UnknownRegionLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "province" => Ok(RegionLevel::Province),
            "district" => Ok(RegionLevel::District),
            _ => Err(UnknownRegionLevel(s.to_string())),
        }
    }
}

/// Boundary predicate for the serviceable region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRegion {
    level: RegionLevel,
    accepted: Vec<String>,
}

impl ServiceRegion {
    /// A region accepting any of `names` at `level`.
    pub fn new<I, S>(level: RegionLevel, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            level,
            accepted: names
                .into_iter()
                .map(|n| {
                    let n: String = n.into();
                    n.trim().to_string()
                })
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }

    /// Whether a region lies inside the service region.
    pub fn contains(&self, region: &Region) -> bool {
        let name = match self.level {
            RegionLevel::Province => &region.province,
            RegionLevel::District => &region.district,
        };
        self.accepted.iter().any(|accepted| accepted == name.trim())
    }

    pub fn level(&self) -> RegionLevel {
        self.level
    }

    pub fn accepted(&self) -> &[String] {
        &self.accepted
    }
}

impl Default for ServiceRegion {
    fn default() -> Self {
        Self::new(RegionLevel::Province, ["서울특별시"])
    }
}

/// Region membership and in-region anchor search.
pub trait RegionProvider: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// The region containing `location`, if the provider knows one.
    fn region_at(
        &self,
        location: Location,
    ) -> impl Future<Output = Result<Option<Region>, Self::Error>> + Send;

    /// The nearest point within `radius_m` of `location` that lies inside
    /// `boundary`.
    fn nearest_in_region(
        &self,
        location: Location,
        radius_m: u32,
        boundary: &ServiceRegion,
    ) -> impl Future<Output = Result<Option<Location>, Self::Error>> + Send;
}

/// Place every location inside `boundary`, concurrently.
///
/// Output order matches input order. Fails with
/// [`FindError::RegionAdjustment`] for the first location (in input
/// order) that cannot be placed.
pub async fn adjust_locations<R: RegionProvider>(
    provider: &R,
    boundary: &ServiceRegion,
    locations: &[Location],
    radius_m: u32,
    concurrency: usize,
) -> Result<Vec<AdjustedLocation>, FindError> {
    stream::iter(locations.iter().copied().enumerate())
        .map(|(index, location)| adjust_one(provider, boundary, index, location, radius_m))
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}

async fn adjust_one<R: RegionProvider>(
    provider: &R,
    boundary: &ServiceRegion,
    index: usize,
    location: Location,
    radius_m: u32,
) -> Result<AdjustedLocation, FindError> {
    let failure = |reason: String| FindError::RegionAdjustment {
        index,
        location,
        reason,
    };

    let region = provider
        .region_at(location)
        .await
        .map_err(|e| failure(format!("region lookup failed: {e}")))?;

    if region.as_ref().is_some_and(|r| boundary.contains(r)) {
        return Ok(AdjustedLocation::unchanged(location));
    }

    debug!(
        index,
        location = %location,
        region = ?region,
        "location outside service region, searching for anchor"
    );

    let anchor = provider
        .nearest_in_region(location, radius_m, boundary)
        .await
        .map_err(|e| failure(format!("anchor search failed: {e}")))?
        .ok_or_else(|| failure(format!("no in-region anchor within {radius_m} m")))?;

    info!(index, from = %location, to = %anchor, "relocated location into service region");
    Ok(AdjustedLocation::relocated(location, anchor))
}
