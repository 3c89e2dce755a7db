//! The meeting-point search pipeline.
//!
//! Stages run in order: regional adjustment, midpoint, station discovery,
//! factor resolution, transit estimation, ranking. Only the first three
//! can fail the request; later stages degrade instead.

use tracing::{debug, info};

use crate::domain::{CandidateStation, Location, MeetingRequest, StationFactors};
use crate::factors::FactorStore;
use crate::geo::midpoint;

use super::config::FinderConfig;
use super::discovery::{PlaceSearch, discover_stations};
use super::error::FindError;
use super::keys::KeyPool;
use super::rank::{ScoredStation, ScoringInput, rank_stations};
use super::region::{RegionProvider, adjust_locations};
use super::transit::{RoutingProvider, TransitEstimator};

/// Successful result of a search.
#[derive(Debug, Clone, PartialEq)]
pub enum FindOutcome {
    /// Best stations, best first. Never empty.
    Ranked(Vec<ScoredStation>),

    /// Discovery found no stations around the midpoint.
    NoStationsFound,

    /// Stations were found but none could be scored.
    NoRankedStations,
}

/// Meeting-point finder over a set of providers.
pub struct Finder<'a, R, P, T> {
    regions: &'a R,
    places: &'a P,
    routing: &'a T,
    factors: &'a FactorStore,
    keys: &'a KeyPool,
    config: &'a FinderConfig,
}

impl<'a, R, P, T> Finder<'a, R, P, T>
where
    R: RegionProvider,
    P: PlaceSearch,
    T: RoutingProvider,
{
    pub fn new(
        regions: &'a R,
        places: &'a P,
        routing: &'a T,
        factors: &'a FactorStore,
        keys: &'a KeyPool,
        config: &'a FinderConfig,
    ) -> Self {
        Self {
            regions,
            places,
            routing,
            factors,
            keys,
            config,
        }
    }

    /// Find the best meeting stations for a validated request.
    pub async fn find(&self, request: &MeetingRequest) -> Result<FindOutcome, FindError> {
        let adjusted = adjust_locations(
            self.regions,
            &self.config.service_region,
            request.locations(),
            self.config.adjustment_radius_m,
            self.config.location_concurrency,
        )
        .await?;

        let users: Vec<Location> = adjusted.iter().map(|a| a.location).collect();
        let center = midpoint(&self.config.projection, &users).ok_or(FindError::Midpoint)?;
        debug!(
            center = %center,
            users = users.len(),
            relocated = adjusted.iter().filter(|a| a.was_relocated()).count(),
            "computed midpoint"
        );

        let stations = discover_stations(self.places, center, self.config.search_radius_m)
            .await
            .map_err(|e| FindError::Discovery(e.to_string()))?;

        if stations.is_empty() {
            info!(center = %center, "no stations found near midpoint");
            return Ok(FindOutcome::NoStationsFound);
        }

        let (scorable, records) = self.resolve_factors(stations);
        if scorable.is_empty() {
            info!("no discovered station has factor data");
            return Ok(FindOutcome::NoRankedStations);
        }

        let transit = TransitEstimator::new(self.routing, self.keys, self.config)
            .estimate_all(&users, &scorable)
            .await;

        let inputs: Vec<ScoringInput> = scorable
            .into_iter()
            .zip(records)
            .zip(transit)
            .map(|((station, factors), t)| ScoringInput {
                station,
                factors,
                aggregate_minutes: t.aggregate_minutes,
            })
            .collect();

        let ranked = rank_stations(
            inputs,
            request.factors(),
            request.weights(),
            self.config.max_results,
        );

        if ranked.is_empty() {
            return Ok(FindOutcome::NoRankedStations);
        }

        info!(
            best = %ranked[0].station.name,
            score = ranked[0].final_score,
            returned = ranked.len(),
            "ranked meeting stations"
        );
        Ok(FindOutcome::Ranked(ranked))
    }

    /// Pair stations with their factor records, dropping those without one.
    /// Discovery order is preserved.
    fn resolve_factors(
        &self,
        stations: Vec<CandidateStation>,
    ) -> (Vec<CandidateStation>, Vec<StationFactors>) {
        let mut scorable = Vec::with_capacity(stations.len());
        let mut records = Vec::with_capacity(stations.len());

        for station in stations {
            match self.factors.get(&station.key) {
                Some(factors) => {
                    records.push(factors.clone());
                    scorable.push(station);
                }
                None if self.factors.is_ambiguous(&station.key) => debug!(
                    station = %station.name,
                    key = %station.key,
                    "several factor records match, excluding"
                ),
                None => debug!(station = %station.name, "no factor record, excluding"),
            }
        }

        (scorable, records)
    }
}
