//! Station discovery around the midpoint.

use std::collections::HashSet;
use std::future::Future;

use tracing::{debug, trace};

use crate::domain::{CandidateStation, Location, StationKey, leading_name};

/// A station-category place returned by place search.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceHit {
    pub id: String,
    pub name: String,
    pub location: Location,
}

/// Place search restricted to transit stations.
///
/// This abstraction allows discovery to be tested with mock data.
pub trait PlaceSearch: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Stations within `radius_m` of `center`, nearest first.
    fn search_stations(
        &self,
        center: Location,
        radius_m: u32,
    ) -> impl Future<Output = Result<Vec<PlaceHit>, Self::Error>> + Send;
}

/// Search for stations around `center` and deduplicate them.
///
/// An empty result is not an error; the caller decides what "no stations"
/// means for the request.
pub async fn discover_stations<P: PlaceSearch>(
    places: &P,
    center: Location,
    radius_m: u32,
) -> Result<Vec<CandidateStation>, P::Error> {
    let hits = places.search_stations(center, radius_m).await?;
    let raw = hits.len();
    let stations = dedupe_stations(hits);

    debug!(
        center = %center,
        radius_m,
        raw,
        unique = stations.len(),
        "discovered stations"
    );

    Ok(stations)
}

/// Collapse hits that name the same station, keeping the nearest.
///
/// Input order is the provider's distance order and is preserved among
/// survivors. Hits with blank names are dropped.
pub fn dedupe_stations(hits: Vec<PlaceHit>) -> Vec<CandidateStation> {
    let mut seen: HashSet<StationKey> = HashSet::new();
    let mut stations = Vec::with_capacity(hits.len());

    for hit in hits {
        let (Some(key), Some(name)) = (StationKey::from_name(&hit.name), leading_name(&hit.name))
        else {
            trace!(id = %hit.id, "skipping place with blank name");
            continue;
        };

        if !seen.insert(key.clone()) {
            trace!(name = %hit.name, key = %key, "skipping duplicate station");
            continue;
        }

        stations.push(CandidateStation {
            id: hit.id,
            name: name.to_string(),
            key,
            location: hit.location,
        });
    }

    stations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: &str, name: &str, lon: f64, lat: f64) -> PlaceHit {
        PlaceHit {
            id: id.to_string(),
            name: name.to_string(),
            location: Location::new(lon, lat).unwrap(),
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("search unavailable")]
    struct SearchDown;

    struct MockPlaces {
        hits: Vec<PlaceHit>,
    }

    impl PlaceSearch for MockPlaces {
        type Error = SearchDown;

        async fn search_stations(
            &self,
            _center: Location,
            _radius_m: u32,
        ) -> Result<Vec<PlaceHit>, SearchDown> {
            Ok(self.hits.clone())
        }
    }

    struct DownPlaces;

    impl PlaceSearch for DownPlaces {
        type Error = SearchDown;

        async fn search_stations(
            &self,
            _center: Location,
            _radius_m: u32,
        ) -> Result<Vec<PlaceHit>, SearchDown> {
            Err(SearchDown)
        }
    }

    #[test]
    fn exits_of_one_station_collapse() {
        let stations = dedupe_stations(vec![
            hit("1", "Gangnam Station Exit 1", 127.0276, 37.4979),
            hit("2", "Gangnam Station Exit 2", 127.0280, 37.4985),
        ]);

        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name, "Gangnam");
        assert_eq!(stations[0].id, "1");
    }

    #[test]
    fn distance_order_is_preserved() {
        let stations = dedupe_stations(vec![
            hit("a", "강남역 2호선", 127.0276, 37.4979),
            hit("b", "역삼역 2호선", 127.0366, 37.5006),
            hit("c", "강남역 신분당선", 127.0281, 37.4966),
            hit("d", "선릉역 수인분당선", 127.0490, 37.5045),
        ]);

        let names: Vec<&str> = stations.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["강남", "역삼", "선릉"]);
    }

    #[test]
    fn case_differences_collapse() {
        let stations = dedupe_stations(vec![
            hit("1", "SEOUL Station", 126.9707, 37.5547),
            hit("2", "seoul station exit 3", 126.9720, 37.5550),
        ]);

        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name, "SEOUL");
    }

    #[test]
    fn blank_names_are_dropped() {
        let stations = dedupe_stations(vec![hit("1", "  ", 127.0, 37.5)]);
        assert!(stations.is_empty());
    }

    #[tokio::test]
    async fn zero_hits_is_an_empty_result() {
        let places = MockPlaces { hits: vec![] };
        let center = Location::new(127.0, 37.5).unwrap();

        let stations = discover_stations(&places, center, 20_000).await.unwrap();
        assert!(stations.is_empty());
    }

    #[tokio::test]
    async fn provider_errors_propagate() {
        let center = Location::new(127.0, 37.5).unwrap();
        assert!(discover_stations(&DownPlaces, center, 20_000).await.is_err());
    }
}
