//! Data transfer objects for web requests and responses.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Location, MeetingRequest, ValidationError};
use crate::finder::{AppliedFactor, ScoredStation};

/// A longitude/latitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lon: f64,
    pub lat: f64,
}

impl From<Location> for Coordinates {
    fn from(location: Location) -> Self {
        Self {
            lon: location.longitude(),
            lat: location.latitude(),
        }
    }
}

/// Request to find the best meeting stations.
#[derive(Debug, Clone, Deserialize)]
pub struct FindBestStationsRequest {
    /// Where each person is (2 to 5 entries)
    pub locations: Vec<Coordinates>,

    /// Factor ids to score on (2 to 7, at most 6)
    #[serde(default)]
    pub factors: Vec<i64>,

    /// Optional weights keyed by factor id, e.g. `{"3": 2.0}`
    #[serde(default)]
    pub weights: HashMap<String, f64>,
}

/// Why a raw request could not become a [`MeetingRequest`].
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("weight key {0:?} is not a factor id")]
    WeightKey(String),

    #[error("invalid query parameter {key}={value:?}")]
    Query { key: String, value: String },

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl FindBestStationsRequest {
    /// Build a request from a query string with repeated keys, e.g.
    /// `locations=126.978,37.5665&locations=127.0276,37.4979&factors=3`.
    ///
    /// Unknown keys are ignored. The query form carries no weights.
    pub fn from_query(query: &str) -> Result<Self, RequestError> {
        let mut locations = Vec::new();
        let mut factors = Vec::new();

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let invalid = || RequestError::Query {
                key: key.to_string(),
                value: value.to_string(),
            };
            match &*key {
                "locations" => {
                    let (lon, lat) = value.split_once(',').ok_or_else(invalid)?;
                    let lon = lon.trim().parse::<f64>().map_err(|_| invalid())?;
                    let lat = lat.trim().parse::<f64>().map_err(|_| invalid())?;
                    locations.push(Coordinates { lon, lat });
                }
                "factors" => factors.push(value.trim().parse::<i64>().map_err(|_| invalid())?),
                _ => {}
            }
        }

        Ok(Self {
            locations,
            factors,
            weights: HashMap::new(),
        })
    }

    /// Validate into a domain request.
    pub fn to_meeting_request(&self) -> Result<MeetingRequest, RequestError> {
        let locations: Vec<(f64, f64)> = self.locations.iter().map(|c| (c.lon, c.lat)).collect();

        let mut weights: Vec<(i64, f64)> = self
            .weights
            .iter()
            .map(|(key, &weight)| {
                key.trim()
                    .parse::<i64>()
                    .map(|id| (id, weight))
                    .map_err(|_| RequestError::WeightKey(key.clone()))
            })
            .collect::<Result<_, _>>()?;
        weights.sort_by_key(|&(id, _)| id);

        Ok(MeetingRequest::new(&locations, &self.factors, &weights)?)
    }
}

/// Response with the ranked stations.
#[derive(Debug, Serialize)]
pub struct FindBestStationsResponse {
    /// Best first, at most three
    pub best_stations: Vec<StationResult>,
}

/// A ranked station.
#[derive(Debug, Serialize)]
pub struct StationResult {
    pub station_name: String,
    pub coordinates: Coordinates,
    pub final_score: f64,
    pub aggregate_transit_minutes: u32,
    pub factors: Vec<FactorResult>,
}

/// One factor's contribution to a station's score.
#[derive(Debug, Serialize)]
pub struct FactorResult {
    pub id: u8,
    pub weight: f64,
    pub value: f64,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,

    /// Stable machine-readable reason code
    pub reason: String,
}

impl From<&AppliedFactor> for FactorResult {
    fn from(factor: &AppliedFactor) -> Self {
        Self {
            id: factor.id.get(),
            weight: factor.weight,
            value: factor.value,
        }
    }
}

impl From<ScoredStation> for StationResult {
    fn from(scored: ScoredStation) -> Self {
        Self {
            factors: scored.applied_factors.iter().map(FactorResult::from).collect(),
            station_name: scored.station.name,
            coordinates: scored.station.location.into(),
            final_score: scored.final_score,
            aggregate_transit_minutes: scored.aggregate_minutes,
        }
    }
}
