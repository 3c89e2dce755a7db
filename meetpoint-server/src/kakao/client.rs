//! Kakao Local HTTP client.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::{debug, trace};

use crate::domain::Location;
use crate::finder::{PlaceHit, PlaceSearch, Region, RegionProvider, ServiceRegion};

use super::error::KakaoError;
use super::types::{KeywordSearchResponse, PlaceDocument, RegionCodeResponse, RegionDocument};

/// Default base URL for the Kakao Local API.
const DEFAULT_BASE_URL: &str = "https://dapi.kakao.com";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Largest radius keyword search accepts (metres).
const MAX_RADIUS_M: u32 = 20_000;

/// Largest page keyword search returns.
const MAX_PAGE_SIZE: u8 = 15;

/// Keyword used for station search.
const STATION_QUERY: &str = "지하철역";

/// Category group code for subway stations.
const SUBWAY_CATEGORY: &str = "SW8";

/// Configuration for the Kakao client.
#[derive(Debug, Clone)]
pub struct KakaoConfig {
    /// REST API key
    pub api_key: String,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Results per keyword search (at most 15)
    pub page_size: u8,
}

impl KakaoConfig {
    /// Create a new config with the given REST API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 10,
            page_size: MAX_PAGE_SIZE,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Kakao Local API client.
///
/// Uses a semaphore to limit concurrent requests.
#[derive(Debug, Clone)]
pub struct KakaoClient {
    http: reqwest::Client,
    base_url: String,
    page_size: u8,
    semaphore: Arc<Semaphore>,
}

impl KakaoClient {
    /// Create a new client with the given configuration.
    pub fn new(config: KakaoConfig) -> Result<Self, KakaoError> {
        let mut headers = HeaderMap::new();

        let auth = HeaderValue::from_str(&format!("KakaoAK {}", config.api_key)).map_err(|_| {
            KakaoError::Api {
                status: 0,
                message: "Invalid API key format".to_string(),
            }
        })?;
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size.clamp(1, MAX_PAGE_SIZE),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Subway stations within `radius_m` of `center`, nearest first.
    pub async fn stations_near(
        &self,
        center: Location,
        radius_m: u32,
    ) -> Result<Vec<PlaceHit>, KakaoError> {
        let response: KeywordSearchResponse = self
            .get_json(
                "/v2/local/search/keyword.json",
                &[
                    ("query", STATION_QUERY.to_string()),
                    ("category_group_code", SUBWAY_CATEGORY.to_string()),
                    ("x", center.longitude().to_string()),
                    ("y", center.latitude().to_string()),
                    ("radius", radius_m.min(MAX_RADIUS_M).to_string()),
                    ("size", self.page_size.to_string()),
                    ("sort", "distance".to_string()),
                ],
            )
            .await?;

        Ok(to_place_hits(response.documents))
    }

    /// Administrative region of a coordinate.
    pub async fn region_of(&self, location: Location) -> Result<Option<Region>, KakaoError> {
        let response: RegionCodeResponse = self
            .get_json(
                "/v2/local/geo/coord2regioncode.json",
                &[
                    ("x", location.longitude().to_string()),
                    ("y", location.latitude().to_string()),
                ],
            )
            .await?;

        Ok(pick_region(&response.documents))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, KakaoError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| KakaoError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}{}", self.base_url, path);
        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(KakaoError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(KakaoError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(KakaoError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| KakaoError::Json {
            message: e.to_string(),
        })
    }
}

/// Convert place documents to hits, skipping non-stations and any with
/// unusable coordinates.
fn to_place_hits(documents: Vec<PlaceDocument>) -> Vec<PlaceHit> {
    documents
        .into_iter()
        .filter_map(|doc| {
            if doc.category_group_code != SUBWAY_CATEGORY {
                trace!(id = %doc.id, category = %doc.category_group_code, "skipping non-station place");
                return None;
            }

            let location = doc
                .x
                .parse::<f64>()
                .ok()
                .zip(doc.y.parse::<f64>().ok())
                .and_then(|(lon, lat)| Location::new(lon, lat).ok());

            match location {
                Some(location) => Some(PlaceHit {
                    id: doc.id,
                    name: doc.place_name,
                    location,
                }),
                None => {
                    trace!(id = %doc.id, x = %doc.x, y = %doc.y, "skipping place with bad coordinates");
                    None
                }
            }
        })
        .collect()
}

/// Prefer the administrative ("H") classification; fall back to the first.
fn pick_region(documents: &[RegionDocument]) -> Option<Region> {
    documents
        .iter()
        .find(|d| d.region_type == "H")
        .or_else(|| documents.first())
        .map(|d| Region {
            province: d.region_1depth_name.clone(),
            district: d.region_2depth_name.clone(),
        })
}

impl PlaceSearch for KakaoClient {
    type Error = KakaoError;

    async fn search_stations(
        &self,
        center: Location,
        radius_m: u32,
    ) -> Result<Vec<PlaceHit>, KakaoError> {
        self.stations_near(center, radius_m).await
    }
}

impl RegionProvider for KakaoClient {
    type Error = KakaoError;

    async fn region_at(&self, location: Location) -> Result<Option<Region>, KakaoError> {
        self.region_of(location).await
    }

    /// The nearest station within `radius_m` whose own region lies inside
    /// `boundary`.
    async fn nearest_in_region(
        &self,
        location: Location,
        radius_m: u32,
        boundary: &ServiceRegion,
    ) -> Result<Option<Location>, KakaoError> {
        let hits = self.stations_near(location, radius_m).await?;

        for hit in hits {
            if let Some(region) = self.region_of(hit.location).await?
                && boundary.contains(&region)
            {
                debug!(anchor = %hit.name, location = %hit.location, "found in-region anchor");
                return Ok(Some(hit.location));
            }
        }

        Ok(None)
    }
}
