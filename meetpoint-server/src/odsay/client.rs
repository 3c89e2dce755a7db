//! ODsay HTTP client.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::trace;

use crate::domain::Location;
use crate::finder::{RouteOption, RoutingError, RoutingProvider};

use super::types::SearchPathResponse;

/// Default base URL for the ODsay API.
const DEFAULT_BASE_URL: &str = "https://api.odsay.com";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 10;

/// No route between the points.
const CODE_NO_ROUTE: &str = "-99";

/// Origin and destination within 700 m of each other.
const CODE_TOO_CLOSE: &str = "-98";

/// Configuration for the ODsay client.
#[derive(Debug, Clone)]
pub struct OdsayConfig {
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OdsayConfig {
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

impl Default for OdsayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 10,
        }
    }
}

/// ODsay routing client.
#[derive(Debug, Clone)]
pub struct OdsayClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl OdsayClient {
    pub fn new(config: OdsayConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }
}

impl RoutingProvider for OdsayClient {
    async fn route(
        &self,
        from: Location,
        to: Location,
        api_key: &str,
    ) -> Result<Vec<RouteOption>, RoutingError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| RoutingError::Transport("semaphore closed".to_string()))?;

        let url = format!("{}/v1/api/searchPubTransPathT", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("SX", from.longitude().to_string()),
                ("SY", from.latitude().to_string()),
                ("EX", to.longitude().to_string()),
                ("EY", to.latitude().to_string()),
                ("apiKey", api_key.to_string()),
            ])
            .send()
            .await
            .map_err(|e| RoutingError::Transport(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RoutingError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RoutingError::Provider {
                code: status.as_u16().to_string(),
                message: body.chars().take(200).collect(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| RoutingError::Transport(e.to_string()))?;

        let options = interpret(&body);
        trace!(from = %from, to = %to, result = ?options, "routing response");
        options
    }
}

/// Interpret a `searchPubTransPathT` response body.
///
/// Provider error payloads become [`RoutingError`]s: `-99` is
/// [`RoutingError::NoRoute`], `-98` is [`RoutingError::TooClose`], anything
/// else is [`RoutingError::Provider`]. A successful body yields one option
/// per path that reports a total time, possibly none.
pub fn interpret(body: &str) -> Result<Vec<RouteOption>, RoutingError> {
    if body.trim().is_empty() {
        return Err(RoutingError::Malformed("empty body".to_string()));
    }

    let response: SearchPathResponse =
        serde_json::from_str(body).map_err(|e| RoutingError::Malformed(e.to_string()))?;

    if let Some(errors) = response.error {
        let Some(error) = errors.first() else {
            return Err(RoutingError::Malformed("empty error list".to_string()));
        };
        let code = error.code();
        return Err(match code.as_str() {
            CODE_NO_ROUTE => RoutingError::NoRoute,
            CODE_TOO_CLOSE => RoutingError::TooClose,
            _ => RoutingError::Provider {
                code,
                message: error.msg.clone(),
            },
        });
    }

    let result = response
        .result
        .ok_or_else(|| RoutingError::Malformed("missing result".to_string()))?;

    Ok(result
        .path
        .iter()
        .filter_map(|p| p.info.total_time)
        .map(|total_minutes| RouteOption { total_minutes })
        .collect())
}
