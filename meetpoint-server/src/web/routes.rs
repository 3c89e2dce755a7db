//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::ValidationError;
use crate::finder::{FindError, FindOutcome, Finder, PlaceSearch, RegionProvider, RoutingProvider};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<R, P, T>(state: AppState<R, P, T>) -> Router
where
    R: RegionProvider + 'static,
    P: PlaceSearch + 'static,
    T: RoutingProvider + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/find_best_stations",
            get(find_best_stations_query::<R, P, T>).post(find_best_stations::<R, P, T>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Rank meeting stations for a group.
async fn find_best_stations<R, P, T>(
    State(state): State<AppState<R, P, T>>,
    body: Bytes,
) -> Result<Json<FindBestStationsResponse>, AppError>
where
    R: RegionProvider,
    P: PlaceSearch,
    T: RoutingProvider,
{
    // Parse JSON manually so a bad body is a 400 with our error shape
    let req: FindBestStationsRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(&body), "invalid request JSON");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
            reason: "invalid_json",
        }
    })?;

    rank_for(&state, &req).await
}

/// Rank meeting stations from repeated `locations` and `factors` query
/// parameters.
async fn find_best_stations_query<R, P, T>(
    State(state): State<AppState<R, P, T>>,
    RawQuery(query): RawQuery,
) -> Result<Json<FindBestStationsResponse>, AppError>
where
    R: RegionProvider,
    P: PlaceSearch,
    T: RoutingProvider,
{
    let req = FindBestStationsRequest::from_query(query.as_deref().unwrap_or_default())?;
    rank_for(&state, &req).await
}

async fn rank_for<R, P, T>(
    state: &AppState<R, P, T>,
    req: &FindBestStationsRequest,
) -> Result<Json<FindBestStationsResponse>, AppError>
where
    R: RegionProvider,
    P: PlaceSearch,
    T: RoutingProvider,
{
    let request = req.to_meeting_request()?;

    let finder = Finder::new(
        state.regions.as_ref(),
        state.places.as_ref(),
        state.routing.as_ref(),
        &state.factors,
        &state.keys,
        &state.config,
    );

    match finder.find(&request).await? {
        FindOutcome::Ranked(stations) => Ok(Json(FindBestStationsResponse {
            best_stations: stations.into_iter().map(StationResult::from).collect(),
        })),
        FindOutcome::NoStationsFound => Err(AppError::NotFound {
            message: "No stations found near the meeting point".to_string(),
            reason: "no_stations_found",
        }),
        FindOutcome::NoRankedStations => Err(AppError::NotFound {
            message: "No nearby station could be ranked".to_string(),
            reason: "no_ranked_stations",
        }),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest {
        message: String,
        reason: &'static str,
    },
    NotFound {
        message: String,
        reason: &'static str,
    },
    BadGateway {
        message: String,
    },
    Internal {
        message: String,
    },
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
            reason: "invalid_request",
        }
    }
}

impl From<RequestError> for AppError {
    fn from(e: RequestError) -> Self {
        match e {
            RequestError::Invalid(e) => e.into(),
            RequestError::WeightKey(_) => AppError::BadRequest {
                message: e.to_string(),
                reason: "invalid_request",
            },
            RequestError::Query { .. } => AppError::BadRequest {
                message: e.to_string(),
                reason: "invalid_query",
            },
        }
    }
}

impl From<FindError> for AppError {
    fn from(e: FindError) -> Self {
        match e {
            FindError::RegionAdjustment { .. } => AppError::BadRequest {
                message: e.to_string(),
                reason: "region_adjustment_failed",
            },
            FindError::Discovery(_) => AppError::BadGateway {
                message: e.to_string(),
            },
            FindError::Midpoint => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, reason) = match self {
            AppError::BadRequest { message, reason } => (StatusCode::BAD_REQUEST, message, reason),
            AppError::NotFound { message, reason } => (StatusCode::NOT_FOUND, message, reason),
            AppError::BadGateway { message } => {
                (StatusCode::BAD_GATEWAY, message, "upstream_failure")
            }
            AppError::Internal { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message, "internal_error")
            }
        };

        if status.is_server_error() {
            error!(%status, reason, "{message}");
        } else {
            warn!(%status, reason, "{message}");
        }

        let body = Json(ErrorResponse {
            error: message,
            reason: reason.to_string(),
        });
        (status, body).into_response()
    }
}
