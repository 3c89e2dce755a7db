use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use meetpoint_server::cache::{CachedRoutingClient, RouteCacheConfig};
use meetpoint_server::factors::FactorStore;
use meetpoint_server::finder::{FinderConfig, KeyPool, RegionLevel, ServiceRegion};
use meetpoint_server::kakao::{KakaoClient, KakaoConfig};
use meetpoint_server::odsay::{OdsayClient, OdsayConfig};
use meetpoint_server::web::{LiveState, create_router};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_FACTOR_PATH: &str = "factor.json";

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let kakao_key = std::env::var("KAKAO_API_KEY").unwrap_or_else(|_| {
        warn!("KAKAO_API_KEY not set. Station search will fail.");
        String::new()
    });

    // Routing keys are required: without them every lookup would fall back
    let odsay_keys = std::env::var("ODSAY_API_KEYS").unwrap_or_default();
    let keys = KeyPool::from_csv(&odsay_keys)
        .map_err(|e| format!("ODSAY_API_KEYS: {e} (expected comma-separated keys)"))?;

    let factor_path: PathBuf = std::env::var("FACTOR_DATA_PATH")
        .unwrap_or_else(|_| DEFAULT_FACTOR_PATH.to_string())
        .into();
    let factors = FactorStore::load(&factor_path)?;
    if factors.is_empty() {
        warn!(path = %factor_path.display(), "factor data is empty, no station can be ranked");
    }

    let region_names = std::env::var("SERVICE_REGION").unwrap_or_else(|_| "서울특별시".into());
    let region_level = match std::env::var("SERVICE_REGION_LEVEL") {
        Ok(level) => level
            .parse::<RegionLevel>()
            .map_err(|e| format!("SERVICE_REGION_LEVEL: {e}"))?,
        Err(_) => RegionLevel::Province,
    };
    let service_region = ServiceRegion::new(region_level, region_names.split(','));
    if service_region.accepted().is_empty() {
        return Err("SERVICE_REGION names no region".into());
    }

    let kakao = KakaoClient::new(KakaoConfig::new(kakao_key))?;
    let odsay = OdsayClient::new(OdsayConfig::default())?;
    let routing = CachedRoutingClient::new(odsay, &RouteCacheConfig::default());

    let config = FinderConfig::default().with_service_region(service_region);

    info!(
        stations = factors.len(),
        routing_keys = keys.len(),
        region = ?config.service_region.accepted(),
        level = ?region_level,
        "configuration loaded"
    );

    let state: LiveState = LiveState::new(kakao.clone(), kakao, routing, factors, keys, config);
    let app = create_router(state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Meeting-point finder listening on http://{addr}");
    info!("  GET  /health                  - Health check");
    info!("  POST /api/find_best_stations  - Rank meeting stations");

    axum::serve(listener, app).await?;
    Ok(())
}
