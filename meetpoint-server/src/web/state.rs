//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedRoutingClient;
use crate::factors::FactorStore;
use crate::finder::{FinderConfig, KeyPool};
use crate::kakao::KakaoClient;
use crate::odsay::OdsayClient;

/// Shared application state.
///
/// Generic over the providers so handlers can run against mocks.
pub struct AppState<R, P, T> {
    /// Region lookup and in-region anchor search
    pub regions: Arc<R>,

    /// Station search
    pub places: Arc<P>,

    /// Transit routing
    pub routing: Arc<T>,

    /// Station factor reference data
    pub factors: Arc<FactorStore>,

    /// Routing API keys
    pub keys: Arc<KeyPool>,

    /// Finder configuration
    pub config: Arc<FinderConfig>,
}

/// State wired to the production providers.
pub type LiveState = AppState<KakaoClient, KakaoClient, CachedRoutingClient<OdsayClient>>;

impl<R, P, T> AppState<R, P, T> {
    /// Create a new app state.
    pub fn new(
        regions: R,
        places: P,
        routing: T,
        factors: FactorStore,
        keys: KeyPool,
        config: FinderConfig,
    ) -> Self {
        Self {
            regions: Arc::new(regions),
            places: Arc::new(places),
            routing: Arc::new(routing),
            factors: Arc::new(factors),
            keys: Arc::new(keys),
            config: Arc::new(config),
        }
    }
}

impl<R, P, T> Clone for AppState<R, P, T> {
    fn clone(&self) -> Self {
        Self {
            regions: Arc::clone(&self.regions),
            places: Arc::clone(&self.places),
            routing: Arc::clone(&self.routing),
            factors: Arc::clone(&self.factors),
            keys: Arc::clone(&self.keys),
            config: Arc::clone(&self.config),
        }
    }
}
