//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::config::Config;
use crate::entities::Store;
use crate::upstream::Upstreams;

/// State shared across all HTTP handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Connection pool for users and interactions.
    pub store: Arc<Store>,
    /// Model, maps and drug-label clients.
    pub upstream: Arc<Upstreams>,
}

impl AppState {
    pub fn new(config: Config, store: Store, upstream: Upstreams) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            upstream: Arc::new(upstream),
        }
    }
}
