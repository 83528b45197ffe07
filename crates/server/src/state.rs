use std::sync::Arc;
use std::time::Duration;

use registry::{HttpProbe, Registry, SqliteFeedStore};
use slicer::SlicerClient;
use sqlx::SqlitePool;

use crate::config::Config;

/// Bounded timeout for every upstream fetch (probe and render), so a hung
/// host cannot pin request-handling capacity.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<Registry>,
    pub slicer: Arc<SlicerClient>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Config) -> Self {
        // One shared HTTP client for the probe and the slicer.
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        let store = Arc::new(SqliteFeedStore::new(db));
        let probe = Arc::new(HttpProbe::with_client(client.clone()));
        let registry = Registry::new(store, probe);
        let slicer = SlicerClient::with_client(client);

        Self::with_parts(config, registry, slicer)
    }

    /// Assemble a state from pre-built components (tests swap in an
    /// in-memory store and a stub probe through here).
    pub fn with_parts(config: Config, registry: Registry, slicer: SlicerClient) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            slicer: Arc::new(slicer),
        }
    }
}
