use std::sync::Arc;

use analytics_engine::AnalyticsService;
use anyhow::Result;
use event_store::{PgEventStore, StorePool};

use crate::ingest::{IngestBuffer, IngestConfig};

/// Main EventDash server state
#[derive(Clone)]
pub struct EventDashServer {
    /// Server configuration
    pub config: ServerConfig,
    /// Database connection pool
    pub pool: StorePool,
    /// Event repository
    pub store: Arc<PgEventStore>,
    /// Aggregation service
    pub analytics: AnalyticsService,
    /// Buffered ingestion queue
    pub ingest: IngestBuffer,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server name
    pub name: String,
    /// Ingestion buffer tuning
    pub ingest: IngestConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "EventDash".to_string(),
            ingest: IngestConfig::default(),
        }
    }
}

impl EventDashServer {
    /// Create a new server instance, connecting to the database and spawning
    /// the ingestion worker.
    pub async fn new(database_url: &str, config: ServerConfig) -> Result<Self> {
        let pool = StorePool::new(database_url).await?;
        Self::with_pool(pool, config)
    }

    /// Create a server instance over an existing pool. Useful for testing.
    pub fn with_pool(pool: StorePool, config: ServerConfig) -> Result<Self> {
        let store = Arc::new(PgEventStore::new(pool.pool().clone()));
        let analytics = AnalyticsService::new(store.clone());
        let (ingest, _worker) = IngestBuffer::spawn(store.clone(), config.ingest.clone());

        Ok(Self {
            config,
            pool,
            store,
            analytics,
            ingest,
        })
    }
}

impl std::fmt::Debug for EventDashServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDashServer")
            .field("config", &self.config)
            .finish()
    }
}
