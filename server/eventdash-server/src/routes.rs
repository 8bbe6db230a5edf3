use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    handlers::{events, health, ingest},
    server::EventDashServer,
};

/// Route path constants
pub mod paths {
    pub mod health {
        pub const HEALTH: &str = "/health";
        pub const VERSION: &str = "/version";
    }

    pub mod events {
        pub const EVENTS: &str = "/api/v1/events";
        pub const STATS: &str = "/api/v1/events/stats";
        pub const STATS_COMPARISON: &str = "/api/v1/events/stats/comparison";
        pub const TIMESERIES: &str = "/api/v1/events/timeseries";
    }

    pub mod ingest {
        pub const INGEST: &str = "/api/v1/ingest";
    }
}

/// Create health check routes
pub fn health_routes() -> Router<EventDashServer> {
    Router::new()
        .route(paths::health::HEALTH, get(health::health_check))
        .route(paths::health::VERSION, get(health::version_info))
}

/// Create event listing and analytics routes
pub fn event_routes() -> Router<EventDashServer> {
    Router::new()
        .route(paths::events::EVENTS, get(events::list_events))
        .route(paths::events::STATS, get(events::window_stats))
        .route(
            paths::events::STATS_COMPARISON,
            get(events::window_comparison),
        )
        .route(paths::events::TIMESERIES, get(events::time_series))
}

/// Create ingestion routes
pub fn ingest_routes() -> Router<EventDashServer> {
    Router::new().route(paths::ingest::INGEST, post(ingest::ingest_event))
}

/// Merge all route groups
pub fn create_routes() -> Router<EventDashServer> {
    Router::new()
        .merge(health_routes())
        .merge(event_routes())
        .merge(ingest_routes())
}
