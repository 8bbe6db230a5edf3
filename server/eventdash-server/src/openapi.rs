//! OpenAPI documentation

use utoipa::OpenApi;

use crate::error::{ApiErrorResponse, ApiResponse};
use crate::handlers::{events, health, ingest};
use crate::ingest::BufferUsage;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "EventDash API",
        description = "Security event dashboard API: recent events, window statistics, severity time series and buffered ingestion",
        version = env!("CARGO_PKG_VERSION")
    ),
    paths(
        health::health_check,
        health::version_info,
        events::list_events,
        events::window_stats,
        events::window_comparison,
        events::time_series,
        ingest::ingest_event,
    ),
    components(schemas(
        ApiErrorResponse,
        ApiResponse<serde_json::Value>,
        BufferUsage,
        health::HealthResponse,
        health::VersionResponse,
        ingest::IngestEventRequest,
        ingest::IngestAccepted,
        event_store::Event,
        event_store::EventType,
        event_store::Severity,
        event_store::WindowStats,
        event_store::DailySeverityCount,
        analytics_engine::WindowComparison,
        analytics_engine::PercentChange,
    )),
    tags(
        (name = "health", description = "Liveness and version endpoints"),
        (name = "events", description = "Event listing and analytics"),
        (name = "ingest", description = "Buffered event ingestion")
    )
)]
pub struct ApiDoc;
