use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{api_success, ApiError, ApiResponse, ApiResult};
use crate::ingest::BufferUsage;
use crate::server::EventDashServer;

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall system health status
    #[schema(example = "healthy")]
    pub status: String,
    /// Current timestamp in RFC3339 format
    #[schema(example = "2026-08-26T10:30:00Z")]
    pub timestamp: String,
    /// API version
    #[schema(example = "0.1.0")]
    pub version: String,
    /// Individual service health checks
    pub checks: HashMap<String, String>,
    /// Ingest queue occupancy
    pub ingest_buffer: BufferUsage,
}

/// Version information response
#[derive(Debug, Serialize, ToSchema)]
pub struct VersionResponse {
    /// Application name
    #[schema(example = "EventDash")]
    pub name: String,
    /// Application version
    #[schema(example = "0.1.0")]
    pub version: String,
}

/// Health check handler
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "System is healthy", body = HealthResponse),
        (status = 503, description = "System is unhealthy", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn health_check(
    State(server): State<EventDashServer>,
) -> ApiResult<Json<ApiResponse<HealthResponse>>> {
    let database_healthy = server.pool.is_healthy().await;

    if !database_healthy {
        return Err(ApiError::service_unavailable("Database unhealthy"));
    }

    let mut checks = HashMap::new();
    checks.insert("database".to_string(), "healthy".to_string());
    checks.insert("ingest_worker".to_string(), "healthy".to_string());

    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
        ingest_buffer: server.ingest.usage(),
    };

    Ok(Json(api_success(response)))
}

/// Version information handler
#[utoipa::path(
    get,
    path = "/version",
    tag = "health",
    responses(
        (status = 200, description = "Version information retrieved successfully", body = VersionResponse)
    )
)]
pub async fn version_info(
    State(server): State<EventDashServer>,
) -> ApiResult<Json<ApiResponse<VersionResponse>>> {
    let response = VersionResponse {
        name: server.config.name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    Ok(Json(api_success(response)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::ServerConfig;
    use event_store::StorePool;

    #[tokio::test]
    async fn version_reports_the_configured_name() {
        let pool = StorePool::connect_lazy("postgres://localhost/eventdash").unwrap();
        let config = ServerConfig {
            name: "EventDash Staging".to_string(),
            ..ServerConfig::default()
        };
        let server = EventDashServer::with_pool(pool, config).unwrap();

        let Json(response) = version_info(State(server)).await.unwrap();
        assert_eq!(response.data.name, "EventDash Staging");
        assert_eq!(response.data.version, env!("CARGO_PKG_VERSION"));
    }
}
