//! Event listing and analytics endpoints
//!
//! All routes here are gated on an authenticated principal via
//! [`AuthContext`]; the dashboard frontend calls them with the session token
//! issued by the identity service.

use analytics_engine::WindowComparison;
use axum::{
    extract::{Query, State},
    Json,
};
use event_store::{DailySeverityCount, Event, EventStore, WindowStats};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{api_success, ApiResponse, ApiResult};
use crate::middleware::AuthContext;
use crate::server::EventDashServer;
use crate::types::pagination::PaginationParams;

/// Query parameters for the severity time series
#[derive(Debug, Deserialize, IntoParams)]
pub struct TimeSeriesQuery {
    /// Number of past days to include, 1 to 365
    #[param(example = 90, minimum = 1, maximum = 365)]
    pub days: Option<i64>,
}

const DEFAULT_TIME_SERIES_DAYS: i64 = 90;

/// List recent events, most recent first
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "events",
    params(PaginationParams),
    responses(
        (status = 200, description = "Recent events ordered by occurred_at descending", body = [Event]),
        (status = 401, description = "No authenticated principal", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn list_events(
    State(server): State<EventDashServer>,
    _auth: AuthContext,
    Query(pagination): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<Vec<Event>>>> {
    let events = server
        .store
        .list_recent(pagination.limit(), pagination.offset())
        .await?;

    Ok(Json(api_success(events)))
}

/// Window stats for the last 24 hours
#[utoipa::path(
    get,
    path = "/api/v1/events/stats",
    tag = "events",
    responses(
        (status = 200, description = "Counts for the last 24 hours", body = WindowStats),
        (status = 401, description = "No authenticated principal", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn window_stats(
    State(server): State<EventDashServer>,
    _auth: AuthContext,
) -> ApiResult<Json<ApiResponse<WindowStats>>> {
    let stats = server.analytics.events_last_24_hours().await?;
    Ok(Json(api_success(stats)))
}

/// Last 24 hours next to the 24 hours before, with percent change
#[utoipa::path(
    get,
    path = "/api/v1/events/stats/comparison",
    tag = "events",
    responses(
        (status = 200, description = "Current and previous window with per-field percent change", body = WindowComparison),
        (status = 401, description = "No authenticated principal", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn window_comparison(
    State(server): State<EventDashServer>,
    _auth: AuthContext,
) -> ApiResult<Json<ApiResponse<WindowComparison>>> {
    let comparison = server.analytics.events_last_24_hours_with_comparison().await?;
    Ok(Json(api_success(comparison)))
}

/// Daily severity counts over the requested range
#[utoipa::path(
    get,
    path = "/api/v1/events/timeseries",
    tag = "events",
    params(TimeSeriesQuery),
    responses(
        (status = 200, description = "Sparse daily severity counts, ascending by date", body = [DailySeverityCount]),
        (status = 400, description = "days outside 1..=365", body = crate::error::ApiErrorResponse),
        (status = 401, description = "No authenticated principal", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn time_series(
    State(server): State<EventDashServer>,
    _auth: AuthContext,
    Query(query): Query<TimeSeriesQuery>,
) -> ApiResult<Json<ApiResponse<Vec<DailySeverityCount>>>> {
    let days = query.days.unwrap_or(DEFAULT_TIME_SERIES_DAYS);
    let series = server.analytics.events_time_series(days).await?;
    Ok(Json(api_success(series)))
}
