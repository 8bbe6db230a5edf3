// Aggregation over the event store
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use event_store::{DailySeverityCount, EventStore, WindowStats};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::error::{AnalyticsError, AnalyticsResult};

/// Largest accepted `days` argument for [`AnalyticsService::events_time_series`].
pub const MAX_TIME_SERIES_DAYS: i64 = 365;

/// Signed per-field percent change between two windows, unclamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PercentChange {
    pub total_events: f64,
    pub warnings: f64,
    pub errors: f64,
    pub unique_users: f64,
}

/// Current window stats next to the previous window's, with the per-field
/// percent change between them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct WindowComparison {
    pub current: WindowStats,
    pub previous: WindowStats,
    pub percent_change: PercentChange,
}

/// Stateless aggregation layer over an [`EventStore`].
#[derive(Clone)]
pub struct AnalyticsService {
    store: Arc<dyn EventStore>,
}

impl AnalyticsService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Window stats for the last 24 hours. "Now" is evaluated once at call
    /// start; there is no snapshot isolation against concurrent writes.
    pub async fn events_last_24_hours(&self) -> AnalyticsResult<WindowStats> {
        let window_start = Utc::now() - Duration::hours(24);
        Ok(self.store.count_in_window(window_start).await?)
    }

    /// Stats for `[now-24h, now)` next to `[now-48h, now-24h)` with percent
    /// change per field.
    ///
    /// The two window reads are issued sequentially with no atomicity between
    /// them; a write landing in between can produce a pair that is not a
    /// consistent snapshot. Accepted trade-off.
    pub async fn events_last_24_hours_with_comparison(&self) -> AnalyticsResult<WindowComparison> {
        let now = Utc::now();
        let day_ago = now - Duration::hours(24);
        let two_days_ago = now - Duration::hours(48);

        let current = self.store.count_in_range(day_ago, now).await?;
        let previous = self.store.count_in_range(two_days_ago, day_ago).await?;

        debug!(
            current_total = current.total_events,
            previous_total = previous.total_events,
            "Computed 24h comparison windows"
        );

        Ok(WindowComparison {
            current,
            previous,
            percent_change: PercentChange {
                total_events: percent_change(current.total_events, previous.total_events),
                warnings: percent_change(current.warnings, previous.warnings),
                errors: percent_change(current.errors, previous.errors),
                unique_users: percent_change(current.unique_users, previous.unique_users),
            },
        })
    }

    /// Daily severity counts for the past `days` days, ascending by date.
    ///
    /// `days` must be in `[1, 365]`; anything else is a validation failure
    /// surfaced to the boundary as a client error. The returned series is
    /// sparse: dates with no events are omitted.
    pub async fn events_time_series(&self, days: i64) -> AnalyticsResult<Vec<DailySeverityCount>> {
        if !(1..=MAX_TIME_SERIES_DAYS).contains(&days) {
            return Err(AnalyticsError::Validation(format!(
                "days must be between 1 and {MAX_TIME_SERIES_DAYS}"
            )));
        }

        let since: DateTime<Utc> = Utc::now() - Duration::days(days);
        Ok(self.store.daily_severity_counts(since).await?)
    }
}

/// Percent-change rule, applied per field independently: a zero previous
/// window maps to +100 when anything happened and 0 when nothing did;
/// otherwise the signed relative difference, unclamped.
fn percent_change(current: i64, previous: i64) -> f64 {
    if previous == 0 {
        return if current > 0 { 100.0 } else { 0.0 };
    }
    ((current - previous) as f64 / previous as f64) * 100.0
}
