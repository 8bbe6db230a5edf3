// Event repository over Postgres
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Pool, Postgres};
use tracing::debug;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::models::{DailySeverityCount, Event, NewEvent, WindowStats};

/// Read interface over the `events` relation.
///
/// Any relational or document store supporting range filters and grouped
/// counts can implement this; the aggregation layer only depends on the
/// trait. All operations are read-only and never fail on empty results.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Events ordered by `occurred_at` descending; ties are broken by
    /// storage order. `limit = 0` returns an empty sequence.
    async fn list_recent(&self, limit: i64, offset: i64) -> StoreResult<Vec<Event>>;

    /// Counts over events with `occurred_at >= window_start`.
    async fn count_in_window(&self, window_start: DateTime<Utc>) -> StoreResult<WindowStats>;

    /// Counts restricted to `range_start <= occurred_at < range_end`.
    async fn count_in_range(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> StoreResult<WindowStats>;

    /// One row per calendar date with at least one event since `since`,
    /// ascending by date. Dates with no events are omitted, so callers must
    /// not assume a dense series.
    async fn daily_severity_counts(
        &self,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<DailySeverityCount>>;
}

/// Write interface for the ingestion path. Events are write-once.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Insert a batch of events in one transaction, filling missing ids and
    /// timestamps server-side. Returns the number of rows inserted.
    async fn insert_batch(&self, events: Vec<NewEvent>) -> StoreResult<u64>;
}

/// Postgres implementation of [`EventStore`] and [`EventSink`].
#[derive(Debug, Clone)]
pub struct PgEventStore {
    pool: Pool<Postgres>,
}

const EVENT_COLUMNS: &str = "id, event_type, severity, user_id, ip_address, user_agent, \
     endpoint, http_method, status_code, metadata, occurred_at, ingested_at, created_at";

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn list_recent(&self, limit: i64, offset: i64) -> StoreResult<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            ORDER BY occurred_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = events.len(), limit, offset, "Listed recent events");
        Ok(events)
    }

    async fn count_in_window(&self, window_start: DateTime<Utc>) -> StoreResult<WindowStats> {
        // COUNT(DISTINCT user_id) skips NULLs, which excludes anonymous
        // events from unique_users.
        let stats = sqlx::query_as::<_, WindowStats>(
            r#"
            SELECT
                COUNT(*) AS total_events,
                COUNT(*) FILTER (WHERE severity = 'medium') AS warnings,
                COUNT(*) FILTER (WHERE severity IN ('high', 'critical')) AS errors,
                COUNT(DISTINCT user_id) AS unique_users
            FROM events
            WHERE occurred_at >= $1
            "#,
        )
        .bind(window_start)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }

    async fn count_in_range(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> StoreResult<WindowStats> {
        let stats = sqlx::query_as::<_, WindowStats>(
            r#"
            SELECT
                COUNT(*) AS total_events,
                COUNT(*) FILTER (WHERE severity = 'medium') AS warnings,
                COUNT(*) FILTER (WHERE severity IN ('high', 'critical')) AS errors,
                COUNT(DISTINCT user_id) AS unique_users
            FROM events
            WHERE occurred_at >= $1 AND occurred_at < $2
            "#,
        )
        .bind(range_start)
        .bind(range_end)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }

    async fn daily_severity_counts(
        &self,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<DailySeverityCount>> {
        // DATE() truncation happens database-side; no client timezone
        // conversion is applied.
        let rows = sqlx::query_as::<_, DailySeverityCount>(
            r#"
            SELECT
                DATE(occurred_at) AS date,
                COUNT(*) FILTER (WHERE severity = 'low') AS low,
                COUNT(*) FILTER (WHERE severity = 'medium') AS medium,
                COUNT(*) FILTER (WHERE severity = 'high') AS high,
                COUNT(*) FILTER (WHERE severity = 'critical') AS critical
            FROM events
            WHERE occurred_at >= $1
            GROUP BY DATE(occurred_at)
            ORDER BY DATE(occurred_at)
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl EventSink for PgEventStore {
    async fn insert_batch(&self, events: Vec<NewEvent>) -> StoreResult<u64> {
        if events.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted: u64 = 0;

        for event in events {
            let now = Utc::now();
            let occurred_at = event.occurred_at.unwrap_or(now);
            let ingested_at = event.ingested_at.unwrap_or(now);

            sqlx::query(
                r#"
                INSERT INTO events (
                    id, event_type, severity, user_id, ip_address, user_agent,
                    endpoint, http_method, status_code, metadata,
                    occurred_at, ingested_at, created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(event.event_type.as_str())
            .bind(event.severity.as_str())
            .bind(&event.user_id)
            .bind(event.ip_address)
            .bind(&event.user_agent)
            .bind(&event.endpoint)
            .bind(&event.http_method)
            .bind(event.status_code)
            .bind(&event.metadata)
            .bind(occurred_at)
            .bind(ingested_at)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            inserted += 1;
        }

        tx.commit().await?;

        debug!(inserted, "Inserted event batch");
        Ok(inserted)
    }
}
