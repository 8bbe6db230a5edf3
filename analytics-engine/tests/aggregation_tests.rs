//! Aggregation service tests against a mocked event store.
//!
//! These exercise the service's composition and validation logic without a
//! database: windowing, percent-change math across both windows, the days
//! range contract, and empty-store behavior.

use std::sync::Arc;

use analytics_engine::{AnalyticsError, AnalyticsService};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use event_store::{DailySeverityCount, Event, EventStore, StoreResult, WindowStats};
use mockall::mock;
use mockall::Sequence;

mock! {
    Store {}

    #[async_trait]
    impl EventStore for Store {
        async fn list_recent(&self, limit: i64, offset: i64) -> StoreResult<Vec<Event>>;
        async fn count_in_window(&self, window_start: DateTime<Utc>) -> StoreResult<WindowStats>;
        async fn count_in_range(
            &self,
            range_start: DateTime<Utc>,
            range_end: DateTime<Utc>,
        ) -> StoreResult<WindowStats>;
        async fn daily_severity_counts(
            &self,
            since: DateTime<Utc>,
        ) -> StoreResult<Vec<DailySeverityCount>>;
    }
}

fn stats(total: i64, warnings: i64, errors: i64, users: i64) -> WindowStats {
    WindowStats {
        total_events: total,
        warnings,
        errors,
        unique_users: users,
    }
}

#[tokio::test]
async fn last_24_hours_passes_through_window_counts() {
    let mut store = MockStore::new();
    let now = Utc::now();
    store
        .expect_count_in_window()
        .withf(move |start| {
            let age = now - *start;
            age.num_minutes() >= 24 * 60 - 1 && age.num_minutes() <= 24 * 60 + 1
        })
        .times(1)
        .returning(|_| Ok(stats(10, 0, 0, 4)));

    let service = AnalyticsService::new(Arc::new(store));
    let result = service.events_last_24_hours().await.unwrap();
    assert_eq!(result, stats(10, 0, 0, 4));
}

#[tokio::test]
async fn empty_store_yields_all_zero_stats() {
    let mut store = MockStore::new();
    store
        .expect_count_in_window()
        .returning(|_| Ok(WindowStats::default()));

    let service = AnalyticsService::new(Arc::new(store));
    let result = service.events_last_24_hours().await.unwrap();
    assert_eq!(result, WindowStats::default());
}

#[tokio::test]
async fn empty_store_lists_no_events_without_error() {
    // Listing against an empty store is a success with an empty sequence,
    // never a failure. Default limit and first page, as the list endpoint
    // issues them.
    let mut store = MockStore::new();
    store
        .expect_list_recent()
        .withf(|limit, offset| *limit == 50 && *offset == 0)
        .times(1)
        .returning(|_, _| Ok(vec![]));

    let store: Arc<dyn EventStore> = Arc::new(store);
    let events = store.list_recent(50, 0).await.unwrap();
    assert!(events.is_empty());
}

#[tokio::test]
async fn comparison_reads_current_then_previous_window() {
    // Scenario from the query contract: 10 events in the last 24h, 5 events
    // between 24h and 48h ago. Current doubles the previous window.
    let mut store = MockStore::new();
    let mut seq = Sequence::new();

    store
        .expect_count_in_range()
        .withf(|start, end| (*end - *start).num_hours() == 24)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(stats(10, 0, 0, 6)));
    store
        .expect_count_in_range()
        .withf(|start, end| (*end - *start).num_hours() == 24)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(stats(5, 0, 5, 2)));

    let service = AnalyticsService::new(Arc::new(store));
    let comparison = service.events_last_24_hours_with_comparison().await.unwrap();

    assert_eq!(comparison.current.total_events, 10);
    assert_eq!(comparison.previous.total_events, 5);
    assert_eq!(comparison.percent_change.total_events, 100.0);
    assert_eq!(comparison.percent_change.unique_users, 200.0);
    // errors went from 5 to 0
    assert_eq!(comparison.percent_change.errors, -100.0);
    // both windows had zero warnings
    assert_eq!(comparison.percent_change.warnings, 0.0);
}

#[tokio::test]
async fn comparison_windows_are_adjacent() {
    thread_local! {
        static CURRENT_START: std::cell::RefCell<Option<DateTime<Utc>>> =
            const { std::cell::RefCell::new(None) };
    }

    let mut store = MockStore::new();
    let mut seq = Sequence::new();

    // The previous window must end exactly where the current one starts.
    store
        .expect_count_in_range()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|start, _| {
            CURRENT_START.with(|c| *c.borrow_mut() = Some(start));
            Ok(WindowStats::default())
        });
    store
        .expect_count_in_range()
        .withf(|_, end| CURRENT_START.with(|c| c.borrow().as_ref() == Some(end)))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(WindowStats::default()));

    let service = AnalyticsService::new(Arc::new(store));
    service.events_last_24_hours_with_comparison().await.unwrap();
}

#[tokio::test]
async fn time_series_rejects_out_of_range_days() {
    // The store must never be called for invalid input.
    let store = MockStore::new();
    let service = AnalyticsService::new(Arc::new(store));

    for days in [0, -1, 366, 10_000] {
        let err = service.events_time_series(days).await.unwrap_err();
        match err {
            AnalyticsError::Validation(msg) => {
                assert!(msg.contains("between 1 and 365"), "message was: {msg}")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn time_series_accepts_range_bounds() {
    for days in [1, 365] {
        let mut store = MockStore::new();
        let now = Utc::now();
        store
            .expect_daily_severity_counts()
            .withf(move |since| {
                let age_days = (now - *since).num_days();
                age_days == days || age_days == days - 1
            })
            .times(1)
            .returning(|_| Ok(vec![]));

        let service = AnalyticsService::new(Arc::new(store));
        let rows = service.events_time_series(days).await.unwrap();
        assert!(rows.is_empty());
    }
}

#[tokio::test]
async fn time_series_preserves_store_ordering() {
    let day = |d: u32| NaiveDate::from_ymd_opt(2026, 8, d).unwrap();
    let row = |date: NaiveDate, low: i64| DailySeverityCount {
        date,
        low,
        medium: 0,
        high: 0,
        critical: 0,
    };

    let mut store = MockStore::new();
    store
        .expect_daily_severity_counts()
        .returning(move |_| Ok(vec![row(day(1), 3), row(day(4), 1), row(day(5), 2)]));

    let service = AnalyticsService::new(Arc::new(store));
    let rows = service.events_time_series(30).await.unwrap();

    // Sparse, ascending, one row per date.
    let dates: Vec<_> = rows.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![day(1), day(4), day(5)]);
}
