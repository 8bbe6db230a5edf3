//! Aggregation service for EventDash
//!
//! Composes [`event_store::EventStore`] reads into decision-ready summaries:
//!
//! - Point-in-time window counts (last 24 hours)
//! - Current-vs-previous-window comparison with per-field percent change
//! - Multi-day time series bucketed by severity
//!
//! The service is a pure, stateless request/response layer: each call is
//! independent, "now" is evaluated once at call start, and all state lives in
//! the underlying store.

pub mod error;
pub mod service;

pub use error::{AnalyticsError, AnalyticsResult};
pub use service::{AnalyticsService, PercentChange, WindowComparison, MAX_TIME_SERIES_DAYS};
