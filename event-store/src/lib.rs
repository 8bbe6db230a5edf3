//! Postgres-backed event store for EventDash
//!
//! This crate owns the `events` relation and everything that touches it:
//! - Typed models for events, severities and aggregate summaries
//! - The [`EventStore`] read interface (recent listing, windowed counts,
//!   day-bucketed severity series) and the [`EventSink`] write interface
//!   (batched, write-once inserts)
//! - A [`PgEventStore`] repository implementing both against Postgres
//! - A connection pool wrapper with health checking
//!
//! Events are immutable once ingested. `occurred_at` (business time) is the
//! sole ordering and windowing key; `ingested_at`/`created_at` are
//! informational system time.

pub mod connection;
pub mod error;
pub mod models;
pub mod repository;

pub use connection::StorePool;
pub use error::{StoreError, StoreResult};
pub use models::*;
pub use repository::{EventSink, EventStore, PgEventStore};
