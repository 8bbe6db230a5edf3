// Event store models
use chrono::{DateTime, NaiveDate, Utc};
use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Raised when a stored enum column holds a value outside the closed set.
#[derive(Debug, Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Closed set of event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    AuthAttempt,
    ApiCall,
    AdminAction,
    DataAccess,
    ConfigChange,
}

impl EventType {
    pub const ALL: [EventType; 5] = [
        EventType::AuthAttempt,
        EventType::ApiCall,
        EventType::AdminAction,
        EventType::DataAccess,
        EventType::ConfigChange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::AuthAttempt => "auth_attempt",
            EventType::ApiCall => "api_call",
            EventType::AdminAction => "admin_action",
            EventType::DataAccess => "data_access",
            EventType::ConfigChange => "config_change",
        }
    }
}

impl TryFrom<String> for EventType {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "auth_attempt" => Ok(EventType::AuthAttempt),
            "api_call" => Ok(EventType::ApiCall),
            "admin_action" => Ok(EventType::AdminAction),
            "data_access" => Ok(EventType::DataAccess),
            "config_change" => Ok(EventType::ConfigChange),
            _ => Err(UnknownVariant {
                kind: "event_type",
                value,
            }),
        }
    }
}

impl std::str::FromStr for EventType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::try_from(s.to_string())
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordinal risk classification: low < medium < high < critical.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            _ => Err(UnknownVariant {
                kind: "severity",
                value,
            }),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::try_from(s.to_string())
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable audit/log record as stored in the `events` relation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Event {
    pub id: Uuid,
    #[sqlx(try_from = "String")]
    pub event_type: EventType,
    #[sqlx(try_from = "String")]
    pub severity: Severity,
    /// Acting principal; None means an anonymous/unauthenticated actor.
    pub user_id: Option<String>,
    #[schema(value_type = String, example = "203.0.113.7/32")]
    pub ip_address: IpNetwork,
    pub user_agent: Option<String>,
    pub endpoint: Option<String>,
    pub http_method: Option<String>,
    pub status_code: Option<i32>,
    /// Open-ended structure whose shape depends on `event_type`. The
    /// aggregation core never inspects its contents.
    pub metadata: Option<serde_json::Value>,
    /// Business time; sole ordering and windowing key.
    pub occurred_at: DateTime<Utc>,
    pub ingested_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for ingestion and seeding. Missing id/timestamps are filled
/// at insert time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub event_type: EventType,
    pub severity: Severity,
    pub user_id: Option<String>,
    pub ip_address: IpNetwork,
    pub user_agent: Option<String>,
    pub endpoint: Option<String>,
    pub http_method: Option<String>,
    pub status_code: Option<i32>,
    pub metadata: Option<serde_json::Value>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub ingested_at: Option<DateTime<Utc>>,
}

/// Aggregate counts for one time window.
///
/// `warnings` counts medium-severity events, `errors` counts high and
/// critical ones, `unique_users` counts distinct non-null user ids (anonymous
/// events are excluded).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct WindowStats {
    pub total_events: i64,
    pub warnings: i64,
    pub errors: i64,
    pub unique_users: i64,
}

/// Per-calendar-date severity counts, bucketed by the database's own DATE()
/// truncation of `occurred_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct DailySeverityCount {
    #[schema(value_type = String, example = "2026-08-26")]
    pub date: NaiveDate,
    pub low: i64,
    pub medium: i64,
    pub high: i64,
    pub critical: i64,
}
