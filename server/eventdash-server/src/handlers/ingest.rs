//! Event ingestion endpoint
//!
//! Accepts one event per request, validates it, and queues it on the
//! buffered writer. Responds 202 once queued; the actual insert happens
//! asynchronously in batches.

use std::net::IpAddr;
use std::str::FromStr;

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use event_store::{EventType, NewEvent, Severity};
use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{api_success, ApiError, ApiResponse, ApiResult};
use crate::ingest::EnqueueError;
use crate::server::EventDashServer;
use crate::validation::RequestValidation;
use crate::{validate_field, validate_required};

/// Incoming event payload
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IngestEventRequest {
    #[schema(example = "auth_attempt")]
    pub event_type: String,
    #[schema(example = "medium")]
    pub severity: String,
    pub user_id: Option<String>,
    #[schema(example = "203.0.113.7")]
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub endpoint: Option<String>,
    pub http_method: Option<String>,
    pub status_code: Option<i32>,
    pub metadata: Option<serde_json::Value>,
    /// Business time; defaults to insert time when omitted
    pub occurred_at: Option<DateTime<Utc>>,
    pub ingested_at: Option<DateTime<Utc>>,
}

/// Acknowledgement for a queued event
#[derive(Debug, Serialize, ToSchema)]
pub struct IngestAccepted {
    #[schema(example = "queued")]
    pub status: String,
}

impl RequestValidation for IngestEventRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_required!(self.event_type, "event_type is required");
        validate_required!(self.severity, "severity is required");
        validate_required!(self.ip_address, "ip_address is required");

        validate_field!(
            EventType::from_str(&self.event_type).is_ok(),
            format!(
                "event_type must be one of: {}",
                EventType::ALL.map(|t| t.as_str()).join(", ")
            )
        );
        validate_field!(
            Severity::from_str(&self.severity).is_ok(),
            format!(
                "severity must be one of: {}",
                Severity::ALL.map(|s| s.as_str()).join(", ")
            )
        );
        validate_field!(
            self.ip_address.parse::<IpAddr>().is_ok(),
            "invalid ip_address"
        );

        Ok(())
    }
}

impl IngestEventRequest {
    /// Convert a validated request into the insert shape.
    fn into_new_event(self) -> Result<NewEvent, ApiError> {
        let event_type = EventType::from_str(&self.event_type)
            .map_err(|e| ApiError::validation(e.to_string()))?;
        let severity =
            Severity::from_str(&self.severity).map_err(|e| ApiError::validation(e.to_string()))?;
        let ip_address: IpAddr = self
            .ip_address
            .parse()
            .map_err(|_| ApiError::validation("invalid ip_address"))?;

        Ok(NewEvent {
            event_type,
            severity,
            user_id: self.user_id,
            ip_address: IpNetwork::from(ip_address),
            user_agent: self.user_agent,
            endpoint: self.endpoint,
            http_method: self.http_method,
            status_code: self.status_code,
            metadata: self.metadata,
            occurred_at: self.occurred_at,
            ingested_at: self.ingested_at,
        })
    }
}

/// Queue one event for ingestion
#[utoipa::path(
    post,
    path = "/api/v1/ingest",
    tag = "ingest",
    request_body = IngestEventRequest,
    responses(
        (status = 202, description = "Event queued for ingestion", body = IngestAccepted),
        (status = 400, description = "Invalid event payload", body = crate::error::ApiErrorResponse),
        (status = 503, description = "Ingest buffer full, try again later", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn ingest_event(
    State(server): State<EventDashServer>,
    Json(request): Json<IngestEventRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<IngestAccepted>>)> {
    request.validate()?;
    let event = request.into_new_event()?;

    match server.ingest.enqueue(event) {
        Ok(()) => Ok((
            StatusCode::ACCEPTED,
            Json(api_success(IngestAccepted {
                status: "queued".to_string(),
            })),
        )),
        Err(EnqueueError::Full) => Err(ApiError::service_unavailable(
            "Ingest buffer full, try again later",
        )),
        Err(EnqueueError::Closed) => Err(ApiError::internal("Ingest worker unavailable")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> IngestEventRequest {
        IngestEventRequest {
            event_type: "auth_attempt".to_string(),
            severity: "medium".to_string(),
            user_id: Some("user-42".to_string()),
            ip_address: "203.0.113.7".to_string(),
            user_agent: Some("curl/8.4".to_string()),
            endpoint: Some("/api/auth/login".to_string()),
            http_method: Some("POST".to_string()),
            status_code: Some(401),
            metadata: Some(serde_json::json!({ "success": false, "provider": "local" })),
            occurred_at: None,
            ingested_at: None,
        }
    }

    #[test]
    fn valid_request_passes_and_converts() {
        let request = valid_request();
        request.validate().unwrap();

        let event = request.into_new_event().unwrap();
        assert_eq!(event.event_type, EventType::AuthAttempt);
        assert_eq!(event.severity, Severity::Medium);
        assert_eq!(event.ip_address.to_string(), "203.0.113.7/32");
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        let mut request = valid_request();
        request.event_type = String::new();
        assert!(request.validate().is_err());

        let mut request = valid_request();
        request.severity = "  ".to_string();
        assert!(request.validate().is_err());

        let mut request = valid_request();
        request.ip_address = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn unknown_enum_values_get_descriptive_messages() {
        let mut request = valid_request();
        request.event_type = "page_view".to_string();
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("auth_attempt"));

        let mut request = valid_request();
        request.severity = "fatal".to_string();
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("critical"));
    }

    #[test]
    fn malformed_ip_addresses_are_rejected() {
        let mut request = valid_request();
        request.ip_address = "not-an-ip".to_string();
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("ip_address"));
    }

    #[test]
    fn ipv6_addresses_are_accepted() {
        let mut request = valid_request();
        request.ip_address = "2001:db8::1".to_string();
        request.validate().unwrap();
        let event = request.into_new_event().unwrap();
        assert!(event.ip_address.is_ipv6());
    }
}
