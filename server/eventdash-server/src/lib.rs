//! EventDash Server - security event dashboard API
//!
//! This library provides the HTTP boundary of EventDash: paginated event
//! listing, 24-hour window statistics with previous-window comparison, a
//! severity time series, and a buffered ingestion endpoint. Credential
//! handling is delegated to an external identity service; the server only
//! gates dashboard routes on an existing session principal.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod ingest;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use error::*;
pub use server::{EventDashServer, ServerConfig};

use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create the main application router with all routes and middleware
pub fn create_app(server: EventDashServer) -> Router {
    routes::create_routes()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::create_cors_layer()),
        )
        .with_state(server)
}
