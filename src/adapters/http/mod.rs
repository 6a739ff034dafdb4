//! HTTP adapters - REST API implementations.
//!
//! - `survey` - Turns, profile updates and attachments per conversation
//! - `admin` - Survey configuration, credits, clearing and CSV export
//! - `health` - Liveness probe

pub mod admin;
mod error_response;
pub mod health;
pub mod survey;

use axum::Router;

pub use admin::{admin_routes, AdminHandlers};
pub use error_response::ErrorResponse;
pub use health::health_routes;
pub use survey::{survey_routes, SurveyHandlers};

/// Assembles the full API router.
pub fn api_router(
    survey: SurveyHandlers,
    admin: AdminHandlers,
    max_attachment_bytes: usize,
) -> Router {
    Router::new()
        .merge(health_routes())
        .nest("/conversations", survey_routes(survey, max_attachment_bytes))
        .nest("/admin", admin_routes(admin))
}
