//! HTTP routes for conversation endpoints.

use axum::{
    extract::DefaultBodyLimit,
    routing::{post, put},
    Router,
};

use super::handlers::{post_message, put_attachment, put_profile, SurveyHandlers};

/// Creates the conversation router. Attachment bodies are capped at `max_attachment_bytes`.
pub fn survey_routes(handlers: SurveyHandlers, max_attachment_bytes: usize) -> Router {
    Router::new()
        .route("/:id/messages", post(post_message))
        .route("/:id/profile", put(put_profile))
        .route(
            "/:id/attachment",
            put(put_attachment).layer(DefaultBodyLimit::max(max_attachment_bytes)),
        )
        .with_state(handlers)
}
