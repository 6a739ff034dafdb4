//! HTTP routes for admin endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::handlers::{
    delete_conversations, get_config, get_export, post_credit, put_fields, put_prompt,
    AdminHandlers,
};

pub fn admin_routes(handlers: AdminHandlers) -> Router {
    Router::new()
        .route("/config", get(get_config))
        .route("/fields", put(put_fields))
        .route("/prompt", put(put_prompt))
        .route("/conversations", delete(delete_conversations))
        .route("/conversations/:id/credit", post(post_credit))
        .route("/export.csv", get(get_export))
        .with_state(handlers)
}
