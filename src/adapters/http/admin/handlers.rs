//! HTTP handlers for admin endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::ErrorResponse;
use crate::application::{AdminError, AdminHandler};
use crate::domain::foundation::ConversationId;

use super::dto::{ConfigResponse, CreditRequest, CreditResponse};

const EXPORT_FILE_NAME: &str = "survey-export.csv";

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AdminHandlers {
    admin_handler: Arc<AdminHandler>,
}

impl AdminHandlers {
    pub fn new(admin_handler: Arc<AdminHandler>) -> Self {
        Self { admin_handler }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /admin/config - Current fields, prompt and tracks
pub async fn get_config(State(handlers): State<AdminHandlers>) -> Response {
    match handlers.admin_handler.config().await {
        Ok(definition) => (StatusCode::OK, Json(ConfigResponse::from(definition))).into_response(),
        Err(e) => handle_admin_error(e),
    }
}

/// PUT /admin/fields - Replace the field list (plain text, one per line)
pub async fn put_fields(State(handlers): State<AdminHandlers>, body: String) -> Response {
    match handlers.admin_handler.set_fields(&body).await {
        Ok(_) => get_config(State(handlers)).await,
        Err(e) => handle_admin_error(e),
    }
}

/// PUT /admin/prompt - Replace the prompt template (plain text)
pub async fn put_prompt(State(handlers): State<AdminHandlers>, body: String) -> Response {
    match handlers.admin_handler.set_prompt(&body).await {
        Ok(()) => get_config(State(handlers)).await,
        Err(e) => handle_admin_error(e),
    }
}

/// POST /admin/conversations/:id/credit - Top up a conversation's tokens
pub async fn post_credit(
    State(handlers): State<AdminHandlers>,
    Path(conversation_id): Path<String>,
    Json(req): Json<CreditRequest>,
) -> Response {
    let conversation_id = match ConversationId::new(conversation_id) {
        Ok(id) => id,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(format!("Invalid conversation ID: {}", e))),
            )
                .into_response()
        }
    };

    match handlers
        .admin_handler
        .credit_tokens(&conversation_id, req.amount)
        .await
    {
        Ok(tokens_remaining) => {
            let response = CreditResponse {
                conversation_id: conversation_id.to_string(),
                tokens_remaining,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_admin_error(e),
    }
}

/// DELETE /admin/conversations - Delete all conversation state
pub async fn delete_conversations(State(handlers): State<AdminHandlers>) -> Response {
    match handlers.admin_handler.clear().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handle_admin_error(e),
    }
}

/// GET /admin/export.csv - Download collected answers
pub async fn get_export(State(handlers): State<AdminHandlers>) -> Response {
    match handlers.admin_handler.export_csv().await {
        Ok(csv) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
                ),
            ],
            csv,
        )
            .into_response(),
        Err(e) => handle_admin_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_admin_error(error: AdminError) -> Response {
    match error {
        AdminError::Validation(e) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(e.to_string())),
        )
            .into_response(),
        AdminError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Conversation", id.as_str())),
        )
            .into_response(),
        AdminError::Store(e) => {
            tracing::error!(error = %e, "admin operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal(e.to_string())),
            )
                .into_response()
        }
    }
}
