//! HTTP handlers for conversation endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{
    AttachDocumentCommand, AttachDocumentHandler, AttachError, ProcessMessageCommand,
    ProcessMessageHandler, ProfileError, TurnError, TurnOutcome, UpdateProfileCommand,
    UpdateProfileHandler,
};
use crate::domain::foundation::ConversationId;
use crate::domain::survey::{text, TextKey};
use crate::ports::{DocumentStoreError, ModelError};

use crate::adapters::http::ErrorResponse;
use super::dto::{
    AttachmentQuery, AttachmentResponse, MessageRequest, MessageResponse, ProfileRequest,
    ProfileResponse,
};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SurveyHandlers {
    message_handler: Arc<ProcessMessageHandler>,
    profile_handler: Arc<UpdateProfileHandler>,
    attach_handler: Arc<AttachDocumentHandler>,
}

impl SurveyHandlers {
    pub fn new(
        message_handler: Arc<ProcessMessageHandler>,
        profile_handler: Arc<UpdateProfileHandler>,
        attach_handler: Arc<AttachDocumentHandler>,
    ) -> Self {
        Self {
            message_handler,
            profile_handler,
            attach_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /conversations/:id/messages - Run one turn
pub async fn post_message(
    State(handlers): State<SurveyHandlers>,
    Path(conversation_id): Path<String>,
    Json(req): Json<MessageRequest>,
) -> Response {
    let conversation_id = match parse_conversation_id(conversation_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = ProcessMessageCommand {
        conversation_id,
        text: req.text,
        display_name: req.display_name,
    };

    match handlers.message_handler.handle(cmd).await {
        Ok(TurnOutcome::Answered(answer)) => {
            (StatusCode::OK, Json(MessageResponse::Answer { answer })).into_response()
        }
        Ok(TurnOutcome::BudgetExhausted { language }) => {
            let message = text(TextKey::BudgetExhausted, language.as_deref());
            (StatusCode::OK, Json(MessageResponse::budget_exhausted(message))).into_response()
        }
        Err(e) => handle_turn_error(e),
    }
}

/// PUT /conversations/:id/profile - Set language, track and display name
pub async fn put_profile(
    State(handlers): State<SurveyHandlers>,
    Path(conversation_id): Path<String>,
    Json(req): Json<ProfileRequest>,
) -> Response {
    let conversation_id = match parse_conversation_id(conversation_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = UpdateProfileCommand {
        language: req.language,
        track: req.track,
        display_name: req.display_name,
    };

    match handlers.profile_handler.handle(&conversation_id, cmd).await {
        Ok(state) => {
            let response = ProfileResponse::from_state(conversation_id.as_str(), &state);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(ProfileError::UnknownTrack(track)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(format!("Unknown track: {}", track))),
        )
            .into_response(),
        Err(ProfileError::Store(e)) => {
            tracing::error!(conversation_id = %conversation_id, error = %e, "profile update failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal(e.to_string())),
            )
                .into_response()
        }
    }
}

/// PUT /conversations/:id/attachment?file_name= - Upload a file as the raw body
pub async fn put_attachment(
    State(handlers): State<SurveyHandlers>,
    Path(conversation_id): Path<String>,
    Query(query): Query<AttachmentQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let conversation_id = match parse_conversation_id(conversation_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let file_name = match query.file_name.filter(|name| !name.trim().is_empty()) {
        Some(name) => name,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("file_name query parameter is required")),
            )
                .into_response()
        }
    };

    if body.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Attachment body is empty")),
        )
            .into_response();
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();

    let cmd = AttachDocumentCommand {
        conversation_id,
        file_name,
        content_type,
        bytes: body.to_vec(),
    };

    match handlers.attach_handler.handle(cmd).await {
        Ok(result) => {
            let message = text(TextKey::AttachmentReceived, result.language.as_deref());
            let response = AttachmentResponse::new(&result.key, result.first, message);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_attach_error(e),
    }
}

fn parse_conversation_id(raw: String) -> Result<ConversationId, Response> {
    ConversationId::new(raw).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(format!("Invalid conversation ID: {}", e))),
        )
            .into_response()
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_turn_error(error: TurnError) -> Response {
    tracing::error!(error = %error, "turn failed");
    let status = match &error {
        TurnError::Model(e) if e.is_retryable() => StatusCode::SERVICE_UNAVAILABLE,
        TurnError::Model(ModelError::AuthenticationFailed) | TurnError::Store(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        TurnError::Model(_) | TurnError::Survey(_) => StatusCode::BAD_GATEWAY,
    };
    let body = ErrorResponse::turn_failed(text(TextKey::TurnFailed, None))
        .with_details(serde_json::json!({ "reason": error.to_string() }));
    (status, Json(body)).into_response()
}

fn handle_attach_error(error: AttachError) -> Response {
    match error {
        AttachError::Document(DocumentStoreError::TooLarge { size, max }) => (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(ErrorResponse::payload_too_large(format!(
                "Attachment of {} bytes exceeds the {} byte limit",
                size, max
            ))),
        )
            .into_response(),
        AttachError::Document(DocumentStoreError::InvalidName(name)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(format!("Invalid file name: {}", name))),
        )
            .into_response(),
        AttachError::Queue(e) => {
            tracing::error!(error = %e, "attachment follow-up could not be queued");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::service_unavailable(e.to_string())),
            )
                .into_response()
        }
        other => {
            tracing::error!(error = %other, "attachment failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal(other.to_string())),
            )
                .into_response()
        }
    }
}
