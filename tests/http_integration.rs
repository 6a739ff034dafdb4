//! HTTP surface tests, driven through the router with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::Router;
use http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use survey_engine::adapters::ai::MockModelBackend;
use survey_engine::adapters::document::InMemoryDocumentStore;
use survey_engine::adapters::http::{api_router, AdminHandlers, SurveyHandlers};
use survey_engine::adapters::queue::InMemoryTaskQueue;
use survey_engine::adapters::storage::{InMemoryConfigSource, InMemoryConversationStore};
use survey_engine::application::{
    AdminHandler, AttachDocumentHandler, ConversationLocks, EngineSettings,
    ProcessMessageHandler, SurveyEngine, UpdateProfileHandler,
};
use survey_engine::domain::foundation::ConversationId;
use survey_engine::domain::handoff::Job;
use survey_engine::domain::survey::{FieldRegistry, PromptTemplate, SurveyDefinition};
use survey_engine::ports::ConversationStore;

// =============================================================================
// Test Infrastructure
// =============================================================================

const MAX_ATTACHMENT_BYTES: usize = 1024;

struct TestApp {
    router: Router,
    store: InMemoryConversationStore,
    queue: InMemoryTaskQueue,
}

fn app(backend: MockModelBackend, start_tokens: i64) -> TestApp {
    let store = InMemoryConversationStore::new();
    let queue = InMemoryTaskQueue::new();
    let config = InMemoryConfigSource::new(
        SurveyDefinition::new(
            FieldRegistry::new(vec!["name".to_string(), "email".to_string()]),
            PromptTemplate::new("Collect:\n{data}").unwrap(),
        )
        .with_tracks(vec!["Backend".to_string(), "QA".to_string()]),
    );
    let locks = ConversationLocks::new();

    let engine = Arc::new(SurveyEngine::new(
        Arc::new(backend),
        Arc::new(queue.clone()),
        EngineSettings::default(),
    ));
    let survey = SurveyHandlers::new(
        Arc::new(ProcessMessageHandler::new(
            engine,
            Arc::new(store.clone()),
            Arc::new(config.clone()),
            locks.clone(),
            start_tokens,
        )),
        Arc::new(UpdateProfileHandler::new(
            Arc::new(store.clone()),
            Arc::new(config.clone()),
            locks.clone(),
            start_tokens,
        )),
        Arc::new(AttachDocumentHandler::new(
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(store.clone()),
            Arc::new(queue.clone()),
            locks.clone(),
            start_tokens,
        )),
    );
    let admin = AdminHandlers::new(Arc::new(AdminHandler::new(
        Arc::new(store.clone()),
        Arc::new(config),
        locks,
    )));

    TestApp {
        router: api_router(survey, admin, MAX_ATTACHMENT_BYTES),
        store,
        queue,
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn send_json(router: &Router, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, bytes) = send(router, request).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn send_text(router: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, bytes) = send(router, request).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn id(raw: &str) -> ConversationId {
    ConversationId::new(raw).unwrap()
}

// =============================================================================
// Conversation endpoints
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let app = app(MockModelBackend::new(), 100);
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let (status, body) = send(&app.router, request).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn message_returns_answer() {
    let backend = MockModelBackend::new()
        .with_set_field(0, "Ana", 10)
        .with_answer("What's your email?", 5);
    let app = app(backend, 100);

    let (status, body) = send_json(
        &app.router,
        Method::POST,
        "/conversations/42/messages",
        json!({"text": "I'm Ana", "display_name": "ana_dev"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"answer": "What's your email?"}));
    let state = app.store.get(&id("42")).await.unwrap().unwrap();
    assert_eq!(state.tokens_remaining, 85);
    assert_eq!(state.display_name.as_deref(), Some("ana_dev"));
}

#[tokio::test]
async fn exhausted_budget_is_reported_in_conversation_language() {
    let app = app(MockModelBackend::new(), 0);
    send_json(
        &app.router,
        Method::PUT,
        "/conversations/42/profile",
        json!({"language": "ru"}),
    )
    .await;

    let (status, body) = send_json(
        &app.router,
        Method::POST,
        "/conversations/42/messages",
        json!({"text": "hi"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "budget_exhausted");
    assert_eq!(body["message"], "Лимит этого диалога исчерпан.");
}

#[tokio::test]
async fn failed_turn_returns_localized_error() {
    let app = app(MockModelBackend::new().with_empty(3), 100);

    let (status, body) = send_json(
        &app.router,
        Method::POST,
        "/conversations/42/messages",
        json!({"text": "hi"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "TURN_FAILED");
    assert_eq!(body["message"], "Sorry, something went wrong. Please try again.");
}

#[tokio::test]
async fn profile_rejects_unknown_track() {
    let app = app(MockModelBackend::new(), 100);

    let (status, body) = send_json(
        &app.router,
        Method::PUT,
        "/conversations/42/profile",
        json!({"track": "Design"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, body) = send_json(
        &app.router,
        Method::PUT,
        "/conversations/42/profile",
        json!({"track": "QA", "display_name": "ana_dev"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["track"], "QA");
    assert_eq!(body["display_name"], "ana_dev");
    assert_eq!(body["tokens_remaining"], 100);
}

#[tokio::test]
async fn attachment_upload_enqueues_addendum_once() {
    let app = app(MockModelBackend::new(), 100);
    let upload = || {
        Request::builder()
            .method(Method::PUT)
            .uri("/conversations/42/attachment?file_name=cv.pdf")
            .header(header::CONTENT_TYPE, "application/pdf")
            .body(Body::from("%PDF-1.4"))
            .unwrap()
    };

    let (status, body) = send(&app.router, upload()).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["first"], true);
    assert_eq!(body["message"], "Thanks, your file has been received.");

    let (_, body) = send(&app.router, upload()).await;
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["first"], false);

    let jobs = app.queue.jobs().await;
    assert_eq!(jobs.len(), 1);
    assert!(matches!(jobs[0], Job::DeliverAddendum(_)));
}

#[tokio::test]
async fn attachment_requires_file_name_and_size_limit() {
    let app = app(MockModelBackend::new(), 100);

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/conversations/42/attachment")
        .body(Body::from("data"))
        .unwrap();
    let (status, _) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/conversations/42/attachment?file_name=big.bin")
        .body(Body::from(vec![0u8; MAX_ATTACHMENT_BYTES + 1]))
        .unwrap();
    let (status, _) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

// =============================================================================
// Admin endpoints
// =============================================================================

#[tokio::test]
async fn admin_replaces_fields_and_clears_conversations() {
    let app = app(MockModelBackend::new().with_answer("Hi", 1), 100);
    send_json(
        &app.router,
        Method::POST,
        "/conversations/42/messages",
        json!({"text": "hi"}),
    )
    .await;

    let (status, body) = send_text(&app.router, Method::PUT, "/admin/fields", "name\nphone\ncity\n").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fields"], json!(["name", "phone", "city"]));
    assert_eq!(app.store.state_count().await, 0);

    let (status, _) = send_text(&app.router, Method::PUT, "/admin/fields", "\n\n").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_prompt_requires_placeholder() {
    let app = app(MockModelBackend::new(), 100);

    let (status, _) = send_text(&app.router, Method::PUT, "/admin/prompt", "no placeholder").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send_text(&app.router, Method::PUT, "/admin/prompt", "Ask:\n{data}").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prompt"], "Ask:\n{data}");
}

#[tokio::test]
async fn admin_credit_tops_up_existing_conversation() {
    let app = app(MockModelBackend::new().with_answer("Hi", 30), 10);
    send_json(
        &app.router,
        Method::POST,
        "/conversations/42/messages",
        json!({"text": "hi"}),
    )
    .await;

    let (status, body) = send_json(
        &app.router,
        Method::POST,
        "/admin/conversations/42/credit",
        json!({"amount": 100}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tokens_remaining"], 80);

    let (status, _) = send_json(
        &app.router,
        Method::POST,
        "/admin/conversations/missing/credit",
        json!({"amount": 100}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(
        &app.router,
        Method::POST,
        "/admin/conversations/42/credit",
        json!({"amount": 0}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_export_and_clear() {
    let backend = MockModelBackend::new().with_set_field(0, "Ana", 1).with_answer("ok", 1);
    let app = app(backend, 100);
    send_json(
        &app.router,
        Method::POST,
        "/conversations/42/messages",
        json!({"text": "I'm Ana", "display_name": "ana_dev"}),
    )
    .await;

    let request = Request::builder().uri("/admin/export.csv").body(Body::empty()).unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(
        String::from_utf8(body.to_vec()).unwrap(),
        "username,name,email\r\n@ana_dev,Ana,\r\n"
    );

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/admin/conversations")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.store.state_count().await, 0);
}
