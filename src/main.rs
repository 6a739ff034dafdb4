//! Survey engine server binary.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use survey_engine::adapters::ai::{OpenAIConfig, OpenAIProvider};
use survey_engine::adapters::crm::{
    HttpRecordSink, HttpTrackCatalog, InMemoryRecordSink, StaticTrackCatalog,
};
use survey_engine::adapters::document::LocalDocumentStore;
use survey_engine::adapters::http::{api_router, AdminHandlers, SurveyHandlers};
use survey_engine::adapters::notifier::{InMemoryNotifier, WebhookNotifier};
use survey_engine::adapters::postgres::{self, PostgresConfigSource, PostgresConversationStore};
use survey_engine::adapters::queue::TokioTaskQueue;
use survey_engine::adapters::storage::{FileConfigSource, FileConversationStore};
use survey_engine::application::{
    spawn_track_refresh, AdminHandler, AttachDocumentHandler, ConversationLocks,
    DeliverRecordHandler, EngineSettings, GenerateDocumentHandler, JobDispatcher,
    ProcessMessageHandler, RefreshTracksHandler, SurveyEngine, UpdateProfileHandler,
};
use survey_engine::config::AppConfig;
use survey_engine::ports::{
    ChatNotifier, ConfigSource, ConversationStore, DocumentStore, ModelBackend, RecordSink,
    TaskQueue, TrackCatalog,
};

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if config.server.json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_logging(&config);
    config.validate().context("invalid configuration")?;

    let seed = config
        .survey
        .seed_definition()
        .context("invalid default survey definition")?;

    // Persistence
    let (store, config_source): (Arc<dyn ConversationStore>, Arc<dyn ConfigSource>) =
        match &config.database {
            Some(database) => {
                let pool = postgres::connect(database).await?;
                tracing::info!("using PostgreSQL persistence");
                (
                    Arc::new(PostgresConversationStore::new(pool.clone())),
                    Arc::new(PostgresConfigSource::open(pool, &seed).await?),
                )
            }
            None => {
                tracing::info!(
                    dir = %config.storage.conversations_dir.display(),
                    "using file persistence"
                );
                (
                    Arc::new(FileConversationStore::new(&config.storage.conversations_dir)),
                    Arc::new(FileConfigSource::open(&config.storage.definition_file, seed).await?),
                )
            }
        };
    let documents: Arc<dyn DocumentStore> = Arc::new(LocalDocumentStore::new(
        &config.storage.documents_dir,
        config.storage.max_attachment_bytes,
    ));

    // Model backend
    let openai_config = OpenAIConfig::from_app_config(&config.ai)
        .context("ai.openai_api_key is required")?;
    let backend: Arc<dyn ModelBackend> = Arc::new(OpenAIProvider::new(openai_config)?);
    tracing::info!(model = %backend.model_name(), "model backend ready");

    // Outbound integrations
    let http_client = reqwest::Client::builder()
        .timeout(config.crm.timeout())
        .build()
        .context("failed to build HTTP client")?;

    let sink: Arc<dyn RecordSink> = if config.crm.is_enabled() {
        Arc::new(HttpRecordSink::from_config(&config.crm)?)
    } else {
        tracing::warn!("CRM not configured, records are only logged");
        Arc::new(InMemoryRecordSink::new())
    };
    let catalog: Arc<dyn TrackCatalog> = match &config.crm.tracks_url {
        Some(url) => Arc::new(HttpTrackCatalog::new(url.clone(), http_client.clone())),
        None => Arc::new(StaticTrackCatalog::default()),
    };
    let notifier: Arc<dyn ChatNotifier> = match &config.notifier.webhook_url {
        Some(url) => Arc::new(WebhookNotifier::new(url.clone(), http_client)),
        None => {
            tracing::warn!("notifier webhook not configured, documents are not delivered");
            Arc::new(InMemoryNotifier::new())
        }
    };

    // Background jobs
    let (task_queue, worker) =
        TokioTaskQueue::channel(config.queue.retry_policies(), config.queue.capacity);
    let queue: Arc<dyn TaskQueue> = Arc::new(task_queue);
    let locks = ConversationLocks::new();

    let dispatcher = JobDispatcher::new(
        DeliverRecordHandler::new(
            backend.clone(),
            sink,
            documents.clone(),
            store.clone(),
            queue.clone(),
            locks.clone(),
        ),
        GenerateDocumentHandler::new(backend.clone(), documents.clone(), notifier),
        RefreshTracksHandler::new(catalog, config_source.clone()),
    );
    tokio::spawn(worker.run(Arc::new(dispatcher)));
    spawn_track_refresh(queue.clone(), config.queue.refresh_interval());

    // HTTP
    let start_tokens = config.survey.start_tokens;
    let engine = Arc::new(SurveyEngine::new(
        backend,
        queue.clone(),
        EngineSettings {
            history_limit: config.survey.history_limit,
            max_rounds: config.survey.max_rounds,
        },
    ));
    let survey_handlers = SurveyHandlers::new(
        Arc::new(ProcessMessageHandler::new(
            engine,
            store.clone(),
            config_source.clone(),
            locks.clone(),
            start_tokens,
        )),
        Arc::new(UpdateProfileHandler::new(
            store.clone(),
            config_source.clone(),
            locks.clone(),
            start_tokens,
        )),
        Arc::new(AttachDocumentHandler::new(
            documents,
            store.clone(),
            queue,
            locks.clone(),
            start_tokens,
        )),
    );
    let admin_handlers = AdminHandlers::new(Arc::new(AdminHandler::new(
        store,
        config_source,
        locks,
    )));

    let app = api_router(
        survey_handlers,
        admin_handlers,
        config.storage.max_attachment_bytes,
    )
    .layer(TimeoutLayer::new(config.server.request_timeout()))
    .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%addr, "survey engine listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("survey engine stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
