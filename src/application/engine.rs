//! SurveyEngine - The bounded dialogue loop of a single turn.
//!
//! Each round renders the prompt, calls the model and debits the reported
//! usage. A text answer ends the turn. A directive batch is applied, checked
//! for the completion edge and followed by another round. The loop gives up
//! after `max_rounds` directive rounds.
//!
//! A full-record job the queue refused stays pending on the state and is
//! offered again at the start of the next turn.

use std::sync::Arc;

use crate::domain::foundation::ConversationId;
use crate::domain::handoff::{FullRecordJob, Job};
use crate::domain::survey::{
    apply_batch, set_field_tool, CompletionCheck, InterviewState, PromptBuilder, SurveyDefinition,
    SurveyError,
};
use crate::ports::{ModelBackend, ModelError, ModelOutcome, ModelRequest, StoreError, TaskQueue};

/// Errors that end a turn without an answer.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error(transparent)]
    Survey(#[from] SurveyError),

    #[error("model backend error: {0}")]
    Model(#[from] ModelError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Loop bounds for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub history_limit: usize,
    pub max_rounds: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            history_limit: 7_000,
            max_rounds: 3,
        }
    }
}

pub struct SurveyEngine {
    backend: Arc<dyn ModelBackend>,
    queue: Arc<dyn TaskQueue>,
    prompt: PromptBuilder,
    max_rounds: u32,
}

impl SurveyEngine {
    pub fn new(
        backend: Arc<dyn ModelBackend>,
        queue: Arc<dyn TaskQueue>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            backend,
            queue,
            prompt: PromptBuilder::new(settings.history_limit),
            max_rounds: settings.max_rounds,
        }
    }

    /// Runs rounds until the model answers in text.
    ///
    /// `state` already holds the user's utterance. It is mutated in place,
    /// including on error, and the caller persists it either way.
    pub async fn advance(
        &self,
        conversation_id: &ConversationId,
        definition: &SurveyDefinition,
        state: &mut InterviewState,
    ) -> Result<String, TurnError> {
        let registry = &definition.fields;
        let tool = set_field_tool(registry);
        let mut round = 0;

        if state.delivery_pending {
            self.enqueue_full_record(conversation_id, definition, state).await;
        }

        loop {
            if round >= self.max_rounds {
                tracing::warn!(conversation_id = %conversation_id, rounds = round, "directive loop exceeded");
                return Err(SurveyError::loop_exceeded(round).into());
            }

            let mut request = ModelRequest::new(self.prompt.build(registry, &definition.prompt, state));
            if let Some(tool) = &tool {
                request = request.with_tool(tool.clone());
            }

            let reply = self.backend.complete(request).await?;
            let balance = state.debit(i64::from(reply.usage.total_tokens));
            tracing::debug!(
                conversation_id = %conversation_id,
                round,
                tokens = reply.usage.total_tokens,
                balance,
                "model replied"
            );

            match reply.outcome {
                ModelOutcome::Answer(text) => {
                    state.push_assistant(text.clone());
                    return Ok(text);
                }
                ModelOutcome::Directives { content, calls } => {
                    let check = CompletionCheck::begin(registry, state);
                    let report = apply_batch(registry, state, content, calls);
                    for (call_id, rejection) in &report.rejected {
                        tracing::warn!(
                            conversation_id = %conversation_id,
                            call_id = %call_id,
                            reason = %rejection,
                            "directive rejected"
                        );
                    }
                    if check.finish(registry, state) {
                        self.enqueue_full_record(conversation_id, definition, state).await;
                    }
                    round += 1;
                }
                ModelOutcome::Empty => {
                    tracing::warn!(conversation_id = %conversation_id, round, "model returned nothing");
                    return Err(SurveyError::EmptyAnswer.into());
                }
            }
        }
    }

    async fn enqueue_full_record(
        &self,
        conversation_id: &ConversationId,
        definition: &SurveyDefinition,
        state: &mut InterviewState,
    ) {
        let job = FullRecordJob::snapshot(conversation_id.clone(), &definition.fields, state);
        match self.queue.enqueue(Job::DeliverFullRecord(job)).await {
            Ok(job_id) => {
                state.delivery_pending = false;
                tracing::info!(conversation_id = %conversation_id, job_id = %job_id, "survey completed")
            }
            Err(e) => {
                state.delivery_pending = true;
                tracing::error!(
                    conversation_id = %conversation_id,
                    error = %e,
                    "failed to enqueue full record, will retry next turn"
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockError, MockModelBackend};
    use crate::adapters::queue::InMemoryTaskQueue;
    use crate::domain::survey::{FieldRegistry, PromptTemplate, ToolCall, SET_FIELD_TOOL};
    use crate::domain::foundation::JobId;
    use crate::domain::handoff::FailedJob;
    use crate::ports::{ModelReply, QueueError, TokenUsage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Refuses the first `refusals` jobs, then records them.
    struct RefusingQueue {
        refusals: AtomicUsize,
        inner: InMemoryTaskQueue,
    }

    #[async_trait::async_trait]
    impl TaskQueue for RefusingQueue {
        async fn enqueue(&self, job: Job) -> Result<JobId, QueueError> {
            if self
                .refusals
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(QueueError::Full);
            }
            self.inner.enqueue(job).await
        }

        async fn failures(&self) -> Vec<FailedJob> {
            Vec::new()
        }
    }

    fn definition() -> SurveyDefinition {
        SurveyDefinition::new(
            FieldRegistry::new(vec!["name".to_string(), "email".to_string()]),
            PromptTemplate::new("Collect:\n{data}").unwrap(),
        )
    }

    fn id() -> ConversationId {
        ConversationId::new("42").unwrap()
    }

    fn engine(backend: &MockModelBackend, queue: &InMemoryTaskQueue) -> SurveyEngine {
        SurveyEngine::new(
            Arc::new(backend.clone()),
            Arc::new(queue.clone()),
            EngineSettings::default(),
        )
    }

    fn user_state(text: &str) -> InterviewState {
        let mut state = InterviewState::new(100);
        state.push_user(text);
        state
    }

    #[tokio::test]
    async fn answer_is_recorded_and_debited() {
        let backend = MockModelBackend::new().with_answer("Hi! What's your name?", 7);
        let queue = InMemoryTaskQueue::new();
        let mut state = user_state("hello");

        let answer = engine(&backend, &queue)
            .advance(&id(), &definition(), &mut state)
            .await
            .unwrap();

        assert_eq!(answer, "Hi! What's your name?");
        assert_eq!(state.tokens_remaining, 93);
        assert_eq!(state.history.last().unwrap().content.as_deref(), Some(answer.as_str()));
        assert!(queue.is_empty().await);
    }

    #[tokio::test]
    async fn request_offers_set_field_tool() {
        let backend = MockModelBackend::new().with_answer("ok", 1);
        let queue = InMemoryTaskQueue::new();
        let mut state = user_state("hello");

        engine(&backend, &queue)
            .advance(&id(), &definition(), &mut state)
            .await
            .unwrap();

        let calls = backend.get_calls();
        assert_eq!(calls[0].tools.len(), 1);
        assert_eq!(calls[0].tools[0].name(), SET_FIELD_TOOL);
        assert!(calls[0].messages[0].content.as_deref().unwrap().contains("[0] - name"));
    }

    #[tokio::test]
    async fn empty_registry_sends_no_tools() {
        let backend = MockModelBackend::new().with_answer("ok", 1);
        let queue = InMemoryTaskQueue::new();
        let definition = SurveyDefinition::new(
            FieldRegistry::default(),
            PromptTemplate::new("{data}").unwrap(),
        );
        let mut state = user_state("hello");

        engine(&backend, &queue)
            .advance(&id(), &definition, &mut state)
            .await
            .unwrap();

        assert!(backend.get_calls()[0].tools.is_empty());
    }

    #[tokio::test]
    async fn directives_loop_until_bound() {
        let call = ToolCall::new("c", SET_FIELD_TOOL, r#"{"index":0,"value":"Ana"}"#);
        let backend = MockModelBackend::new()
            .with_fallback(ModelReply::directives(vec![call], TokenUsage::total(1)));
        let queue = InMemoryTaskQueue::new();
        let mut state = user_state("hello");

        let result = engine(&backend, &queue)
            .advance(&id(), &definition(), &mut state)
            .await;

        assert!(matches!(
            result,
            Err(TurnError::Survey(SurveyError::LoopExceeded { rounds: 3 }))
        ));
        assert_eq!(backend.call_count(), 3);
        assert_eq!(state.tokens_remaining, 97);
        assert_eq!(state.field_value(0), Some("Ana"));
    }

    #[tokio::test]
    async fn empty_reply_fails_after_debit() {
        let backend = MockModelBackend::new().with_empty(4);
        let queue = InMemoryTaskQueue::new();
        let mut state = user_state("hello");

        let result = engine(&backend, &queue)
            .advance(&id(), &definition(), &mut state)
            .await;

        assert!(matches!(result, Err(TurnError::Survey(SurveyError::EmptyAnswer))));
        assert_eq!(state.tokens_remaining, 96);
    }

    #[tokio::test]
    async fn completing_batch_enqueues_one_full_record() {
        let calls = vec![
            ToolCall::new("a", SET_FIELD_TOOL, r#"{"index":0,"value":"Ana"}"#),
            ToolCall::new("b", SET_FIELD_TOOL, r#"{"index":1,"value":"a@b.com"}"#),
        ];
        let backend = MockModelBackend::new()
            .with_directives(calls, 10)
            .with_answer("Thanks!", 2);
        let queue = InMemoryTaskQueue::new();
        let mut state = user_state("Ana, a@b.com");
        state.display_name = Some("ana_dev".to_string());

        engine(&backend, &queue)
            .advance(&id(), &definition(), &mut state)
            .await
            .unwrap();

        let jobs = queue.jobs().await;
        assert_eq!(jobs.len(), 1);
        match &jobs[0] {
            Job::DeliverFullRecord(job) => {
                assert_eq!(job.conversation_id, id());
                assert_eq!(job.display_name.as_deref(), Some("ana_dev"));
                assert_eq!(job.values_by_name().get("email").map(String::as_str), Some("a@b.com"));
            }
            other => panic!("unexpected job: {:?}", other),
        }
        assert!(state.completed);
    }

    #[tokio::test]
    async fn backend_errors_propagate() {
        let backend = MockModelBackend::new().with_error(MockError::AuthenticationFailed);
        let queue = InMemoryTaskQueue::new();
        let mut state = user_state("hello");

        let result = engine(&backend, &queue)
            .advance(&id(), &definition(), &mut state)
            .await;

        assert!(matches!(result, Err(TurnError::Model(ModelError::AuthenticationFailed))));
        assert_eq!(state.tokens_remaining, 100);
    }

    #[tokio::test]
    async fn refused_full_record_is_replayed_next_turn() {
        let calls = vec![
            ToolCall::new("a", SET_FIELD_TOOL, r#"{"index":0,"value":"Ana"}"#),
            ToolCall::new("b", SET_FIELD_TOOL, r#"{"index":1,"value":"a@b.com"}"#),
        ];
        let backend = MockModelBackend::new()
            .with_directives(calls, 10)
            .with_answer("Thanks!", 2);
        let recorded = InMemoryTaskQueue::new();
        let engine = SurveyEngine::new(
            Arc::new(backend.clone()),
            Arc::new(RefusingQueue {
                refusals: AtomicUsize::new(1),
                inner: recorded.clone(),
            }),
            EngineSettings::default(),
        );
        let mut state = user_state("Ana, a@b.com");

        engine.advance(&id(), &definition(), &mut state).await.unwrap();
        assert!(state.completed);
        assert!(state.delivery_pending);
        assert!(recorded.is_empty().await);

        state.push_user("anything else?");
        engine.advance(&id(), &definition(), &mut state).await.unwrap();
        assert!(!state.delivery_pending);
        let jobs = recorded.jobs().await;
        assert!(matches!(jobs.as_slice(), [Job::DeliverFullRecord(_)]));

        state.push_user("bye");
        engine.advance(&id(), &definition(), &mut state).await.unwrap();
        assert_eq!(recorded.len().await, 1);
    }
}
