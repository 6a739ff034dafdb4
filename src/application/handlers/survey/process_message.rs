//! ProcessMessageHandler - Runs one conversational turn.

use std::sync::Arc;

use crate::application::conversation_locks::ConversationLocks;
use crate::application::engine::{SurveyEngine, TurnError};
use crate::domain::foundation::ConversationId;
use crate::domain::survey::InterviewState;
use crate::ports::{ConfigSource, ConversationStore};

/// Command carrying one user utterance.
#[derive(Debug, Clone)]
pub struct ProcessMessageCommand {
    pub conversation_id: ConversationId,
    pub text: String,
    pub display_name: Option<String>,
}

/// How a turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Answered(String),
    /// The balance was below the turn floor; the model was not consulted.
    BudgetExhausted { language: Option<String> },
}

pub struct ProcessMessageHandler {
    engine: Arc<SurveyEngine>,
    store: Arc<dyn ConversationStore>,
    config: Arc<dyn ConfigSource>,
    locks: ConversationLocks,
    start_tokens: i64,
}

impl ProcessMessageHandler {
    pub fn new(
        engine: Arc<SurveyEngine>,
        store: Arc<dyn ConversationStore>,
        config: Arc<dyn ConfigSource>,
        locks: ConversationLocks,
        start_tokens: i64,
    ) -> Self {
        Self {
            engine,
            store,
            config,
            locks,
            start_tokens,
        }
    }

    pub async fn handle(&self, cmd: ProcessMessageCommand) -> Result<TurnOutcome, TurnError> {
        let id = cmd.conversation_id;
        let _guard = self.locks.acquire(&id).await;

        let definition = self.config.get().await?;
        let mut state = self
            .store
            .get(&id)
            .await?
            .unwrap_or_else(|| InterviewState::new(self.start_tokens));

        if cmd.display_name.is_some() {
            state.display_name = cmd.display_name;
        }

        if !state.can_start_turn() {
            tracing::warn!(
                conversation_id = %id,
                tokens_remaining = state.tokens_remaining,
                "token budget exhausted, turn refused"
            );
            self.store.put(&id, &state).await?;
            return Ok(TurnOutcome::BudgetExhausted {
                language: state.language,
            });
        }

        state.push_user(cmd.text);
        let result = self.engine.advance(&id, &definition, &mut state).await;
        state.touch();

        // Persist whatever the turn produced, even when it failed.
        let saved = self.store.put(&id, &state).await;
        let answer = result?;
        saved?;

        tracing::info!(
            conversation_id = %id,
            tokens_remaining = state.tokens_remaining,
            "turn answered"
        );
        Ok(TurnOutcome::Answered(answer))
    }
}
