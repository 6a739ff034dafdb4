//! Prompt builder: system message plus a character-bounded history window.

use super::registry::FieldRegistry;
use super::state::{HistoryEntry, InterviewState};
use super::template::PromptTemplate;

/// Builds the message sequence sent to the model.
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    history_limit: usize,
}

impl PromptBuilder {
    pub fn new(history_limit: usize) -> Self {
        Self { history_limit }
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Renders the system message for the current field state.
    pub fn system_message(
        &self,
        registry: &FieldRegistry,
        template: &PromptTemplate,
        state: &InterviewState,
    ) -> String {
        let listing = registry
            .resolve(state)
            .iter()
            .map(|field| field.prompt_line())
            .collect::<Vec<_>>()
            .join("\n");
        template.render(&listing)
    }

    /// Returns `[system] + kept history` in chronological order.
    ///
    /// History is walked newest first, starting the running total at the
    /// system message length; the walk stops before the first message that
    /// brings the total to or past the limit. The system message itself is
    /// never trimmed.
    pub fn build(
        &self,
        registry: &FieldRegistry,
        template: &PromptTemplate,
        state: &InterviewState,
    ) -> Vec<HistoryEntry> {
        let system = self.system_message(registry, template, state);
        let mut total = system.chars().count();

        let mut kept: Vec<&HistoryEntry> = Vec::new();
        for entry in state.history.iter().rev() {
            total += entry.content_chars();
            if total >= self.history_limit {
                break;
            }
            kept.push(entry);
        }

        let mut messages = Vec::with_capacity(kept.len() + 1);
        messages.push(HistoryEntry::system(system));
        messages.extend(kept.into_iter().rev().cloned());
        messages
    }
}
