//! Completion and attachment transitions.
//!
//! Both are edge-triggered: they fire at most once per conversation, keyed
//! off flags stored in the interview state.

use super::registry::FieldRegistry;
use super::state::InterviewState;
use crate::domain::foundation::DocumentKey;

/// Snapshot of the unanswered count taken before a directive batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionCheck {
    unset_at_start: usize,
}

impl CompletionCheck {
    pub fn begin(registry: &FieldRegistry, state: &InterviewState) -> Self {
        Self {
            unset_at_start: registry.outstanding(state),
        }
    }

    /// Marks the state complete and returns true on the completing edge:
    /// something was unset when the batch started, nothing is now, and the
    /// state was not already complete.
    pub fn finish(self, registry: &FieldRegistry, state: &mut InterviewState) -> bool {
        if state.completed || self.unset_at_start == 0 {
            return false;
        }
        if registry.outstanding(state) > 0 {
            return false;
        }
        state.completed = true;
        state.touch();
        true
    }
}

/// Stores the attachment key. Returns true only for the first attachment.
pub fn attach_document(state: &mut InterviewState, key: DocumentKey) -> bool {
    let first = state.attachment_ref.is_none();
    state.attachment_ref = Some(key);
    state.touch();
    first
}
