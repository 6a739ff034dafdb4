//! Interview state: the per-conversation aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::errors::SurveyError;
use super::registry::FieldRegistry;
use super::tool::ToolCall;
use crate::domain::foundation::DocumentKey;

/// Role of a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// One message of the interview history.
///
/// Assistant entries that carried tool calls keep them in `tool_calls`;
/// tool results reference the call through `tool_call_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl HistoryEntry {
    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_call_id: None,
            name: None,
            tool_calls: Vec::new(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    /// Assistant message that requested tool calls.
    pub fn tool_request(content: Option<String>, calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content,
            tool_call_id: None,
            name: None,
            tool_calls: calls,
        }
    }

    /// Result of one tool call.
    pub fn tool_result(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_call_id: Some(call_id.into()),
            name: Some(tool_name.into()),
            tool_calls: Vec::new(),
        }
    }

    /// Length used for history budgeting, in characters.
    ///
    /// Absent content counts as zero.
    pub fn content_chars(&self) -> usize {
        self.content.as_deref().map_or(0, |c| c.chars().count())
    }
}

/// Full mutable record of one interview.
///
/// Created lazily with the configured starting budget. Field values are a
/// sparse map keyed by the string-encoded registry index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewState {
    pub tokens_remaining: i64,
    #[serde(default)]
    pub field_values: BTreeMap<String, String>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub track: Option<String>,
    #[serde(default)]
    pub attachment_ref: Option<DocumentKey>,
    #[serde(default)]
    pub completed: bool,
    /// Completed, but the full-record job has not been accepted by the queue.
    #[serde(default)]
    pub delivery_pending: bool,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub external_record_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InterviewState {
    /// Fresh state with the given starting budget.
    pub fn new(start_tokens: i64) -> Self {
        let now = Utc::now();
        Self {
            tokens_remaining: start_tokens,
            field_values: BTreeMap::new(),
            history: Vec::new(),
            language: None,
            track: None,
            attachment_ref: None,
            completed: false,
            delivery_pending: false,
            display_name: None,
            external_record_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
        self.touch();
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.push(HistoryEntry::user(text));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.push(HistoryEntry::assistant(text));
    }

    /// Stored value of a field, if answered.
    pub fn field_value(&self, index: usize) -> Option<&str> {
        self.field_values.get(&index.to_string()).map(String::as_str)
    }

    /// Sets a field value, rejecting indices outside the registry.
    pub fn set_field(
        &mut self,
        registry: &FieldRegistry,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), SurveyError> {
        if !registry.is_valid_index(index) {
            return Err(SurveyError::InvalidFieldIndex {
                index: index as i64,
                len: registry.len(),
            });
        }
        self.field_values.insert(index.to_string(), value.into());
        self.touch();
        Ok(())
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> FieldRegistry {
        FieldRegistry::new(vec!["name".to_string(), "email".to_string()])
    }

    #[test]
    fn new_state_has_budget_and_nothing_else() {
        let state = InterviewState::new(100);
        assert_eq!(state.tokens_remaining, 100);
        assert!(state.field_values.is_empty());
        assert!(state.history.is_empty());
        assert!(!state.completed);
        assert!(state.external_record_id.is_none());
    }

    #[test]
    fn set_field_stores_string_encoded_index() {
        let mut state = InterviewState::new(100);
        state.set_field(&registry(), 1, "a@b.com").unwrap();

        assert_eq!(state.field_values.get("1").map(String::as_str), Some("a@b.com"));
        assert_eq!(state.field_value(1), Some("a@b.com"));
        assert_eq!(state.field_value(0), None);
    }

    #[test]
    fn set_field_rejects_out_of_range_index() {
        let mut state = InterviewState::new(100);
        let result = state.set_field(&registry(), 2, "x");

        assert!(matches!(
            result,
            Err(SurveyError::InvalidFieldIndex { index: 2, len: 2 })
        ));
        assert!(state.field_values.is_empty());
    }

    #[test]
    fn history_entries_keep_order() {
        let mut state = InterviewState::new(100);
        state.push_user("hi");
        state.push_assistant("hello");
        state.push(HistoryEntry::tool_result("call_1", "set_field", "success"));

        let roles: Vec<Role> = state.history.iter().map(|e| e.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::Tool]);
    }

    #[test]
    fn content_chars_counts_unicode_scalars() {
        assert_eq!(HistoryEntry::user("привет").content_chars(), 6);
        assert_eq!(HistoryEntry::tool_request(None, vec![]).content_chars(), 0);
    }

    #[test]
    fn state_survives_yaml_round_trip_with_tool_calls() {
        let mut state = InterviewState::new(10);
        state.push(HistoryEntry::tool_request(
            None,
            vec![ToolCall::new("call_1", "set_field", r#"{"index":0,"value":"Ana"}"#)],
        ));

        let yaml = serde_yaml::to_string(&state).unwrap();
        let loaded: InterviewState = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Tool).unwrap(), "\"tool\"");
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
    }
}
