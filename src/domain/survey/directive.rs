//! Field-set directives issued by the model through the `set_field` tool.

use thiserror::Error;

use super::errors::SurveyError;
use super::registry::FieldRegistry;
use super::state::{HistoryEntry, InterviewState};
use super::tool::{ToolCall, ToolDefinition};

/// Name of the single tool offered during interviews.
pub const SET_FIELD_TOOL: &str = "set_field";

/// Tool result recorded for an applied directive.
pub const ACK_SUCCESS: &str = "success";

/// Why a directive was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveRejection {
    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    #[error("malformed arguments: {0}")]
    MalformedArguments(String),

    #[error("index {index} out of range (0..{len})")]
    IndexOutOfRange { index: i64, len: usize },
}

/// A parsed `set_field(index, value)` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDirective {
    pub call_id: String,
    pub index: i64,
    pub value: String,
}

impl FieldDirective {
    /// Parses a tool call. Accepts integer or numeric-string indices and
    /// scalar values.
    pub fn from_call(call: &ToolCall) -> Result<Self, DirectiveRejection> {
        if call.name != SET_FIELD_TOOL {
            return Err(DirectiveRejection::UnknownTool(call.name.clone()));
        }

        let args = call
            .parsed_arguments()
            .map_err(|e| DirectiveRejection::MalformedArguments(e.to_string()))?;

        let index = match &args["index"] {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
        .ok_or_else(|| DirectiveRejection::MalformedArguments("index must be an integer".into()))?;

        let value = match &args["value"] {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            _ => {
                return Err(DirectiveRejection::MalformedArguments(
                    "value must be a string".into(),
                ))
            }
        };

        Ok(Self {
            call_id: call.id.clone(),
            index,
            value,
        })
    }

    /// Writes the value into the state if the index is valid.
    pub fn apply(
        &self,
        registry: &FieldRegistry,
        state: &mut InterviewState,
    ) -> Result<(), DirectiveRejection> {
        let out_of_range = || DirectiveRejection::IndexOutOfRange {
            index: self.index,
            len: registry.len(),
        };
        let index = usize::try_from(self.index).map_err(|_| out_of_range())?;
        state
            .set_field(registry, index, self.value.clone())
            .map_err(|e| match e {
                SurveyError::InvalidFieldIndex { .. } => out_of_range(),
                other => DirectiveRejection::MalformedArguments(other.to_string()),
            })
    }
}

/// The `set_field` tool constrained to the registry's indices.
///
/// Returns `None` for an empty registry: nothing can be set.
pub fn set_field_tool(registry: &FieldRegistry) -> Option<ToolDefinition> {
    if registry.is_empty() {
        return None;
    }
    let indices: Vec<usize> = (0..registry.len()).collect();
    Some(ToolDefinition::new(
        SET_FIELD_TOOL,
        "Set parameter value by index",
        serde_json::json!({
            "type": "object",
            "properties": {
                "index": {
                    "type": "integer",
                    "enum": indices,
                    "description": "Index of the parameter"
                },
                "value": {
                    "type": "string",
                    "description": "Parameter value"
                }
            },
            "required": ["index", "value"]
        }),
    ))
}

/// Outcome of applying one directive batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub applied: Vec<FieldDirective>,
    pub rejected: Vec<(String, DirectiveRejection)>,
}

/// Records the directive-bearing assistant message, applies each call and
/// appends one tool result per call.
pub fn apply_batch(
    registry: &FieldRegistry,
    state: &mut InterviewState,
    content: Option<String>,
    calls: Vec<ToolCall>,
) -> BatchReport {
    let mut report = BatchReport::default();
    state.push(HistoryEntry::tool_request(content, calls.clone()));

    for call in calls {
        let outcome = FieldDirective::from_call(&call)
            .and_then(|directive| directive.apply(registry, state).map(|_| directive));

        match outcome {
            Ok(directive) => {
                state.push(HistoryEntry::tool_result(&call.id, &call.name, ACK_SUCCESS));
                report.applied.push(directive);
            }
            Err(rejection) => {
                state.push(HistoryEntry::tool_result(
                    &call.id,
                    &call.name,
                    format!("rejected: {}", rejection),
                ));
                report.rejected.push((call.id, rejection));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::survey::state::Role;

    fn registry() -> FieldRegistry {
        FieldRegistry::new(vec!["name".to_string(), "email".to_string()])
    }

    fn call(id: &str, args: &str) -> ToolCall {
        ToolCall::new(id, SET_FIELD_TOOL, args)
    }

    #[test]
    fn parses_integer_and_string_indices() {
        let d = FieldDirective::from_call(&call("c1", r#"{"index":1,"value":"x"}"#)).unwrap();
        assert_eq!(d.index, 1);
        let d = FieldDirective::from_call(&call("c2", r#"{"index":"0","value":42}"#)).unwrap();
        assert_eq!(d.index, 0);
        assert_eq!(d.value, "42");
    }

    #[test]
    fn rejects_malformed_calls() {
        assert!(matches!(
            FieldDirective::from_call(&call("c", "{oops")),
            Err(DirectiveRejection::MalformedArguments(_))
        ));
        assert!(matches!(
            FieldDirective::from_call(&call("c", r#"{"value":"x"}"#)),
            Err(DirectiveRejection::MalformedArguments(_))
        ));
        assert!(matches!(
            FieldDirective::from_call(&ToolCall::new("c", "drop_table", "{}")),
            Err(DirectiveRejection::UnknownTool(_))
        ));
    }

    #[test]
    fn tool_offers_only_valid_indices() {
        let tool = set_field_tool(&registry()).unwrap();
        assert_eq!(tool.name(), SET_FIELD_TOOL);
        assert_eq!(
            tool.parameters_schema()["properties"]["index"]["enum"],
            serde_json::json!([0, 1])
        );
        assert!(set_field_tool(&FieldRegistry::default()).is_none());
    }

    #[test]
    fn batch_records_request_and_one_result_per_call() {
        let registry = registry();
        let mut state = InterviewState::new(100);

        let report = apply_batch(
            &registry,
            &mut state,
            None,
            vec![
                call("c1", r#"{"index":0,"value":"Ana"}"#),
                call("c2", r#"{"index":1,"value":"a@b.com"}"#),
            ],
        );

        assert_eq!(report.applied.len(), 2);
        assert!(report.rejected.is_empty());
        assert_eq!(state.history.len(), 3);
        assert_eq!(state.history[0].role, Role::Assistant);
        assert_eq!(state.history[0].tool_calls.len(), 2);
        assert_eq!(state.history[1].tool_call_id.as_deref(), Some("c1"));
        assert_eq!(state.history[2].content.as_deref(), Some(ACK_SUCCESS));
        assert_eq!(state.field_value(0), Some("Ana"));
        assert_eq!(state.field_value(1), Some("a@b.com"));
    }

    #[test]
    fn out_of_range_directive_is_a_no_op() {
        let registry = registry();
        let mut state = InterviewState::new(100);

        let report = apply_batch(
            &registry,
            &mut state,
            None,
            vec![
                call("c1", r#"{"index":7,"value":"nope"}"#),
                call("c2", r#"{"index":-1,"value":"nope"}"#),
            ],
        );

        assert!(report.applied.is_empty());
        assert_eq!(report.rejected.len(), 2);
        assert!(state.field_values.is_empty());
        assert!(state.history[1]
            .content
            .as_deref()
            .is_some_and(|c| c.starts_with("rejected")));
    }
}
