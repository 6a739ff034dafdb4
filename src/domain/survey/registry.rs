//! Field registry: the ordered list of fields a survey collects.

use serde::{Deserialize, Serialize};

use super::state::InterviewState;
use crate::domain::foundation::ValidationError;

/// One field merged with a conversation's answer. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub index: usize,
    pub name: String,
    pub value: Option<String>,
}

impl Field {
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Line shown to the model for this field.
    pub fn prompt_line(&self) -> String {
        match &self.value {
            Some(value) => format!("[{}] - {} - {} (already set)", self.index, self.name, value),
            None => format!("[{}] - {} - ? (need to ask)", self.index, self.name),
        }
    }
}

/// Ordered, index-addressed field names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldRegistry {
    names: Vec<String>,
}

impl FieldRegistry {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Parses one field per line; lines are trimmed and blank lines dropped.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let names: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if names.is_empty() {
            return Err(ValidationError::empty_field("fields"));
        }
        Ok(Self { names })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn is_valid_index(&self, index: usize) -> bool {
        index < self.names.len()
    }

    /// Zips names with the state's stored values, in registry order.
    pub fn resolve(&self, state: &InterviewState) -> Vec<Field> {
        self.names
            .iter()
            .enumerate()
            .map(|(index, name)| Field {
                index,
                name: name.clone(),
                value: state.field_value(index).map(str::to_string),
            })
            .collect()
    }

    /// Number of fields still unanswered.
    pub fn outstanding(&self, state: &InterviewState) -> usize {
        (0..self.names.len())
            .filter(|index| state.field_value(*index).is_none())
            .count()
    }
}
