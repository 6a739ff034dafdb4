//! Prompt template with a `{data}` placeholder.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Placeholder substituted with the rendered field listing.
pub const DATA_PLACEHOLDER: &str = "{data}";

/// System prompt template. Always contains [`DATA_PLACEHOLDER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PromptTemplate(String);

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        if !text.contains(DATA_PLACEHOLDER) {
            return Err(ValidationError::invalid_format(
                "prompt",
                "must contain the {data} placeholder",
            ));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitutes the listing into the placeholder.
    pub fn render(&self, data: &str) -> String {
        self.0.replace(DATA_PLACEHOLDER, data)
    }
}

impl TryFrom<String> for PromptTemplate {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PromptTemplate> for String {
    fn from(value: PromptTemplate) -> Self {
        value.0
    }
}
