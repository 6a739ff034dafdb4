//! Survey defaults: seed fields, seed prompt, budgets and loop bounds.

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::survey::{FieldRegistry, PromptTemplate, SurveyDefinition};

/// Survey engine configuration.
///
/// `fields` and `prompt` only seed the configuration source on first start;
/// afterwards the administrative operations own them.
#[derive(Debug, Clone, Deserialize)]
pub struct SurveyConfig {
    /// Seed field list, one field name per line
    #[serde(default = "default_fields")]
    pub fields: String,

    /// Seed prompt template; must contain `{data}`
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Token budget given to every new conversation
    #[serde(default = "default_start_tokens")]
    pub start_tokens: i64,

    /// Character budget for the history window sent to the model
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Directive rounds allowed per turn before the turn fails
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
}

impl SurveyConfig {
    /// Validate survey configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.prompt.contains("{data}") {
            return Err(ValidationError::PromptMissingPlaceholder);
        }
        if self.fields.lines().all(|line| line.trim().is_empty()) {
            return Err(ValidationError::NoSurveyFields);
        }
        if self.max_rounds == 0 {
            return Err(ValidationError::InvalidMaxRounds);
        }
        if self.history_limit == 0 {
            return Err(ValidationError::InvalidHistoryLimit);
        }
        Ok(())
    }
}

impl SurveyConfig {
    /// Definition used to seed an empty configuration source.
    pub fn seed_definition(&self) -> Result<SurveyDefinition, ValidationError> {
        let fields =
            FieldRegistry::parse(&self.fields).map_err(|_| ValidationError::NoSurveyFields)?;
        let prompt = PromptTemplate::new(self.prompt.clone())
            .map_err(|_| ValidationError::PromptMissingPlaceholder)?;
        Ok(SurveyDefinition::new(fields, prompt))
    }
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            fields: default_fields(),
            prompt: default_prompt(),
            start_tokens: default_start_tokens(),
            history_limit: default_history_limit(),
            max_rounds: default_max_rounds(),
        }
    }
}

fn default_fields() -> String {
    "Full name\nEmail\nPhone number\nCity\nYears of experience\nKey skills\nPortfolio or profile links"
        .to_string()
}

fn default_prompt() -> String {
    concat!(
        "You are a friendly recruiter interviewing a candidate in a chat.\n",
        "Ask one short question at a time until every item below is known.\n",
        "As soon as the candidate gives you a value, record it with the set_field tool.\n",
        "Items:\n{data}"
    )
    .to_string()
}

fn default_start_tokens() -> i64 {
    50_000
}

fn default_history_limit() -> usize {
    7_000
}

fn default_max_rounds() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_survey_config_defaults() {
        let config = SurveyConfig::default();
        assert_eq!(config.start_tokens, 50_000);
        assert_eq!(config.history_limit, 7_000);
        assert_eq!(config.max_rounds, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_prompt_without_placeholder() {
        let config = SurveyConfig {
            prompt: "Ask about things".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::PromptMissingPlaceholder)
        ));
    }

    #[test]
    fn test_validation_blank_fields() {
        let config = SurveyConfig {
            fields: "\n  \n".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::NoSurveyFields)));
    }

    #[test]
    fn test_seed_definition_parses_defaults() {
        let definition = SurveyConfig::default().seed_definition().unwrap();
        assert_eq!(definition.fields.len(), 7);
        assert_eq!(definition.fields.names()[0], "Full name");
        assert!(definition.tracks.is_empty());
    }

    #[test]
    fn test_validation_zero_rounds() {
        let config = SurveyConfig {
            max_rounds: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidMaxRounds)));
    }
}
