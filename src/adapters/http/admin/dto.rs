//! Request and response bodies for admin endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::survey::SurveyDefinition;

#[derive(Debug, Clone, Serialize)]
pub struct ConfigResponse {
    pub fields: Vec<String>,
    pub prompt: String,
    pub tracks: Vec<String>,
}

impl From<SurveyDefinition> for ConfigResponse {
    fn from(definition: SurveyDefinition) -> Self {
        Self {
            fields: definition.fields.names().to_vec(),
            prompt: definition.prompt.as_str().to_string(),
            tracks: definition.tracks,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreditRequest {
    pub amount: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreditResponse {
    pub conversation_id: String,
    pub tokens_remaining: i64,
}
