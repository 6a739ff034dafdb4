//! Candidate record mapped from interview data and sent to the CRM.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

use crate::domain::foundation::ConversationId;
use crate::domain::survey::ToolDefinition;

pub const CRM_MAPPING_TOOL: &str = "send_to_crm";

/// Normalized record accepted by the CRM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phone_numbers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

impl CandidateRecord {
    /// Record carrying only side metadata, used for attachment addenda.
    ///
    /// `full_name` is required by the CRM; without a display name it falls
    /// back to a label built from the conversation id.
    pub fn addendum(
        conversation_id: &ConversationId,
        display_name: Option<String>,
        track: Option<String>,
    ) -> Self {
        let full_name = display_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| format!("Candidate {}", conversation_id));
        Self {
            full_name,
            telegram_username: display_name,
            position: track,
            ..Self::default()
        }
    }

    /// Parse the arguments of a `send_to_crm` call.
    pub fn from_mapping_arguments(arguments: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(arguments)
    }

    /// Merge side metadata, overriding whatever the model produced.
    pub fn with_side_metadata(mut self, display_name: Option<String>, track: Option<String>) -> Self {
        if display_name.is_some() {
            self.telegram_username = display_name;
        }
        if track.is_some() {
            self.position = track;
        }
        self
    }

    /// Flatten into multipart form pairs. Lists use the `name[]` convention.
    pub fn to_form_pairs(&self, source_id: Option<i64>) -> Vec<(String, String)> {
        let mut pairs = vec![("full_name".to_string(), self.full_name.clone())];

        let scalars = [
            ("email", &self.email),
            ("location", &self.location),
            ("telegram_username", &self.telegram_username),
            ("position", &self.position),
        ];
        for (name, value) in scalars {
            if let Some(value) = value {
                pairs.push((name.to_string(), value.clone()));
            }
        }

        let lists = [
            ("phone_numbers", &self.phone_numbers),
            ("skills", &self.skills),
            ("urls", &self.urls),
        ];
        for (name, values) in lists {
            for value in values {
                pairs.push((format!("{}[]", name), value.clone()));
            }
        }

        if let Some(source_id) = source_id {
            pairs.push(("source_id".to_string(), source_id.to_string()));
        }
        pairs
    }
}

/// Tool the model must call to map free-form interview data onto the CRM schema.
pub fn crm_mapping_tool() -> ToolDefinition {
    let list = |description: &str| json!({"type": "array", "items": {"type": "string"}, "description": description});
    ToolDefinition::new(
        CRM_MAPPING_TOOL,
        "Send the candidate record to the CRM",
        json!({
            "type": "object",
            "properties": {
                "full_name": {"type": "string", "description": "Candidate full name"},
                "email": {"type": "string", "description": "Contact email"},
                "location": {"type": "string", "description": "City or country"},
                "phone_numbers": list("Phone numbers"),
                "skills": list("Professional skills"),
                "urls": list("Links to profiles, portfolio or repositories"),
            },
            "required": ["full_name"]
        }),
    )
}

/// Instruction for the mapping call, with the interview data embedded.
pub fn crm_mapping_prompt(data: &BTreeMap<String, String>) -> String {
    let mut prompt = String::from(
        "Map the collected candidate data onto the CRM fields and call the send_to_crm tool. \
         Split lists into separate items and leave out anything that is unknown.\n\n",
    );
    for (name, value) in data {
        prompt.push_str(&format!("{}: {}\n", name, value));
    }
    prompt
}
