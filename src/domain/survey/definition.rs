//! Deployment-wide survey definition.

use serde::{Deserialize, Serialize};

use super::registry::FieldRegistry;
use super::template::PromptTemplate;

/// Fields, prompt template and the currently open tracks.
///
/// Replacing any part does not rewrite existing interview state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyDefinition {
    pub fields: FieldRegistry,
    pub prompt: PromptTemplate,
    #[serde(default)]
    pub tracks: Vec<String>,
}

impl SurveyDefinition {
    pub fn new(fields: FieldRegistry, prompt: PromptTemplate) -> Self {
        Self {
            fields,
            prompt,
            tracks: Vec::new(),
        }
    }

    pub fn with_tracks(mut self, tracks: Vec<String>) -> Self {
        self.tracks = tracks;
        self
    }

    /// True when the track is offered, or when no catalog is loaded yet.
    pub fn accepts_track(&self, track: &str) -> bool {
        self.tracks.is_empty() || self.tracks.iter().any(|t| t == track)
    }
}
