//! Configuration Source Port - Runtime-editable survey definition.

use async_trait::async_trait;

use crate::domain::survey::{FieldRegistry, PromptTemplate, SurveyDefinition};

use super::StoreError;

/// Port for reading and editing the active survey definition.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn get(&self) -> Result<SurveyDefinition, StoreError>;

    async fn set_fields(&self, fields: FieldRegistry) -> Result<(), StoreError>;

    async fn set_prompt(&self, prompt: PromptTemplate) -> Result<(), StoreError>;

    async fn set_tracks(&self, tracks: Vec<String>) -> Result<(), StoreError>;
}
