//! Record Sink Port - Interface to the external CRM.

use async_trait::async_trait;

use crate::domain::handoff::CandidateRecord;

use super::StoredDocument;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("CRM is not configured")]
    NotConfigured,

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),
}

impl SinkError {
    pub fn unexpected_status(status: u16, body: impl Into<String>) -> Self {
        Self::UnexpectedStatus {
            status,
            body: body.into(),
        }
    }
}

/// Port for creating and updating candidate records.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Create a record and return its external id.
    async fn create(
        &self,
        record: &CandidateRecord,
        attachment: Option<&StoredDocument>,
    ) -> Result<i64, SinkError>;

    async fn update(
        &self,
        id: i64,
        record: &CandidateRecord,
        attachment: Option<&StoredDocument>,
    ) -> Result<(), SinkError>;
}
