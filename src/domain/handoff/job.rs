//! Handoff jobs produced by the engine and consumed by background workers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{ConversationId, DocumentKey, JobId};
use crate::domain::survey::{Field, FieldRegistry, InterviewState};

/// Everything needed to push a completed interview to the CRM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullRecordJob {
    pub conversation_id: ConversationId,
    pub fields: Vec<Field>,
    pub display_name: Option<String>,
    pub language: Option<String>,
    pub track: Option<String>,
}

impl FullRecordJob {
    /// Snapshot of the resolved fields and side metadata.
    pub fn snapshot(
        conversation_id: ConversationId,
        registry: &FieldRegistry,
        state: &InterviewState,
    ) -> Self {
        Self {
            conversation_id,
            fields: registry.resolve(state),
            display_name: state.display_name.clone(),
            language: state.language.clone(),
            track: state.track.clone(),
        }
    }

    /// Answered fields keyed by name.
    pub fn values_by_name(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .filter_map(|f| f.value.clone().map(|v| (f.name.clone(), v)))
            .collect()
    }
}

/// Short record sent when a document is first attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddendumJob {
    pub conversation_id: ConversationId,
    pub display_name: Option<String>,
    pub track: Option<String>,
    pub attachment: DocumentKey,
}

/// Summary document to generate and send back to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateDocumentJob {
    pub conversation_id: ConversationId,
    pub data: BTreeMap<String, String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Job {
    DeliverFullRecord(FullRecordJob),
    DeliverAddendum(AddendumJob),
    GenerateDocument(GenerateDocumentJob),
    RefreshTracks,
}

/// Job kinds, used to pick a retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    DeliverFullRecord,
    DeliverAddendum,
    GenerateDocument,
    RefreshTracks,
}

impl Job {
    pub fn kind(&self) -> JobKind {
        match self {
            Job::DeliverFullRecord(_) => JobKind::DeliverFullRecord,
            Job::DeliverAddendum(_) => JobKind::DeliverAddendum,
            Job::GenerateDocument(_) => JobKind::GenerateDocument,
            Job::RefreshTracks => JobKind::RefreshTracks,
        }
    }

    pub fn conversation_id(&self) -> Option<&ConversationId> {
        match self {
            Job::DeliverFullRecord(job) => Some(&job.conversation_id),
            Job::DeliverAddendum(job) => Some(&job.conversation_id),
            Job::GenerateDocument(job) => Some(&job.conversation_id),
            Job::RefreshTracks => None,
        }
    }
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::DeliverFullRecord => "deliver_full_record",
            JobKind::DeliverAddendum => "deliver_addendum",
            JobKind::GenerateDocument => "generate_document",
            JobKind::RefreshTracks => "refresh_tracks",
        }
    }
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A job that exhausted its attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedJob {
    pub job_id: JobId,
    pub job: Job,
    pub attempts: u32,
    pub error: String,
    pub failed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> FieldRegistry {
        FieldRegistry::new(vec!["name".to_string(), "email".to_string()])
    }

    #[test]
    fn snapshot_carries_fields_and_metadata() {
        let registry = registry();
        let mut state = InterviewState::new(10);
        state.set_field(&registry, 0, "Ana").unwrap();
        state.display_name = Some("ana_dev".to_string());
        state.track = Some("QA".to_string());

        let job = FullRecordJob::snapshot(ConversationId::new("42").unwrap(), &registry, &state);

        assert_eq!(job.fields.len(), 2);
        assert_eq!(job.display_name.as_deref(), Some("ana_dev"));
        assert_eq!(job.track.as_deref(), Some("QA"));
        assert_eq!(
            job.values_by_name(),
            BTreeMap::from([("name".to_string(), "Ana".to_string())])
        );
    }

    #[test]
    fn job_serializes_with_kind_tag() {
        let json = serde_json::to_value(Job::RefreshTracks).unwrap();
        assert_eq!(json["kind"], "refresh_tracks");

        let job = Job::DeliverAddendum(AddendumJob {
            conversation_id: ConversationId::new("1").unwrap(),
            display_name: None,
            track: None,
            attachment: DocumentKey::generate("cv.pdf"),
        });
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["kind"], "deliver_addendum");
        let back: Job = serde_json::from_value(json).unwrap();
        assert_eq!(back, job);
    }

    #[test]
    fn kind_and_conversation_are_exposed() {
        assert_eq!(Job::RefreshTracks.kind(), JobKind::RefreshTracks);
        assert!(Job::RefreshTracks.conversation_id().is_none());
        assert_eq!(JobKind::DeliverFullRecord.to_string(), "deliver_full_record");
    }
}
