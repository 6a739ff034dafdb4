//! DeliverRecordHandler - Pushes interview data to the CRM.
//!
//! Full records are mapped onto the CRM schema by a forced `send_to_crm`
//! model call. Addenda carry only the side metadata and the attachment.
//! Either way the record is created on first delivery and updated once the
//! conversation holds an external id. Deliveries for one conversation run one
//! at a time, so a record is never created twice.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::application::conversation_locks::ConversationLocks;
use crate::domain::foundation::ConversationId;
use crate::domain::handoff::{
    crm_mapping_prompt, crm_mapping_tool, AddendumJob, CandidateRecord, FullRecordJob,
    GenerateDocumentJob, Job, CRM_MAPPING_TOOL,
};
use crate::domain::survey::HistoryEntry;
use crate::ports::{
    ConversationStore, DocumentStore, JobError, ModelBackend, ModelError, ModelRequest,
    RecordSink, StoredDocument, TaskQueue,
};

pub struct DeliverRecordHandler {
    backend: Arc<dyn ModelBackend>,
    sink: Arc<dyn RecordSink>,
    documents: Arc<dyn DocumentStore>,
    store: Arc<dyn ConversationStore>,
    queue: Arc<dyn TaskQueue>,
    locks: ConversationLocks,
    /// Held across CRM calls; separate from `locks` so turns are not blocked.
    deliveries: ConversationLocks,
}

impl DeliverRecordHandler {
    pub fn new(
        backend: Arc<dyn ModelBackend>,
        sink: Arc<dyn RecordSink>,
        documents: Arc<dyn DocumentStore>,
        store: Arc<dyn ConversationStore>,
        queue: Arc<dyn TaskQueue>,
        locks: ConversationLocks,
    ) -> Self {
        Self {
            backend,
            sink,
            documents,
            store,
            queue,
            locks,
            deliveries: ConversationLocks::new(),
        }
    }

    pub async fn deliver_full(&self, job: &FullRecordJob) -> Result<(), JobError> {
        let data = job.values_by_name();
        let record = self
            .map_record(&data)
            .await?
            .with_side_metadata(job.display_name.clone(), job.track.clone());

        let attachment = match self.store.get(&job.conversation_id).await? {
            Some(state) => match state.attachment_ref {
                Some(key) => self.documents.get(&key).await?,
                None => None,
            },
            None => None,
        };

        self.upsert(&job.conversation_id, &record, attachment.as_ref())
            .await?;

        let follow_up = GenerateDocumentJob {
            conversation_id: job.conversation_id.clone(),
            data,
            language: job.language.clone(),
        };
        self.queue.enqueue(Job::GenerateDocument(follow_up)).await?;
        Ok(())
    }

    pub async fn deliver_addendum(&self, job: &AddendumJob) -> Result<(), JobError> {
        let attachment = self
            .documents
            .get(&job.attachment)
            .await?
            .ok_or_else(|| JobError::invalid(format!("attachment {} not found", job.attachment)))?;

        let record = CandidateRecord::addendum(
            &job.conversation_id,
            job.display_name.clone(),
            job.track.clone(),
        );
        self.upsert(&job.conversation_id, &record, Some(&attachment))
            .await
    }

    async fn map_record(
        &self,
        data: &BTreeMap<String, String>,
    ) -> Result<CandidateRecord, JobError> {
        let request = ModelRequest::new(vec![HistoryEntry::system(crm_mapping_prompt(data))])
            .with_tool(crm_mapping_tool())
            .require_tool();
        let reply = self.backend.complete(request).await?;

        let call = reply
            .find_call(CRM_MAPPING_TOOL)
            .ok_or_else(|| JobError::invalid("model did not call send_to_crm"))?;
        CandidateRecord::from_mapping_arguments(&call.arguments)
            .map_err(|e| JobError::from(ModelError::parse(format!("send_to_crm arguments: {}", e))))
    }

    /// Creates or updates the record, persisting a newly issued external id.
    async fn upsert(
        &self,
        conversation_id: &ConversationId,
        record: &CandidateRecord,
        attachment: Option<&StoredDocument>,
    ) -> Result<(), JobError> {
        let _delivery = self.deliveries.acquire(conversation_id).await;
        let existing = self
            .store
            .get(conversation_id)
            .await?
            .and_then(|state| state.external_record_id);

        if let Some(external_id) = existing {
            self.sink.update(external_id, record, attachment).await?;
            tracing::info!(conversation_id = %conversation_id, crm_id = external_id, "CRM record updated");
            return Ok(());
        }

        let external_id = self.sink.create(record, attachment).await?;
        tracing::info!(conversation_id = %conversation_id, crm_id = external_id, "CRM record created");

        let _guard = self.locks.acquire(conversation_id).await;
        if let Some(mut state) = self.store.get(conversation_id).await? {
            if state.external_record_id.is_none() {
                state.external_record_id = Some(external_id);
                state.touch();
                self.store.put(conversation_id, &state).await?;
            }
        }
        Ok(())
    }
}
