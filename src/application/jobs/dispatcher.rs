//! JobDispatcher - Routes queued jobs to their handlers.

use async_trait::async_trait;

use crate::domain::handoff::Job;
use crate::ports::{JobError, JobHandler};

use super::{DeliverRecordHandler, GenerateDocumentHandler, RefreshTracksHandler};

pub struct JobDispatcher {
    records: DeliverRecordHandler,
    documents: GenerateDocumentHandler,
    tracks: RefreshTracksHandler,
}

impl JobDispatcher {
    pub fn new(
        records: DeliverRecordHandler,
        documents: GenerateDocumentHandler,
        tracks: RefreshTracksHandler,
    ) -> Self {
        Self {
            records,
            documents,
            tracks,
        }
    }
}

#[async_trait]
impl JobHandler for JobDispatcher {
    async fn handle(&self, job: &Job) -> Result<(), JobError> {
        match job {
            Job::DeliverFullRecord(job) => self.records.deliver_full(job).await,
            Job::DeliverAddendum(job) => self.records.deliver_addendum(job).await,
            Job::GenerateDocument(job) => self.documents.handle(job).await,
            Job::RefreshTracks => self.tracks.handle().await,
        }
    }
}
