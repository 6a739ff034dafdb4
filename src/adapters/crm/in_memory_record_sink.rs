//! In-memory RecordSink.
//!
//! Stands in for the CRM in tests and when no CRM is configured: records
//! are logged and kept, ids are assigned sequentially.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::sleep;

use crate::domain::foundation::DocumentKey;
use crate::domain::handoff::CandidateRecord;
use crate::ports::{RecordSink, SinkError, StoredDocument};

/// One call made against the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    Create {
        id: i64,
        record: CandidateRecord,
        attachment: Option<DocumentKey>,
    },
    Update {
        id: i64,
        record: CandidateRecord,
        attachment: Option<DocumentKey>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordSink {
    calls: Arc<RwLock<Vec<SinkCall>>>,
    next_id: Arc<RwLock<i64>>,
    /// Simulated round-trip latency per call.
    delay: Duration,
}

impl InMemoryRecordSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    async fn round_trip(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }

    pub async fn calls(&self) -> Vec<SinkCall> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl RecordSink for InMemoryRecordSink {
    async fn create(
        &self,
        record: &CandidateRecord,
        attachment: Option<&StoredDocument>,
    ) -> Result<i64, SinkError> {
        self.round_trip().await;
        let id = {
            let mut next_id = self.next_id.write().await;
            *next_id += 1;
            *next_id
        };
        tracing::info!(crm_id = id, full_name = %record.full_name, "record created (in-memory sink)");
        self.calls.write().await.push(SinkCall::Create {
            id,
            record: record.clone(),
            attachment: attachment.map(|d| d.key.clone()),
        });
        Ok(id)
    }

    async fn update(
        &self,
        id: i64,
        record: &CandidateRecord,
        attachment: Option<&StoredDocument>,
    ) -> Result<(), SinkError> {
        self.round_trip().await;
        tracing::info!(crm_id = id, full_name = %record.full_name, "record updated (in-memory sink)");
        self.calls.write().await.push(SinkCall::Update {
            id,
            record: record.clone(),
            attachment: attachment.map(|d| d.key.clone()),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn assigns_sequential_ids_and_records_calls() {
        let sink = InMemoryRecordSink::new();
        let record = CandidateRecord {
            full_name: "Ana".to_string(),
            ..CandidateRecord::default()
        };

        assert_eq!(sink.create(&record, None).await.unwrap(), 1);
        assert_eq!(sink.create(&record, None).await.unwrap(), 2);
        sink.update(1, &record, None).await.unwrap();

        let calls = sink.calls().await;
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[2], SinkCall::Update { id: 1, .. }));
    }
}
