//! Handoff domain: jobs emitted when interviews complete or documents are
//! attached, their retry policies and the CRM record mapping.

mod document;
mod job;
mod record;
mod retry;

pub use document::{
    document_prompt, document_tool, parse_document_arguments, DOCUMENT_FILE_NAME, DOCUMENT_TOOL,
};
pub use job::{AddendumJob, FailedJob, FullRecordJob, GenerateDocumentJob, Job, JobKind};
pub use record::{crm_mapping_prompt, crm_mapping_tool, CandidateRecord, CRM_MAPPING_TOOL};
pub use retry::{RetryPolicies, RetryPolicy};
