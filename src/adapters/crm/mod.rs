//! CRM adapters: record sinks and the track catalog.
//!
//! - `HttpRecordSink` - Multipart create/update against the CRM API
//! - `InMemoryRecordSink` - Records calls; used in tests and when no CRM is configured
//! - `HttpTrackCatalog` / `StaticTrackCatalog` - Track label sources

mod http_record_sink;
mod in_memory_record_sink;
mod track_catalog;

pub use http_record_sink::HttpRecordSink;
pub use in_memory_record_sink::{InMemoryRecordSink, SinkCall};
pub use track_catalog::{HttpTrackCatalog, StaticTrackCatalog};
