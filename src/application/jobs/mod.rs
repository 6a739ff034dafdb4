//! Background job handlers and scheduling.

mod deliver_record;
mod dispatcher;
mod generate_document;
mod refresh_tracks;
mod schedule;

pub use deliver_record::DeliverRecordHandler;
pub use dispatcher::JobDispatcher;
pub use generate_document::GenerateDocumentHandler;
pub use refresh_tracks::RefreshTracksHandler;
pub use schedule::spawn_track_refresh;
