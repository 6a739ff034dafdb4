//! Track Catalog Port - Source of the selectable track labels.

use async_trait::async_trait;

use super::SinkError;

#[async_trait]
pub trait TrackCatalog: Send + Sync {
    async fn fetch(&self) -> Result<Vec<String>, SinkError>;
}
