//! RefreshTracksHandler - Copies the catalog's track labels into the survey definition.

use std::sync::Arc;

use crate::ports::{ConfigSource, JobError, TrackCatalog};

pub struct RefreshTracksHandler {
    catalog: Arc<dyn TrackCatalog>,
    config: Arc<dyn ConfigSource>,
}

impl RefreshTracksHandler {
    pub fn new(catalog: Arc<dyn TrackCatalog>, config: Arc<dyn ConfigSource>) -> Self {
        Self { catalog, config }
    }

    pub async fn handle(&self) -> Result<(), JobError> {
        let tracks = self.catalog.fetch().await?;
        let count = tracks.len();
        self.config.set_tracks(tracks).await?;
        tracing::info!(tracks = count, "track catalog refreshed");
        Ok(())
    }
}
