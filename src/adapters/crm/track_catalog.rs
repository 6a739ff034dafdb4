//! Track catalog adapters.

use async_trait::async_trait;
use reqwest::Client;

use crate::ports::{SinkError, TrackCatalog};

/// Fetches the open tracks as a JSON array of strings.
pub struct HttpTrackCatalog {
    url: String,
    http_client: Client,
}

impl HttpTrackCatalog {
    pub fn new(url: impl Into<String>, http_client: Client) -> Self {
        Self {
            url: url.into(),
            http_client,
        }
    }
}

#[async_trait]
impl TrackCatalog for HttpTrackCatalog {
    async fn fetch(&self) -> Result<Vec<String>, SinkError> {
        let response = self
            .http_client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| SinkError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::unexpected_status(status.as_u16(), body));
        }

        let tracks: Vec<String> = response
            .json()
            .await
            .map_err(|e| SinkError::Parse(format!("Failed to parse track list: {}", e)))?;

        Ok(normalize(tracks))
    }
}

/// Fixed track list, used when no catalog URL is configured.
#[derive(Debug, Clone, Default)]
pub struct StaticTrackCatalog {
    tracks: Vec<String>,
}

impl StaticTrackCatalog {
    pub fn new(tracks: Vec<String>) -> Self {
        Self { tracks }
    }
}

#[async_trait]
impl TrackCatalog for StaticTrackCatalog {
    async fn fetch(&self) -> Result<Vec<String>, SinkError> {
        Ok(normalize(self.tracks.clone()))
    }
}

/// Trims labels and drops blanks and duplicates, keeping the first occurrence.
fn normalize(tracks: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tracks
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_dedups() {
        let tracks = normalize(vec![
            " Backend ".to_string(),
            "".to_string(),
            "QA".to_string(),
            "Backend".to_string(),
        ]);
        assert_eq!(tracks, vec!["Backend".to_string(), "QA".to_string()]);
    }

    #[tokio::test]
    async fn static_catalog_returns_tracks() {
        let catalog = StaticTrackCatalog::new(vec!["QA".to_string()]);
        assert_eq!(catalog.fetch().await.unwrap(), vec!["QA".to_string()]);
    }
}
