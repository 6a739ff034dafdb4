//! Outbound integrations: CRM record sink, track catalog and chat notifier.

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// CRM configuration.
///
/// When `base_url` is unset, delivered records are only logged.
#[derive(Debug, Clone, Deserialize)]
pub struct CrmConfig {
    /// Candidates collection endpoint, e.g. `https://crm.example.com/api/v2/candidates`
    pub base_url: Option<String>,

    /// API key sent as `X-API-KEY`
    pub api_key: Option<Secret<String>>,

    /// Optional source identifier attached to every record
    pub source_id: Option<i64>,

    /// URL returning the current list of open tracks as a JSON array of strings
    pub tracks_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl CrmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// True when records should be pushed to a real CRM
    pub fn is_enabled(&self) -> bool {
        self.base_url.as_ref().is_some_and(|u| !u.is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(url) = &self.base_url {
            if !is_http_url(url) {
                return Err(ValidationError::InvalidUrl("crm.base_url"));
            }
            let has_key = self
                .api_key
                .as_ref()
                .is_some_and(|k| !k.expose_secret().is_empty());
            if !has_key {
                return Err(ValidationError::MissingRequired("CRM__API_KEY"));
            }
        }
        if let Some(url) = &self.tracks_url {
            if !is_http_url(url) {
                return Err(ValidationError::InvalidUrl("crm.tracks_url"));
            }
        }
        Ok(())
    }
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            source_id: None,
            tracks_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

/// Chat notifier configuration.
///
/// Generated documents are POSTed to `webhook_url`, which the chat transport
/// relays to the user. Without it, deliveries are only logged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotifierConfig {
    pub webhook_url: Option<String>,
}

impl NotifierConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.webhook_url {
            Some(url) if !is_http_url(url) => Err(ValidationError::InvalidUrl("notifier.webhook_url")),
            _ => Ok(()),
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn default_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crm_disabled_by_default() {
        let config = CrmConfig::default();
        assert!(!config.is_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_crm_requires_key_when_enabled() {
        let config = CrmConfig {
            base_url: Some("https://crm.example.com/candidates".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));

        let config = CrmConfig {
            base_url: Some("https://crm.example.com/candidates".to_string()),
            api_key: Some(Secret::new("key".to_string())),
            ..Default::default()
        };
        assert!(config.is_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tracks_url_must_be_http() {
        let config = CrmConfig {
            tracks_url: Some("ftp://example.com/tracks".to_string()),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidUrl(_))));
    }

    #[test]
    fn test_notifier_url_validation() {
        assert!(NotifierConfig::default().validate().is_ok());
        let config = NotifierConfig {
            webhook_url: Some("chat.example.com".to_string()),
        };
        assert!(config.validate().is_err());
    }
}
