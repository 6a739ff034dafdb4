//! CRM Record Sink - Creates and updates candidate records over HTTP.
//!
//! Records are sent as multipart forms: `POST {base_url}` to create,
//! `PUT {base_url}/{id}` to update. List fields use the `name[]`
//! convention and an attachment travels as the `resume` file part.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::config::CrmConfig;
use crate::domain::handoff::CandidateRecord;
use crate::ports::{RecordSink, SinkError, StoredDocument};

const ATTACHMENT_PART: &str = "resume";
const ATTACHMENT_CONTENT_TYPE: &str = "application/octet-stream";

pub struct HttpRecordSink {
    base_url: String,
    api_key: Secret<String>,
    source_id: Option<i64>,
    http_client: Client,
}

impl HttpRecordSink {
    pub fn from_config(config: &CrmConfig) -> Result<Self, SinkError> {
        let base_url = config
            .base_url
            .clone()
            .filter(|u| !u.is_empty())
            .ok_or(SinkError::NotConfigured)?;
        let api_key = config.api_key.clone().ok_or(SinkError::NotConfigured)?;
        let http_client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| SinkError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            source_id: config.source_id,
            http_client,
        })
    }

    fn record_url(&self, id: i64) -> String {
        format!("{}/{}", self.base_url, id)
    }

    fn build_form(
        &self,
        record: &CandidateRecord,
        attachment: Option<&StoredDocument>,
    ) -> Result<Form, SinkError> {
        let mut form = Form::new();
        for (name, value) in record.to_form_pairs(self.source_id) {
            form = form.text(name, value);
        }

        if let Some(document) = attachment {
            let part = Part::bytes(document.bytes.clone())
                .file_name(document.key.file_name().to_string())
                .mime_str(ATTACHMENT_CONTENT_TYPE)
                .map_err(|e| SinkError::Network(e.to_string()))?;
            form = form.part(ATTACHMENT_PART, part);
        }
        Ok(form)
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        record: &CandidateRecord,
        attachment: Option<&StoredDocument>,
    ) -> Result<String, SinkError> {
        let form = self.build_form(record, attachment)?;

        let response = self
            .http_client
            .request(method.clone(), url)
            .header("Accept", "application/json")
            .header("X-API-KEY", self.api_key.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(|e| SinkError::Network(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !is_accepted(status) {
            tracing::error!(%method, %url, status = status.as_u16(), body = %body, "CRM request failed");
            return Err(SinkError::unexpected_status(status.as_u16(), body));
        }
        Ok(body)
    }
}

fn is_accepted(status: StatusCode) -> bool {
    status == StatusCode::OK || status == StatusCode::CREATED
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    data: CreatedRecord,
}

#[derive(Debug, Deserialize)]
struct CreatedRecord {
    id: i64,
}

fn parse_created_id(body: &str) -> Result<i64, SinkError> {
    let response: CreateResponse = serde_json::from_str(body)
        .map_err(|e| SinkError::Parse(format!("Failed to parse CRM response: {}", e)))?;
    Ok(response.data.id)
}

#[async_trait]
impl RecordSink for HttpRecordSink {
    async fn create(
        &self,
        record: &CandidateRecord,
        attachment: Option<&StoredDocument>,
    ) -> Result<i64, SinkError> {
        let body = self.send(Method::POST, &self.base_url, record, attachment).await?;
        let id = parse_created_id(&body)?;
        tracing::info!(crm_id = id, "CRM record created");
        Ok(id)
    }

    async fn update(
        &self,
        id: i64,
        record: &CandidateRecord,
        attachment: Option<&StoredDocument>,
    ) -> Result<(), SinkError> {
        self.send(Method::PUT, &self.record_url(id), record, attachment)
            .await?;
        tracing::info!(crm_id = id, "CRM record updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CrmConfig {
        CrmConfig {
            base_url: Some("https://crm.example.com/api/candidates/".to_string()),
            api_key: Some(Secret::new("key".to_string())),
            source_id: Some(3),
            ..CrmConfig::default()
        }
    }

    #[test]
    fn from_config_requires_url_and_key() {
        assert!(matches!(
            HttpRecordSink::from_config(&CrmConfig::default()),
            Err(SinkError::NotConfigured)
        ));

        let without_key = CrmConfig {
            api_key: None,
            ..config()
        };
        assert!(matches!(
            HttpRecordSink::from_config(&without_key),
            Err(SinkError::NotConfigured)
        ));
    }

    #[test]
    fn record_url_appends_id() {
        let sink = HttpRecordSink::from_config(&config()).unwrap();
        assert_eq!(sink.base_url, "https://crm.example.com/api/candidates");
        assert_eq!(sink.record_url(42), "https://crm.example.com/api/candidates/42");
    }

    #[test]
    fn accepts_only_ok_and_created() {
        assert!(is_accepted(StatusCode::OK));
        assert!(is_accepted(StatusCode::CREATED));
        assert!(!is_accepted(StatusCode::ACCEPTED));
        assert!(!is_accepted(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn parses_created_id() {
        assert_eq!(parse_created_id(r#"{"data":{"id":981,"full_name":"Ana"}}"#).unwrap(), 981);
        assert!(matches!(
            parse_created_id(r#"{"data":{}}"#),
            Err(SinkError::Parse(_))
        ));
    }
}
