//! Payload CMS REST client.
//!
//! Records are created with `POST /api/{collection}` and updated with
//! `PATCH /api/{collection}/{id}`. Both return `{ "doc": { "id": .. }, .. }`.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client as ReqwestClient, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::errors::ContentStoreError;
use crate::interfaces::ContentStore;
use crate::payload::PayloadConfig;
use crate::types::StoredRecord;

/// Payload CMS client implementing [`ContentStore`].
///
/// # Example
///
/// ```ignore
/// use seed_migrate_repository::{ContentStore, PayloadClient, PayloadConfig};
///
/// let config = PayloadConfig::new("http://localhost:4001")?.with_api_key(key);
/// let client = PayloadClient::new(config)?;
/// let record = client.create("amenities", &json!({"name": "Pool", "slug": "pool"})).await?;
/// ```
pub struct PayloadClient {
    client: ReqwestClient,
    config: PayloadConfig,
}

#[derive(Debug, Deserialize)]
struct WriteResponse {
    doc: Value,
}

impl PayloadClient {
    /// Create a new client. No request is made until the first write.
    ///
    /// # Returns
    ///
    /// * `Ok(PayloadClient)` - A new client instance
    /// * `Err(ContentStoreError)` - If the HTTP client cannot be built
    pub fn new(config: PayloadConfig) -> Result<Self, ContentStoreError> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ContentStoreError::connection(e.to_string()))?;

        info!(
            url = %config.base_url,
            authenticated = config.api_key.is_some(),
            "Created Payload client"
        );

        Ok(Self { client, config })
    }

    fn endpoint(&self, collection: &str, id: Option<&str>) -> String {
        let base = self.config.base_url.as_str().trim_end_matches('/');
        match id {
            Some(id) => format!("{}/api/{}/{}", base, collection, id),
            None => format!("{}/api/{}", base, collection),
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.header(
                AUTHORIZATION,
                format!("{} API-Key {}", self.config.auth_collection, key),
            ),
            None => request,
        }
    }

    async fn send(
        &self,
        request: RequestBuilder,
        data: &Value,
    ) -> Result<StoredRecord, ContentStoreError> {
        let response = self
            .authorize(request)
            .json(data)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            let err = classify_response(status.as_u16(), &body);
            debug!(status = %status, kind = ?err.kind(), "Payload request rejected");
            return Err(err);
        }

        let response: WriteResponse =
            serde_json::from_str(&body).map_err(|e| ContentStoreError::parse(e.to_string()))?;
        StoredRecord::from_document(&response.doc)
    }
}

#[async_trait]
impl ContentStore for PayloadClient {
    async fn create(
        &self,
        collection: &str,
        data: &Value,
    ) -> Result<StoredRecord, ContentStoreError> {
        let request = self.client.post(self.endpoint(collection, None));
        let record = self.send(request, data).await?;
        debug!(collection = %collection, id = %record.id, "Record created");
        Ok(record)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        data: &Value,
    ) -> Result<StoredRecord, ContentStoreError> {
        let request = self.client.patch(self.endpoint(collection, Some(id)));
        let record = self.send(request, data).await?;
        debug!(collection = %collection, id = %record.id, "Record updated");
        Ok(record)
    }
}

/// Map a transport-level failure. Anything that prevented a response from
/// arriving is a connection error.
fn transport_error(err: reqwest::Error) -> ContentStoreError {
    if err.is_decode() {
        ContentStoreError::parse(err.to_string())
    } else if err.is_builder() {
        ContentStoreError::serialization(err.to_string())
    } else {
        ContentStoreError::connection(err.to_string())
    }
}

/// Classify a non-success response.
fn classify_response(status: u16, body: &str) -> ContentStoreError {
    let messages = error_messages(body);
    let summary = if messages.is_empty() {
        body.trim().to_string()
    } else {
        messages.join("; ")
    };

    let lowered = summary.to_lowercase();
    let unique_violation = lowered.contains("unique") || lowered.contains("duplicate");

    match status {
        409 => ContentStoreError::duplicate(summary),
        400 if unique_violation => ContentStoreError::duplicate(summary),
        400 | 422 => ContentStoreError::validation(summary),
        401 | 403 => ContentStoreError::connection(format!(
            "authentication rejected (status {}): {}",
            status, summary
        )),
        404 => ContentStoreError::NotFound(summary),
        500..=599 if unique_violation => ContentStoreError::duplicate(summary),
        _ => ContentStoreError::unexpected(status, summary),
    }
}

/// Collect every `message` string of a Payload error body.
///
/// Payload nests field errors under `errors[].data`, with a shape that varies
/// between versions, so the whole tree is walked.
fn error_messages(body: &str) -> Vec<String> {
    let mut messages = Vec::new();
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        collect_messages(&value, &mut messages);
    }
    messages
}

fn collect_messages(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(message)) = map.get("message") {
                if !message.is_empty() {
                    out.push(message.clone());
                }
            }
            for (key, nested) in map {
                if key != "message" {
                    collect_messages(nested, out);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_messages(item, out);
            }
        }
        _ => {}
    }
}
