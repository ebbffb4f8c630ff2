//! REST transport over HTTP.
//!
//! Maps the resource operations onto the conventional verbs:
//! `GET base/:id`, `GET base?params`, `POST base`, `PUT base/:id`,
//! `DELETE base/:id`.

use crate::error::{ResourceError, ResourceResult};
use crate::path::ResourcePath;
use crate::resource::{Operation, RemoteResource};
use async_trait::async_trait;
use recoll_types::{Params, Record, RecordId};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for [`HttpResource`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpResourceConfig {
    /// Server root that resource paths are appended to.
    pub base_url: String,
    /// Per-request timeout (in seconds).
    pub timeout_secs: u64,
    /// Headers sent with every request.
    #[serde(default)]
    pub default_headers: BTreeMap<String, String>,
}

impl Default for HttpResourceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
            timeout_secs: 30,
            default_headers: BTreeMap::new(),
        }
    }
}

/// A [`RemoteResource`] backed by a JSON REST API.
#[derive(Debug, Clone)]
pub struct HttpResource {
    config: HttpResourceConfig,
    client: Client,
}

impl HttpResource {
    /// Builds the HTTP client. Fails on malformed default headers.
    pub fn new(config: HttpResourceConfig) -> ResourceResult<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.default_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ResourceError::Config(format!("header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ResourceError::Config(format!("header value for {name}: {e}")))?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self { config, client })
    }

    /// The configured server root, without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path)
    }

    async fn send(&self, op: Operation, request: RequestBuilder) -> ResourceResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| ResourceError::Network(format!("{op} failed: {e}")))?;

        let status = response.status();
        debug!("{} {} -> {}", op, response.url(), status);

        if status == StatusCode::NOT_FOUND {
            return Err(ResourceError::NotFound(response.url().path().to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("{} rejected with {}: {}", op, status, body);
            return Err(ResourceError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Reads a record body. Empty bodies (e.g. `204 No Content`) yield an empty record.
    async fn read_record(response: Response) -> ResourceResult<Record> {
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Record::new());
        }
        let value: Value = serde_json::from_str(&text)?;
        Record::from_value(value)
            .ok_or_else(|| ResourceError::InvalidRequest("response is not a JSON object".into()))
    }
}

/// Renders params as query pairs; strings go out unquoted.
fn query_pairs(params: &Params) -> Vec<(String, String)> {
    params
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| {
            let rendered = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k.clone(), rendered)
        })
        .collect()
}

#[async_trait]
impl RemoteResource for HttpResource {
    async fn fetch_one(&self, path: &ResourcePath, id: &RecordId) -> ResourceResult<Record> {
        let request = self.client.get(self.url(&path.item(id)));
        let response = self.send(Operation::FetchOne, request).await?;
        Self::read_record(response).await
    }

    async fn fetch_many(
        &self,
        path: &ResourcePath,
        params: &Params,
    ) -> ResourceResult<Vec<Record>> {
        let request = self
            .client
            .get(self.url(path.collection()))
            .query(&query_pairs(params));
        let response = self.send(Operation::FetchMany, request).await?;
        Ok(response.json::<Vec<Record>>().await?)
    }

    async fn create(&self, path: &ResourcePath, record: &Record) -> ResourceResult<Record> {
        let request = self.client.post(self.url(path.collection())).json(record);
        let response = self.send(Operation::Create, request).await?;
        Self::read_record(response).await
    }

    async fn update(
        &self,
        path: &ResourcePath,
        id: &RecordId,
        record: &Record,
    ) -> ResourceResult<Record> {
        let request = self.client.put(self.url(&path.item(id))).json(record);
        let response = self.send(Operation::Update, request).await?;
        Self::read_record(response).await
    }

    async fn delete(&self, path: &ResourcePath, record: &Record) -> ResourceResult<Record> {
        let id = record
            .id()
            .ok_or_else(|| ResourceError::InvalidRequest("delete requires an id".into()))?;
        let request = self.client.delete(self.url(&path.item(&id)));
        let response = self.send(Operation::Delete, request).await?;
        Self::read_record(response).await
    }
}
