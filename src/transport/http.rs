// SPDX-License-Identifier: MPL-2.0

//! HTTP transport backed by reqwest

use super::{Transport, TransportFuture, UploadFile};
use crate::errors::TransportError;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Talks to the effects server over HTTP
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cloak-control/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Http(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

/// Parse the body regardless of HTTP status; the body carries `status`
async fn read_body(
    endpoint: &'static str,
    response: reqwest::Response,
) -> Result<Value, TransportError> {
    let http_status = response.status();
    if !http_status.is_success() {
        warn!(endpoint, status = %http_status, "Server returned non-success HTTP status");
    }
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        TransportError::Decode(format!("{} (HTTP {}) from {}", e, http_status, endpoint))
    })
}

impl Transport for HttpTransport {
    fn post(&self, endpoint: &'static str, payload: Value) -> TransportFuture {
        let request = self.client.post(self.url(endpoint)).json(&payload);
        Box::pin(async move {
            debug!(endpoint, %payload, "POST");
            let response = request.send().await?;
            read_body(endpoint, response).await
        })
    }

    fn get(&self, endpoint: &'static str) -> TransportFuture {
        let request = self.client.get(self.url(endpoint));
        Box::pin(async move {
            debug!(endpoint, "GET");
            let response = request.send().await?;
            read_body(endpoint, response).await
        })
    }

    fn upload(&self, endpoint: &'static str, file: UploadFile) -> TransportFuture {
        let client = self.client.clone();
        let url = self.url(endpoint);
        Box::pin(async move {
            debug!(endpoint, file = %file.file_name, size = file.bytes.len(), "Uploading");
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(file.mime_type)?;
            let form = Form::new().part("file", part);
            let response = client.post(url).multipart(form).send().await?;
            read_body(endpoint, response).await
        })
    }
}
