// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! IPFS (Kubo HTTP API) content store.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::{ContentError, ContentStore};

pub const DEFAULT_IPFS_API_URL: &str = "http://localhost:5001";

/// Slack between the node's resolve deadline, the caller's timeout and the
/// HTTP client's own timeout. Kubo gives up first and reports the CID as
/// unresolvable; the HTTP client gives up last.
const DEADLINE_MARGIN: Duration = Duration::from_secs(1);

#[derive(Debug, Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash")]
    hash: String,
}

#[derive(Debug, Clone)]
pub struct IpfsClient {
    api_base_url: String,
    http: Client,
    resolve_timeout: Duration,
}

impl IpfsClient {
    /// Client for the Kubo API at `api_base_url`, sized for calls the caller
    /// bounds at `timeout`.
    pub fn new(api_base_url: &str, timeout: Duration) -> Result<Self, ContentError> {
        let api_base_url = api_base_url.trim().trim_end_matches('/').to_string();
        url::Url::parse(&api_base_url)
            .map_err(|e| ContentError::Unavailable(format!("invalid IPFS API URL: {e}")))?;

        let http = Client::builder()
            .timeout(timeout.saturating_add(DEADLINE_MARGIN))
            .build()
            .map_err(|e| ContentError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_base_url,
            http,
            resolve_timeout: timeout.saturating_sub(DEADLINE_MARGIN),
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Deadline passed to the node for resolving a CID on `cat`.
    pub fn resolve_timeout(&self) -> Duration {
        self.resolve_timeout
    }

    fn endpoint(&self, command: &str) -> String {
        format!("{}/api/v0/{command}", self.api_base_url)
    }
}

#[async_trait]
impl ContentStore for IpfsClient {
    async fn add(&self, bytes: Vec<u8>) -> Result<String, ContentError> {
        let form = multipart::Form::new().part("file", multipart::Part::bytes(bytes).file_name("data"));

        let response = self
            .http
            .post(self.endpoint("add"))
            .query(&[("pin", "true")])
            .multipart(form)
            .send()
            .await
            .map_err(|e| ContentError::Unavailable(format!("POST add failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ContentError::Unavailable(format!(
                "POST add returned {status}: {body}"
            )));
        }

        let added: AddResponse = response
            .json()
            .await
            .map_err(|e| ContentError::Unavailable(format!("invalid add response: {e}")))?;

        Ok(added.hash)
    }

    async fn cat(&self, content_id: &str) -> Result<Vec<u8>, ContentError> {
        let mut request = self.http.post(self.endpoint("cat")).query(&[("arg", content_id)]);
        if !self.resolve_timeout.is_zero() {
            let deadline = format!("{}ms", self.resolve_timeout.as_millis());
            request = request.query(&[("timeout", deadline)]);
        }

        let mut response = request
            .send()
            .await
            .map_err(|e| ContentError::Unavailable(format!("POST cat failed: {e}")))?;

        match response.status() {
            status if status.is_success() => {}
            // Kubo reports unresolvable paths as 500 with an error body.
            StatusCode::NOT_FOUND | StatusCode::INTERNAL_SERVER_ERROR => {
                let body = response.text().await.unwrap_or_default();
                debug!(content_id, body = %body, "IPFS cat failed");
                return Err(ContentError::NotFound(content_id.to_string()));
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                return Err(ContentError::Unavailable(format!(
                    "POST cat returned {status}: {body}"
                )));
            }
        }

        let mut content = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ContentError::Unavailable(format!("reading cat stream failed: {e}")))?
        {
            content.extend_from_slice(&chunk);
        }
        Ok(content)
    }
}
