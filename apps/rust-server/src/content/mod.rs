// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Content-addressed storage for credential documents and resume files.
//!
//! ## Backends
//!
//! - [`IpfsClient`] - Kubo HTTP API (`/api/v0/add`, `/api/v0/cat`)
//! - [`MemoryContentStore`] - in-process store for demos and tests
//!
//! [`ContentStoreClient`] is what the workflows hold. It is uninitialised
//! when no backend is configured, bounds every call with a timeout and
//! returns the keccak-256 of the exact bytes it uploaded.

pub mod ipfs;
pub mod memory;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{keccak256, B256};
use async_trait::async_trait;
use serde::Serialize;

pub use ipfs::IpfsClient;
pub use memory::MemoryContentStore;

/// Default bound for a single add or cat.
pub const DEFAULT_CONTENT_TIMEOUT: Duration = Duration::from_secs(30);

/// A content-addressed blob store.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Store `bytes` and return their content identifier.
    async fn add(&self, bytes: Vec<u8>) -> Result<String, ContentError>;

    /// Fetch the full content behind `content_id`.
    async fn cat(&self, content_id: &str) -> Result<Vec<u8>, ContentError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("Content store unavailable: {0}")]
    Unavailable(String),

    #[error("Content not found: {0}")]
    NotFound(String),

    #[error("Content store did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Could not serialize content: {0}")]
    Serialization(String),
}

/// Result of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uploaded {
    pub content_id: String,
    /// keccak-256 of the uploaded bytes
    pub content_hash: B256,
}

/// keccak-256 digest used to anchor content on-chain.
pub fn content_hash(bytes: &[u8]) -> B256 {
    keccak256(bytes)
}

/// Handle to the configured content store.
#[derive(Clone)]
pub struct ContentStoreClient {
    store: Option<Arc<dyn ContentStore>>,
    timeout: Duration,
}

impl ContentStoreClient {
    pub fn new(store: Option<Arc<dyn ContentStore>>) -> Self {
        Self {
            store,
            timeout: DEFAULT_CONTENT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.store.is_some()
    }

    pub async fn upload_bytes(&self, bytes: Vec<u8>) -> Result<Uploaded, ContentError> {
        let store = self.store()?;
        let content_hash = content_hash(&bytes);
        let size = bytes.len();
        let content_id = self.bounded(store.add(bytes)).await?;
        tracing::debug!(content_id = %content_id, size, "Uploaded content");
        Ok(Uploaded {
            content_id,
            content_hash,
        })
    }

    /// Upload the compact JSON encoding of `value`.
    pub async fn upload_json<T: Serialize + ?Sized>(
        &self,
        value: &T,
    ) -> Result<Uploaded, ContentError> {
        let bytes =
            serde_json::to_vec(value).map_err(|e| ContentError::Serialization(e.to_string()))?;
        self.upload_bytes(bytes).await
    }

    /// Download the whole content behind `content_id`.
    pub async fn download_bytes(&self, content_id: &str) -> Result<Vec<u8>, ContentError> {
        let store = self.store()?;
        if content_id.trim().is_empty() {
            return Err(ContentError::NotFound(content_id.to_string()));
        }
        self.bounded(store.cat(content_id)).await
    }

    fn store(&self) -> Result<&dyn ContentStore, ContentError> {
        self.store
            .as_deref()
            .ok_or_else(|| ContentError::Unavailable("no content store configured".to_string()))
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, ContentError>>,
    ) -> Result<T, ContentError> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| ContentError::Timeout(self.timeout))?
    }
}
