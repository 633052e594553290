// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process content store (`IPFS_API_URL=memory`).

use std::collections::HashMap;
use std::sync::Mutex;

use alloy::primitives::hex;
use async_trait::async_trait;
use sha2::{Digest, Sha256};

use super::{ContentError, ContentStore};

/// Identifiers look like `sha256-<hex digest>`, so identical bytes share an id.
#[derive(Default)]
pub struct MemoryContentStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content_id(bytes: &[u8]) -> String {
        format!("sha256-{}", hex::encode(Sha256::digest(bytes)))
    }

    /// Drop a blob, as if it had been unpinned and garbage collected.
    pub fn remove(&self, content_id: &str) -> bool {
        self.blobs
            .lock()
            .map(|mut blobs| blobs.remove(content_id).is_some())
            .unwrap_or(false)
    }

    /// Overwrite the bytes behind an id.
    pub fn replace(&self, content_id: &str, bytes: Vec<u8>) {
        if let Ok(mut blobs) = self.blobs.lock() {
            blobs.insert(content_id.to_string(), bytes);
        }
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().map(|blobs| blobs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn add(&self, bytes: Vec<u8>) -> Result<String, ContentError> {
        let content_id = Self::content_id(&bytes);
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| ContentError::Unavailable("memory store lock poisoned".to_string()))?;
        blobs.insert(content_id.clone(), bytes);
        Ok(content_id)
    }

    async fn cat(&self, content_id: &str) -> Result<Vec<u8>, ContentError> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| ContentError::Unavailable("memory store lock poisoned".to_string()))?;
        blobs
            .get(content_id)
            .cloned()
            .ok_or_else(|| ContentError::NotFound(content_id.to_string()))
    }
}
