// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Credential and Resume Workflows
//!
//! Strictly linear sequences over the content store and the contract
//! gateway. A workflow reports success only after both the upload and the
//! transaction confirmation succeeded; a failure after the upload leaves the
//! content orphaned in the store (logged, never rolled back).

pub mod cache;
pub mod credentials;
pub mod error;
pub mod resumes;

use std::sync::Arc;

use alloy::primitives::Address;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::blockchain::gateway::ContractGateway;
use crate::content::ContentStoreClient;
use crate::wallet::SessionEvent;

pub use cache::VerificationCache;
pub use credentials::IssuedCredential;
pub use error::WorkflowError;
pub use resumes::{RegisterResumeRequest, RegisteredResume};

#[derive(Clone)]
pub struct Workflows {
    gateway: ContractGateway,
    content: ContentStoreClient,
    cache: Option<Arc<VerificationCache>>,
}

impl Workflows {
    pub fn new(gateway: ContractGateway, content: ContentStoreClient) -> Self {
        Self {
            gateway,
            content,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: VerificationCache) -> Self {
        self.cache = Some(Arc::new(cache));
        self
    }

    pub fn gateway(&self) -> &ContractGateway {
        &self.gateway
    }

    pub fn content(&self) -> &ContentStoreClient {
        &self.content
    }

    pub fn cache(&self) -> Option<&VerificationCache> {
        self.cache.as_deref()
    }

    /// Drop cached records whenever the session disconnects or the chain
    /// changes, until the cancellation token is triggered.
    pub async fn watch_session(
        self,
        mut events: broadcast::Receiver<SessionEvent>,
        shutdown: CancellationToken,
    ) {
        loop {
            let event = tokio::select! {
                event = events.recv() => event,
                _ = shutdown.cancelled() => return,
            };

            match event {
                Ok(SessionEvent::ReloadRequired { chain_id }) => {
                    info!(chain_id = %chain_id, "Chain changed, dropping verified records");
                    self.clear_cache();
                }
                Ok(SessionEvent::Disconnected) => self.clear_cache(),
                Ok(_) => {}
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "Session events lagged, dropping verified records");
                    self.clear_cache();
                }
                Err(RecvError::Closed) => return,
            }
        }
    }

    fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }
}

/// Parse an on-chain record id, decimal or `0x`-prefixed hex.
pub fn parse_record_id(raw: &str) -> Result<u64, WorkflowError> {
    let trimmed = raw.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse::<u64>(),
    };
    parsed.map_err(|_| WorkflowError::InvalidInput(format!("'{raw}' is not a numeric record id")))
}

/// Parse a `0x`-prefixed account address.
pub fn parse_address(raw: &str, field: &str) -> Result<Address, WorkflowError> {
    raw.trim()
        .parse::<Address>()
        .map_err(|_| WorkflowError::InvalidInput(format!("{field} '{raw}' is not a valid address")))
}
