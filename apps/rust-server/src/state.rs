// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::blockchain::contracts;
use crate::blockchain::gateway::{ContractBackend, ContractGateway};
use crate::config::{AppConfig, ContentBackend};
use crate::content::{ContentStore, ContentStoreClient, IpfsClient, MemoryContentStore};
use crate::wallet::{RpcWalletProvider, WalletProvider, WalletSession};
use crate::workflows::{VerificationCache, Workflows};

#[derive(Clone)]
pub struct AppState {
    pub session: WalletSession,
    pub workflows: Workflows,
}

impl AppState {
    pub fn new(session: WalletSession, workflows: Workflows) -> Self {
        Self { session, workflows }
    }

    /// Wire the session, content store and contracts from configuration.
    ///
    /// Components that fail to initialise are left unconfigured and report
    /// their error kind on use.
    pub fn from_config(config: &AppConfig, shutdown: &CancellationToken) -> Self {
        let provider: Option<Arc<dyn WalletProvider>> = match &config.wallet_rpc_url {
            Some(url) => match RpcWalletProvider::new(url, config.wallet_poll_interval, shutdown.clone()) {
                Ok(provider) => Some(Arc::new(provider)),
                Err(e) => {
                    warn!(url = %url, error = %e, "Invalid wallet RPC URL, wallet disabled");
                    None
                }
            },
            None => None,
        };
        let session = WalletSession::with_request_timeout(provider, config.call_timeout);

        let backend: Option<Arc<dyn ContractBackend>> = match &config.wallet_rpc_url {
            Some(url) => match contracts::connect_http(url, config.contracts) {
                Ok(backend) => Some(backend),
                Err(e) => {
                    warn!(error = %e, "Contract backend unavailable");
                    None
                }
            },
            None => None,
        };
        let gateway = ContractGateway::new(backend, session.clone())
            .with_gas_limits(config.gas)
            .with_timeouts(config.call_timeout, config.confirmation_timeout);

        let store: Option<Arc<dyn ContentStore>> = match &config.content {
            ContentBackend::Ipfs(url) => match IpfsClient::new(url, config.call_timeout) {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => {
                    warn!(error = %e, "IPFS client unavailable");
                    None
                }
            },
            ContentBackend::Memory => Some(Arc::new(MemoryContentStore::new())),
            ContentBackend::Disabled => None,
        };
        let content = ContentStoreClient::new(store).with_timeout(config.call_timeout);

        let mut workflows = Workflows::new(gateway, content);
        if let Some(cache) = config.verify_cache {
            workflows = workflows.with_cache(VerificationCache::new(cache.capacity, cache.ttl));
        }

        info!(
            wallet = session.has_provider(),
            contracts = workflows.gateway().has_backend(),
            content_store = workflows.content().is_initialized(),
            verify_cache = workflows.cache().is_some(),
            "Application state initialised"
        );

        Self::new(session, workflows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned()).unwrap()
    }

    #[tokio::test]
    async fn disabled_components_stay_unconfigured() {
        let state = AppState::from_config(
            &config(&[("WALLET_RPC_URL", "none"), ("IPFS_API_URL", "none")]),
            &CancellationToken::new(),
        );
        assert!(!state.session.has_provider());
        assert!(!state.workflows.gateway().has_backend());
        assert!(!state.workflows.content().is_initialized());
        assert!(state.workflows.cache().is_none());
    }

    #[tokio::test]
    async fn memory_store_and_cache_are_wired() {
        let state = AppState::from_config(
            &config(&[("IPFS_API_URL", "memory"), ("VERIFY_CACHE_CAPACITY", "16")]),
            &CancellationToken::new(),
        );
        assert!(state.session.has_provider());
        assert!(state.workflows.gateway().has_backend());
        assert!(state.workflows.content().is_initialized());
        assert!(state.workflows.cache().is_some());
    }
}
