// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet provider boundary (EIP-1193 style request/notification API).

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

use alloy::{
    network::Ethereum,
    primitives::Address,
    providers::{Provider, RootProvider},
    transports::TransportError,
};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use super::watcher::AccountWatcher;

/// Returned by `wallet_switchEthereumChain` when the wallet does not know the chain.
pub const UNRECOGNIZED_CHAIN_ERROR: i64 = 4902;

/// The user rejected the request.
pub const USER_REJECTED_REQUEST: i64 = 4001;

/// JSON-RPC internal error, used for transport failures without an error payload.
pub const INTERNAL_ERROR: i64 = -32603;

/// Error object returned by a provider request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRpcError {
    pub code: i64,
    pub message: String,
}

impl ProviderRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn from_transport(err: TransportError) -> Self {
        match err.as_error_resp() {
            Some(payload) => Self::new(payload.code, payload.message.to_string()),
            None => Self::new(INTERNAL_ERROR, err.to_string()),
        }
    }
}

impl fmt::Display for ProviderRpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for ProviderRpcError {}

/// Notification pushed by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    AccountsChanged(Vec<Address>),
    ChainChanged(String),
}

/// A wallet that answers JSON-RPC requests and pushes account/chain changes.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderRpcError>;

    /// Register `sink` for `accountsChanged` / `chainChanged` notifications.
    fn subscribe(&self, sink: UnboundedSender<ProviderEvent>);
}

/// Provider backed by a JSON-RPC node whose accounts are unlocked
/// (Ganache, Anvil, a wallet bridge).
///
/// Nodes do not push wallet notifications over HTTP, so subscribing starts
/// an [`AccountWatcher`] that polls `eth_accounts` and `eth_chainId`.
pub struct RpcWalletProvider {
    client: RootProvider<Ethereum>,
    poll_interval: Duration,
    shutdown: CancellationToken,
}

impl RpcWalletProvider {
    pub fn new(
        rpc_url: &str,
        poll_interval: Duration,
        shutdown: CancellationToken,
    ) -> Result<Self, url::ParseError> {
        let url: url::Url = rpc_url.parse()?;
        Ok(Self {
            client: RootProvider::new_http(url),
            poll_interval,
            shutdown,
        })
    }
}

#[async_trait]
impl WalletProvider for RpcWalletProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderRpcError> {
        tracing::debug!(method, "Wallet provider request");
        self.client
            .raw_request::<Value, Value>(Cow::Owned(method.to_string()), params)
            .await
            .map_err(ProviderRpcError::from_transport)
    }

    fn subscribe(&self, sink: UnboundedSender<ProviderEvent>) {
        let watcher = AccountWatcher::new(self.client.clone(), sink, self.poll_interval);
        tokio::spawn(watcher.run(self.shutdown.clone()));
    }
}
