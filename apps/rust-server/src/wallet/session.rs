// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet session: the only shared mutable state in the service.
//!
//! All mutations (connect, disconnect, network switch and provider
//! notifications) go through one `Mutex<SessionState>`. Provider
//! notifications arrive on an internal queue that [`WalletSession::run`]
//! drains, so provider callback timing never touches the state directly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use super::provider::{ProviderEvent, ProviderRpcError, WalletProvider, UNRECOGNIZED_CHAIN_ERROR};
use crate::blockchain::networks::{chain_id_to_decimal, network_name, NetworkKey};

/// Default bound for a single provider request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Capacity of the session notice channel.
const NOTICE_CAPACITY: usize = 32;

/// Network the wallet currently points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveNetwork {
    /// Hex chain id as reported by the wallet
    pub chain_id: String,
    /// Decimal network id
    pub network_id: Option<u64>,
    /// Display name ("Unknown Network" for unregistered chains)
    pub name: String,
}

impl ActiveNetwork {
    pub fn from_chain_id(chain_id: &str) -> Self {
        Self {
            chain_id: chain_id.to_string(),
            network_id: chain_id_to_decimal(chain_id),
            name: network_name(chain_id).to_string(),
        }
    }
}

/// Session fields. `Default` is the disconnected state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub connected: bool,
    #[schema(value_type = Option<String>)]
    pub active_account: Option<Address>,
    #[schema(value_type = Vec<String>)]
    pub accounts: Vec<Address>,
    pub active_network: Option<ActiveNetwork>,
}

/// Result of a successful connect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Connection {
    #[schema(value_type = String)]
    pub account: Address,
    pub network: Option<ActiveNetwork>,
}

/// Session transitions broadcast to interested tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Connected(Address),
    AccountChanged(Address),
    Disconnected,
    /// The wallet moved to another chain; consumers must start over.
    ReloadRequired { chain_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("No wallet provider detected. Configure a wallet to continue.")]
    ProviderMissing,

    #[error("No accounts found. Please unlock or connect your wallet.")]
    NoAccountsAuthorized,

    #[error("Network switch failed: {0}")]
    NetworkSwitchFailed(ProviderRpcError),

    #[error("Wallet provider error: {0}")]
    Provider(ProviderRpcError),

    #[error("Malformed wallet response to {method}: {reason}")]
    InvalidResponse { method: &'static str, reason: String },

    #[error("Wallet provider did not answer within {0:?}")]
    Timeout(Duration),
}

struct SessionInner {
    provider: Option<Arc<dyn WalletProvider>>,
    state: Mutex<SessionState>,
    events_tx: mpsc::UnboundedSender<ProviderEvent>,
    events_rx: Mutex<Option<mpsc::UnboundedReceiver<ProviderEvent>>>,
    subscribed: AtomicBool,
    notices: broadcast::Sender<SessionEvent>,
    request_timeout: Duration,
}

/// Cloneable handle to the wallet session.
#[derive(Clone)]
pub struct WalletSession {
    inner: Arc<SessionInner>,
}

impl WalletSession {
    /// Create a disconnected session. `provider` is `None` when no wallet is configured.
    pub fn new(provider: Option<Arc<dyn WalletProvider>>) -> Self {
        Self::with_request_timeout(provider, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_request_timeout(
        provider: Option<Arc<dyn WalletProvider>>,
        request_timeout: Duration,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Self {
            inner: Arc::new(SessionInner {
                provider,
                state: Mutex::new(SessionState::default()),
                events_tx,
                events_rx: Mutex::new(Some(events_rx)),
                subscribed: AtomicBool::new(false),
                notices,
                request_timeout,
            }),
        }
    }

    pub fn has_provider(&self) -> bool {
        self.inner.provider.is_some()
    }

    pub async fn snapshot(&self) -> SessionState {
        self.inner.state.lock().await.clone()
    }

    pub async fn is_connected(&self) -> bool {
        let state = self.inner.state.lock().await;
        state.connected && !state.accounts.is_empty()
    }

    pub async fn current_account(&self) -> Option<Address> {
        self.inner.state.lock().await.active_account
    }

    /// Receive session transitions (connect, account switch, disconnect, reload).
    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.notices.subscribe()
    }

    /// Request account access and record the first authorized account.
    ///
    /// On failure the session is left exactly as it was.
    pub async fn connect(&self) -> Result<Connection, SessionError> {
        let provider = self.provider()?;
        let mut state = self.inner.state.lock().await;

        let accounts = self.request_accounts(provider).await?;
        let account = *accounts.first().ok_or(SessionError::NoAccountsAuthorized)?;

        let network = match self.query_chain_id(provider).await {
            Ok(chain_id) => Some(ActiveNetwork::from_chain_id(&chain_id)),
            Err(e) => {
                warn!(error = %e, "Could not read wallet chain id");
                None
            }
        };

        if !self.inner.subscribed.swap(true, Ordering::SeqCst) {
            provider.subscribe(self.inner.events_tx.clone());
        }

        *state = SessionState {
            connected: true,
            active_account: Some(account),
            accounts,
            active_network: network.clone(),
        };
        drop(state);

        info!(
            account = %account,
            network = network.as_ref().map(|n| n.name.as_str()).unwrap_or("unknown"),
            "Wallet connected"
        );
        self.notify(SessionEvent::Connected(account));

        Ok(Connection { account, network })
    }

    /// Reset to the disconnected state. Idempotent.
    pub async fn disconnect(&self) {
        let mut state = self.inner.state.lock().await;
        let was_connected = state.connected;
        *state = SessionState::default();
        drop(state);

        if was_connected {
            info!("Wallet disconnected");
            self.notify(SessionEvent::Disconnected);
        }
    }

    /// Query the wallet's current chain without touching session state.
    pub async fn current_network(&self) -> Result<ActiveNetwork, SessionError> {
        let provider = self.provider()?;
        let chain_id = self.query_chain_id(provider).await?;
        Ok(ActiveNetwork::from_chain_id(&chain_id))
    }

    /// Ask the wallet to switch to `target`, adding the chain if the wallet
    /// does not know it yet.
    pub async fn switch_network(
        &self,
        target: NetworkKey,
    ) -> Result<Option<ActiveNetwork>, SessionError> {
        let provider = self.provider()?;
        let descriptor = target.descriptor();
        let mut state = self.inner.state.lock().await;

        let switched = self
            .request(
                provider,
                "wallet_switchEthereumChain",
                json!([{ "chainId": descriptor.chain_id }]),
            )
            .await;

        match switched {
            Ok(_) => {}
            Err(SessionError::Provider(e)) if e.code == UNRECOGNIZED_CHAIN_ERROR => {
                info!(chain_id = descriptor.chain_id, "Chain unknown to wallet, adding it");
                let add_params = json!([descriptor]);
                match self
                    .request(provider, "wallet_addEthereumChain", add_params)
                    .await
                {
                    Ok(_) => {}
                    Err(SessionError::Provider(e)) => return Err(SessionError::NetworkSwitchFailed(e)),
                    Err(e) => return Err(e),
                }
            }
            Err(SessionError::Provider(e)) => return Err(SessionError::NetworkSwitchFailed(e)),
            Err(e) => return Err(e),
        }

        info!(network = %target, chain_id = descriptor.chain_id, "Wallet network switched");

        if !state.connected {
            return Ok(None);
        }

        let network = match self.query_chain_id(provider).await {
            Ok(chain_id) => ActiveNetwork::from_chain_id(&chain_id),
            Err(e) => {
                warn!(error = %e, "Could not confirm chain after switch");
                ActiveNetwork::from_chain_id(descriptor.chain_id)
            }
        };
        state.active_network = Some(network.clone());
        Ok(Some(network))
    }

    /// Apply a provider notification.
    pub async fn handle_event(&self, event: ProviderEvent) {
        let mut state = self.inner.state.lock().await;
        match event {
            ProviderEvent::AccountsChanged(accounts) => {
                let Some(first) = accounts.first().copied() else {
                    let was_connected = state.connected;
                    *state = SessionState::default();
                    drop(state);
                    if was_connected {
                        info!("Wallet reported no accounts, disconnecting");
                        self.notify(SessionEvent::Disconnected);
                    }
                    return;
                };

                if !state.connected {
                    debug!("Ignoring account change while disconnected");
                    return;
                }

                let changed = state.active_account != Some(first);
                state.accounts = accounts;
                state.active_account = Some(first);
                drop(state);

                if changed {
                    info!(account = %first, "Active wallet account changed");
                    self.notify(SessionEvent::AccountChanged(first));
                }
            }
            ProviderEvent::ChainChanged(chain_id) => {
                *state = SessionState::default();
                drop(state);
                info!(chain_id = %chain_id, "Wallet chain changed, session reset");
                self.notify(SessionEvent::ReloadRequired { chain_id });
            }
        }
    }

    /// Drain provider notifications until the cancellation token is triggered.
    ///
    /// Only the first call gets the queue; later calls return immediately.
    pub async fn run(self, shutdown: CancellationToken) {
        let Some(mut events) = self.inner.events_rx.lock().await.take() else {
            warn!("Wallet session loop already running");
            return;
        };

        info!("Wallet session loop starting");
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event).await,
                    None => return,
                },
                _ = shutdown.cancelled() => {
                    info!("Wallet session loop shutting down");
                    return;
                }
            }
        }
    }

    fn provider(&self) -> Result<&dyn WalletProvider, SessionError> {
        self.inner
            .provider
            .as_deref()
            .ok_or(SessionError::ProviderMissing)
    }

    fn notify(&self, event: SessionEvent) {
        // No receivers is fine.
        let _ = self.inner.notices.send(event);
    }

    async fn request(
        &self,
        provider: &dyn WalletProvider,
        method: &str,
        params: Value,
    ) -> Result<Value, SessionError> {
        let limit = self.inner.request_timeout;
        match tokio::time::timeout(limit, provider.request(method, params)).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(SessionError::Provider(e)),
            Err(_) => Err(SessionError::Timeout(limit)),
        }
    }

    async fn request_accounts(
        &self,
        provider: &dyn WalletProvider,
    ) -> Result<Vec<Address>, SessionError> {
        let value = self
            .request(provider, "eth_requestAccounts", json!([]))
            .await?;
        serde_json::from_value(value).map_err(|e| SessionError::InvalidResponse {
            method: "eth_requestAccounts",
            reason: e.to_string(),
        })
    }

    async fn query_chain_id(&self, provider: &dyn WalletProvider) -> Result<String, SessionError> {
        let value = self.request(provider, "eth_chainId", json!([])).await?;
        match value {
            Value::String(chain_id) => Ok(chain_id),
            other => Err(SessionError::InvalidResponse {
                method: "eth_chainId",
                reason: format!("expected hex string, got {other}"),
            }),
        }
    }
}
