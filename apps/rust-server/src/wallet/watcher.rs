// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Account Watcher
//!
//! Background task that turns a polling JSON-RPC node into a push-style
//! wallet provider. Every `poll_interval` it reads `eth_accounts` and
//! `eth_chainId` and forwards differences as [`ProviderEvent`]s.
//!
//! The first successful poll only records a baseline. Polling errors are
//! logged and retried on the next tick; the watcher stops when the
//! cancellation token fires or the session drops its receiver.

use std::borrow::Cow;
use std::time::Duration;

use alloy::{
    network::Ethereum,
    primitives::Address,
    providers::{Provider, RootProvider},
};
use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::provider::ProviderEvent;

/// Last observed wallet state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observed {
    pub accounts: Vec<Address>,
    pub chain_id: String,
}

pub struct AccountWatcher {
    client: RootProvider<Ethereum>,
    sink: UnboundedSender<ProviderEvent>,
    poll_interval: Duration,
}

impl AccountWatcher {
    pub fn new(
        client: RootProvider<Ethereum>,
        sink: UnboundedSender<ProviderEvent>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            client,
            sink,
            poll_interval,
        }
    }

    /// Run the polling loop until the cancellation token is triggered.
    ///
    /// Spawned by `RpcWalletProvider::subscribe`:
    /// ```rust,ignore
    /// tokio::spawn(watcher.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.poll_interval.as_secs(),
            "Wallet account watcher starting"
        );

        let mut last: Option<Observed> = None;

        loop {
            if shutdown.is_cancelled() || self.sink.is_closed() {
                info!("Wallet account watcher shutting down");
                return;
            }

            match self.poll().await {
                Ok(current) => {
                    if let Some(previous) = &last {
                        for event in diff(previous, &current) {
                            debug!(?event, "Wallet state changed");
                            if self.sink.send(event).is_err() {
                                info!("Wallet session gone, stopping account watcher");
                                return;
                            }
                        }
                    }
                    last = Some(current);
                }
                Err(e) => {
                    warn!(error = %e, "Wallet poll failed, will retry");
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {},
                _ = shutdown.cancelled() => {
                    info!("Wallet account watcher shutting down");
                    return;
                }
            }
        }
    }

    async fn poll(&self) -> Result<Observed, String> {
        let accounts: Vec<Address> = self
            .client
            .raw_request::<Value, Vec<Address>>(Cow::Borrowed("eth_accounts"), json!([]))
            .await
            .map_err(|e| e.to_string())?;

        let chain_id: String = self
            .client
            .raw_request::<Value, String>(Cow::Borrowed("eth_chainId"), json!([]))
            .await
            .map_err(|e| e.to_string())?;

        Ok(Observed { accounts, chain_id })
    }
}

/// Events describing the change from `previous` to `current`.
///
/// A chain change is reported before an account change, matching the order
/// a consumer needs to "start over" first.
pub fn diff(previous: &Observed, current: &Observed) -> Vec<ProviderEvent> {
    let mut events = Vec::new();
    if !previous.chain_id.eq_ignore_ascii_case(&current.chain_id) {
        events.push(ProviderEvent::ChainChanged(current.chain_id.clone()));
    }
    if previous.accounts != current.accounts {
        events.push(ProviderEvent::AccountsChanged(current.accounts.clone()));
    }
    events
}
