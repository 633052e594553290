// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet integration.
//!
//! - `provider` - EIP-1193 style provider trait and the JSON-RPC implementation
//! - `watcher` - polling task that turns node state into push notifications
//! - `session` - the serialised session state machine

pub mod provider;
pub mod session;
pub mod watcher;

pub use provider::{ProviderEvent, ProviderRpcError, RpcWalletProvider, WalletProvider};
pub use session::{ActiveNetwork, Connection, SessionError, SessionEvent, SessionState, WalletSession};
