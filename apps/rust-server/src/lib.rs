// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Resume Chain Server - wallet, IPFS and credential contract integration
//!
//! Backend for the resume-screening demo. It connects a wallet provider,
//! stores credential documents and resume files in a content-addressed
//! store and anchors them in the `CredentialVerifier` and `ResumeRegistry`
//! contracts.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `blockchain` - networks, contract bindings and the contract gateway
//! - `content` - IPFS and in-memory content stores
//! - `wallet` - wallet provider and session state
//! - `workflows` - issue/verify credential, register/list/grant resume

pub mod api;
pub mod blockchain;
pub mod config;
pub mod content;
pub mod error;
pub mod models;
pub mod state;
pub mod telemetry;
pub mod wallet;
pub mod workflows;

#[cfg(test)]
pub(crate) mod testing;
