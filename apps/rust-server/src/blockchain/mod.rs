// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EVM integration for the credential and resume contracts.
//!
//! This module provides:
//! - The registry of networks a wallet can be switched to
//! - `sol!` bindings for `CredentialVerifier` and `ResumeRegistry`
//! - A gateway that binds contract calls to the wallet session

pub mod contracts;
pub mod gateway;
pub mod networks;
pub mod types;

pub use contracts::{AlloyContracts, ContractAddresses};
pub use gateway::{ContractBackend, ContractGateway, GasLimits, GatewayError};
pub use types::*;
