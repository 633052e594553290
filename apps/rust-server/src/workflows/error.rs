// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Errors surfaced by the credential and resume workflows.

use std::time::Duration;

use crate::blockchain::gateway::GatewayError;
use crate::content::ContentError;
use crate::wallet::SessionError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("No wallet provider detected. Configure a wallet to continue.")]
    ProviderMissing,

    #[error("No accounts found. Please unlock or connect your wallet.")]
    NoAccountsAuthorized,

    #[error("Network switch failed: {0}")]
    NetworkSwitchFailed(String),

    #[error("IPFS not initialized: {0}")]
    StoreUnavailable(String),

    #[error("Content not found: {0}")]
    ContentNotFound(String),

    #[error("Contracts not initialized: connect a wallet first")]
    ContractNotInitialized,

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Record {0} does not exist")]
    RecordNotFound(u64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Stored content is not valid JSON: {0}")]
    InvalidContent(String),

    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Wallet provider error: {0}")]
    Provider(String),
}

impl WorkflowError {
    /// Stable machine-readable code.
    pub fn error_code(&self) -> &'static str {
        match self {
            WorkflowError::ProviderMissing => "provider_missing",
            WorkflowError::NoAccountsAuthorized => "no_accounts_authorized",
            WorkflowError::NetworkSwitchFailed(_) => "network_switch_failed",
            WorkflowError::StoreUnavailable(_) => "store_unavailable",
            WorkflowError::ContentNotFound(_) => "content_not_found",
            WorkflowError::ContractNotInitialized => "contract_not_initialized",
            WorkflowError::TransactionFailed(_) => "transaction_failed",
            WorkflowError::RecordNotFound(_) => "record_not_found",
            WorkflowError::InvalidInput(_) => "invalid_input",
            WorkflowError::InvalidContent(_) => "invalid_content",
            WorkflowError::Timeout(_) => "timeout",
            WorkflowError::Provider(_) => "provider_error",
        }
    }
}

impl From<SessionError> for WorkflowError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::ProviderMissing => WorkflowError::ProviderMissing,
            SessionError::NoAccountsAuthorized => WorkflowError::NoAccountsAuthorized,
            SessionError::NetworkSwitchFailed(e) => WorkflowError::NetworkSwitchFailed(e.to_string()),
            SessionError::Provider(e) => WorkflowError::Provider(e.to_string()),
            e @ SessionError::InvalidResponse { .. } => WorkflowError::Provider(e.to_string()),
            SessionError::Timeout(limit) => WorkflowError::Timeout(limit),
        }
    }
}

impl From<ContentError> for WorkflowError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::Unavailable(reason) => WorkflowError::StoreUnavailable(reason),
            ContentError::NotFound(content_id) => WorkflowError::ContentNotFound(content_id),
            ContentError::Timeout(limit) => WorkflowError::Timeout(limit),
            ContentError::Serialization(reason) => WorkflowError::InvalidInput(reason),
        }
    }
}

impl From<GatewayError> for WorkflowError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotInitialized => WorkflowError::ContractNotInitialized,
            GatewayError::InvalidRpcUrl(reason) | GatewayError::CallFailed(reason) => {
                WorkflowError::Provider(reason)
            }
            GatewayError::RecordNotFound(id) => WorkflowError::RecordNotFound(id),
            GatewayError::TransactionFailed(reason) => WorkflowError::TransactionFailed(reason),
            GatewayError::Timeout(limit) => WorkflowError::Timeout(limit),
        }
    }
}
