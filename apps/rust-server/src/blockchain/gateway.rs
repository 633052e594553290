// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Contract gateway bound to the wallet session.
//!
//! Every call first checks that the session is connected; state-changing
//! calls are sent from the session's active account with a fixed gas
//! ceiling. Revert reasons are passed through untouched.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;

use super::types::{
    IssueCredentialCall, OnChainCredential, RegisterResumeCall, ResumeRecord, TxOutcome,
};
use crate::wallet::WalletSession;

/// Default bound for read calls.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Default bound for waiting on a transaction receipt.
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(300);

/// Per-call gas ceilings for state-changing calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasLimits {
    pub issue_credential: u64,
    pub register_resume: u64,
    pub grant_access: u64,
}

impl Default for GasLimits {
    fn default() -> Self {
        Self {
            issue_credential: 500_000,
            register_resume: 800_000,
            grant_access: 200_000,
        }
    }
}

/// Read and write access to the two contracts.
#[async_trait]
pub trait ContractBackend: Send + Sync {
    async fn get_credential(&self, id: u64) -> Result<OnChainCredential, GatewayError>;

    async fn get_resume(&self, id: u64) -> Result<ResumeRecord, GatewayError>;

    /// Resume ids exactly as stored on-chain; callers narrow them.
    async fn get_candidate_resumes(&self, candidate: Address) -> Result<Vec<U256>, GatewayError>;

    async fn issue_credential(
        &self,
        from: Address,
        gas_limit: u64,
        call: IssueCredentialCall,
    ) -> Result<TxOutcome, GatewayError>;

    async fn register_resume(
        &self,
        from: Address,
        gas_limit: u64,
        call: RegisterResumeCall,
    ) -> Result<TxOutcome, GatewayError>;

    async fn grant_access(
        &self,
        from: Address,
        gas_limit: u64,
        resume_id: u64,
        recruiter: Address,
    ) -> Result<B256, GatewayError>;
}

/// Typed proxy over the credential and resume contracts.
#[derive(Clone)]
pub struct ContractGateway {
    backend: Option<Arc<dyn ContractBackend>>,
    session: WalletSession,
    gas: GasLimits,
    call_timeout: Duration,
    confirmation_timeout: Duration,
}

impl ContractGateway {
    /// Create a gateway. `backend` is `None` when no RPC endpoint is configured.
    pub fn new(backend: Option<Arc<dyn ContractBackend>>, session: WalletSession) -> Self {
        Self {
            backend,
            session,
            gas: GasLimits::default(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
        }
    }

    pub fn with_gas_limits(mut self, gas: GasLimits) -> Self {
        self.gas = gas;
        self
    }

    pub fn with_timeouts(mut self, call: Duration, confirmation: Duration) -> Self {
        self.call_timeout = call;
        self.confirmation_timeout = confirmation;
        self
    }

    pub fn gas_limits(&self) -> GasLimits {
        self.gas
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Backend and sender for a call, or `NotInitialized` before a successful connect.
    pub async fn ensure_ready(&self) -> Result<(&dyn ContractBackend, Address), GatewayError> {
        let backend = self.backend.as_deref().ok_or(GatewayError::NotInitialized)?;
        let state = self.session.snapshot().await;
        match (state.connected, state.active_account) {
            (true, Some(account)) => Ok((backend, account)),
            _ => Err(GatewayError::NotInitialized),
        }
    }

    pub async fn get_credential(&self, id: u64) -> Result<OnChainCredential, GatewayError> {
        let (backend, _) = self.ensure_ready().await?;
        bounded(self.call_timeout, backend.get_credential(id)).await
    }

    pub async fn get_resume(&self, id: u64) -> Result<ResumeRecord, GatewayError> {
        let (backend, _) = self.ensure_ready().await?;
        bounded(self.call_timeout, backend.get_resume(id)).await
    }

    pub async fn get_candidate_resumes(
        &self,
        candidate: Address,
    ) -> Result<Vec<U256>, GatewayError> {
        let (backend, _) = self.ensure_ready().await?;
        bounded(self.call_timeout, backend.get_candidate_resumes(candidate)).await
    }

    pub async fn issue_credential(
        &self,
        call: IssueCredentialCall,
    ) -> Result<TxOutcome, GatewayError> {
        let (backend, from) = self.ensure_ready().await?;
        tracing::info!(
            from = %from,
            candidate = %call.candidate,
            content_id = %call.content_id,
            gas_limit = self.gas.issue_credential,
            "Sending issueCredential transaction"
        );
        bounded(
            self.confirmation_timeout,
            backend.issue_credential(from, self.gas.issue_credential, call),
        )
        .await
    }

    pub async fn register_resume(
        &self,
        call: RegisterResumeCall,
    ) -> Result<TxOutcome, GatewayError> {
        let (backend, from) = self.ensure_ready().await?;
        tracing::info!(
            from = %from,
            content_id = %call.content_id,
            gas_limit = self.gas.register_resume,
            "Sending registerResume transaction"
        );
        bounded(
            self.confirmation_timeout,
            backend.register_resume(from, self.gas.register_resume, call),
        )
        .await
    }

    pub async fn grant_access(
        &self,
        resume_id: u64,
        recruiter: Address,
    ) -> Result<B256, GatewayError> {
        let (backend, from) = self.ensure_ready().await?;
        tracing::info!(
            from = %from,
            resume_id,
            recruiter = %recruiter,
            gas_limit = self.gas.grant_access,
            "Sending grantAccess transaction"
        );
        bounded(
            self.confirmation_timeout,
            backend.grant_access(from, self.gas.grant_access, resume_id, recruiter),
        )
        .await
    }
}

async fn bounded<T>(
    limit: Duration,
    call: impl Future<Output = Result<T, GatewayError>>,
) -> Result<T, GatewayError> {
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| GatewayError::Timeout(limit))?
}

/// Errors raised by contract calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("Contracts not initialized: connect a wallet first")]
    NotInitialized,

    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Record {0} does not exist")]
    RecordNotFound(u64),

    #[error("Contract call failed: {0}")]
    CallFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Contract call timed out after {0:?}")]
    Timeout(Duration),
}
