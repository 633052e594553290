// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! `CredentialVerifier` and `ResumeRegistry` contract bindings.

use alloy::{
    primitives::{address, Address, B256, U256},
    providers::{Provider, ProviderBuilder},
    rpc::types::TransactionReceipt,
    sol,
    sol_types::SolEvent,
};
use async_trait::async_trait;
use std::sync::Arc;

use super::gateway::{ContractBackend, GatewayError};
use super::types::{
    IssueCredentialCall, OnChainCredential, RegisterResumeCall, ResumeRecord, TxOutcome,
};

sol! {
    #[sol(rpc)]
    interface ICredentialVerifier {
        struct Credential {
            uint256 id;
            bytes32 credentialHash;
            string ipfsHash;
            address candidate;
            address issuer;
            string credentialType;
            string institutionName;
            uint256 timestamp;
            bool isVerified;
        }

        event CredentialIssued(
            uint256 indexed credentialId,
            address indexed candidate,
            address indexed issuer,
            string credentialType
        );

        function issueCredential(
            bytes32 credentialHash,
            string ipfsHash,
            address candidate,
            string credentialType,
            string institutionName
        ) external returns (uint256);

        function getCredential(uint256 credentialId) external view returns (Credential memory);
    }
}

sol! {
    #[sol(rpc)]
    interface IResumeRegistry {
        struct Resume {
            uint256 id;
            bytes32 resumeHash;
            string ipfsHash;
            address candidate;
            uint256 timestamp;
            bool isActive;
            string[] skills;
            uint256 experienceYears;
            string education;
            bool isPublic;
        }

        event ResumeRegistered(uint256 indexed resumeId, address indexed candidate, string ipfsHash);

        function registerResume(
            bytes32 resumeHash,
            string ipfsHash,
            string[] skills,
            uint256 experienceYears,
            string education,
            bool isPublic
        ) external returns (uint256);

        function getResume(uint256 resumeId) external view returns (Resume memory);

        function getCandidateResumes(address candidate) external view returns (uint256[] memory);

        function grantAccess(uint256 resumeId, address recruiter) external;
    }
}

/// Deployed contract addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractAddresses {
    pub credential_verifier: Address,
    pub resume_registry: Address,
}

impl Default for ContractAddresses {
    /// Addresses of the Ganache demo deployment.
    fn default() -> Self {
        Self {
            credential_verifier: address!("A050Ef051aF200f4336E366b269f1278B28a4F13"),
            resume_registry: address!("EF2066ad1Bf778558E3Dfc908A61C294dB81E4b3"),
        }
    }
}

/// Contract backend talking to a JSON-RPC node through alloy.
///
/// Transactions are sent unsigned (`eth_sendTransaction`), so the node's
/// wallet signs for the `from` account, the same way an injected browser
/// wallet would.
pub struct AlloyContracts<P> {
    credential: ICredentialVerifier::ICredentialVerifierInstance<P>,
    resume: IResumeRegistry::IResumeRegistryInstance<P>,
}

impl<P: Provider + Clone> AlloyContracts<P> {
    pub fn new(provider: P, addresses: ContractAddresses) -> Self {
        Self {
            credential: ICredentialVerifier::new(addresses.credential_verifier, provider.clone()),
            resume: IResumeRegistry::new(addresses.resume_registry, provider),
        }
    }
}

/// Build a backend for the node at `rpc_url`.
pub fn connect_http(
    rpc_url: &str,
    addresses: ContractAddresses,
) -> Result<Arc<dyn ContractBackend>, GatewayError> {
    let url: url::Url = rpc_url
        .parse()
        .map_err(|e: url::ParseError| GatewayError::InvalidRpcUrl(e.to_string()))?;

    let provider = ProviderBuilder::new().connect_http(url);

    Ok(Arc::new(AlloyContracts::new(provider, addresses)))
}

#[async_trait]
impl<P> ContractBackend for AlloyContracts<P>
where
    P: Provider + Clone + Send + Sync + 'static,
{
    async fn get_credential(&self, id: u64) -> Result<OnChainCredential, GatewayError> {
        let raw = self
            .credential
            .getCredential(U256::from(id))
            .call()
            .await
            .map_err(|e| read_error(id, e))?;

        if raw.candidate == Address::ZERO {
            return Err(GatewayError::RecordNotFound(id));
        }

        Ok(OnChainCredential {
            id: narrow(raw.id, "credential id").map_err(GatewayError::CallFailed)?,
            candidate: raw.candidate,
            issuer: raw.issuer,
            is_verified: raw.isVerified,
            credential_type: raw.credentialType,
            institution_name: raw.institutionName,
            timestamp: narrow(raw.timestamp, "timestamp").map_err(GatewayError::CallFailed)?,
            content_id: raw.ipfsHash,
            content_hash: raw.credentialHash,
        })
    }

    async fn get_resume(&self, id: u64) -> Result<ResumeRecord, GatewayError> {
        let raw = self
            .resume
            .getResume(U256::from(id))
            .call()
            .await
            .map_err(|e| read_error(id, e))?;

        if raw.candidate == Address::ZERO {
            return Err(GatewayError::RecordNotFound(id));
        }

        Ok(ResumeRecord {
            id: narrow(raw.id, "resume id").map_err(GatewayError::CallFailed)?,
            candidate: raw.candidate,
            timestamp: narrow(raw.timestamp, "timestamp").map_err(GatewayError::CallFailed)?,
            is_active: raw.isActive,
            skills: raw.skills,
            experience_years: narrow(raw.experienceYears, "experience years")
                .map_err(GatewayError::CallFailed)?,
            education: raw.education,
            is_public: raw.isPublic,
            content_id: raw.ipfsHash,
        })
    }

    async fn get_candidate_resumes(&self, candidate: Address) -> Result<Vec<U256>, GatewayError> {
        self.resume
            .getCandidateResumes(candidate)
            .call()
            .await
            .map_err(|e| GatewayError::CallFailed(e.to_string()))
    }

    async fn issue_credential(
        &self,
        from: Address,
        gas_limit: u64,
        call: IssueCredentialCall,
    ) -> Result<TxOutcome, GatewayError> {
        let receipt = self
            .credential
            .issueCredential(
                call.credential_hash,
                call.content_id,
                call.candidate,
                call.credential_type,
                call.institution_name,
            )
            .from(from)
            .gas(gas_limit)
            .send()
            .await
            .map_err(|e| GatewayError::TransactionFailed(e.to_string()))?
            .get_receipt()
            .await
            .map_err(|e| GatewayError::TransactionFailed(e.to_string()))?;

        tx_outcome::<ICredentialVerifier::CredentialIssued>(&receipt, |event| event.credentialId)
    }

    async fn register_resume(
        &self,
        from: Address,
        gas_limit: u64,
        call: RegisterResumeCall,
    ) -> Result<TxOutcome, GatewayError> {
        let receipt = self
            .resume
            .registerResume(
                call.resume_hash,
                call.content_id,
                call.skills,
                U256::from(call.experience_years),
                call.education,
                call.is_public,
            )
            .from(from)
            .gas(gas_limit)
            .send()
            .await
            .map_err(|e| GatewayError::TransactionFailed(e.to_string()))?
            .get_receipt()
            .await
            .map_err(|e| GatewayError::TransactionFailed(e.to_string()))?;

        tx_outcome::<IResumeRegistry::ResumeRegistered>(&receipt, |event| event.resumeId)
    }

    async fn grant_access(
        &self,
        from: Address,
        gas_limit: u64,
        resume_id: u64,
        recruiter: Address,
    ) -> Result<B256, GatewayError> {
        let receipt = self
            .resume
            .grantAccess(U256::from(resume_id), recruiter)
            .from(from)
            .gas(gas_limit)
            .send()
            .await
            .map_err(|e| GatewayError::TransactionFailed(e.to_string()))?
            .get_receipt()
            .await
            .map_err(|e| GatewayError::TransactionFailed(e.to_string()))?;

        ensure_success(&receipt)
    }
}

/// Return the transaction hash, or fail if the receipt reports a revert.
fn ensure_success(receipt: &TransactionReceipt) -> Result<B256, GatewayError> {
    if receipt.status() {
        Ok(receipt.transaction_hash)
    } else {
        Err(GatewayError::TransactionFailed(format!(
            "transaction {:#x} reverted (gas used: {})",
            receipt.transaction_hash, receipt.gas_used
        )))
    }
}

/// Hash and emitted id of a confirmed transaction that must log `E`.
fn tx_outcome<E: SolEvent>(
    receipt: &TransactionReceipt,
    emitted_id: impl FnOnce(E) -> U256,
) -> Result<TxOutcome, GatewayError> {
    let transaction_hash = ensure_success(receipt)?;
    let event = receipt
        .inner
        .logs()
        .iter()
        .find_map(|log| log.log_decode::<E>().ok())
        .map(|decoded| decoded.inner.data)
        .ok_or_else(|| {
            GatewayError::TransactionFailed(format!(
                "transaction {transaction_hash:#x} did not emit {}",
                E::SIGNATURE
            ))
        })?;

    Ok(TxOutcome {
        transaction_hash,
        emitted_id: narrow(emitted_id(event), "emitted id").map_err(GatewayError::TransactionFailed)?,
    })
}

/// Reverted reads mean the record does not exist; anything else is an RPC failure.
fn read_error(id: u64, err: alloy::contract::Error) -> GatewayError {
    let reverted = match &err {
        alloy::contract::Error::TransportError(transport) => transport
            .as_error_resp()
            .map(|payload| payload.code == 3 || payload.message.contains("revert"))
            .unwrap_or(false),
        _ => false,
    };

    if reverted {
        GatewayError::RecordNotFound(id)
    } else {
        GatewayError::CallFailed(err.to_string())
    }
}

fn narrow(value: U256, what: &str) -> Result<u64, String> {
    u64::try_from(value).map_err(|_| format!("{what} {value} does not fit in 64 bits"))
}
