// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential and resume record types shared by the gateway and workflows.

use alloy::primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Credential fields as stored in the `CredentialVerifier` contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnChainCredential {
    pub id: u64,
    pub candidate: Address,
    pub issuer: Address,
    pub is_verified: bool,
    pub credential_type: String,
    pub institution_name: String,
    /// Seconds since the Unix epoch
    pub timestamp: u64,
    /// IPFS identifier of the credential document
    pub content_id: String,
    /// keccak-256 of the credential document, anchored at issuance
    pub content_hash: B256,
}

/// A credential joined with its off-chain document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    pub id: u64,
    #[schema(value_type = String)]
    pub candidate: Address,
    #[schema(value_type = String)]
    pub issuer: Address,
    pub is_verified: bool,
    pub credential_type: String,
    pub institution_name: String,
    /// Seconds since the Unix epoch
    pub timestamp: u64,
    /// IPFS identifier of the credential document
    pub content_id: String,
    /// Credential document as submitted at issuance
    #[schema(value_type = Object)]
    pub data: Value,
}

impl CredentialRecord {
    /// Join on-chain fields with the parsed document.
    pub fn assemble(on_chain: OnChainCredential, data: Value) -> Self {
        Self {
            id: on_chain.id,
            candidate: on_chain.candidate,
            issuer: on_chain.issuer,
            is_verified: on_chain.is_verified,
            credential_type: on_chain.credential_type,
            institution_name: on_chain.institution_name,
            timestamp: on_chain.timestamp,
            content_id: on_chain.content_id,
            data,
        }
    }
}

/// Resume fields as stored in the `ResumeRegistry` contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    pub id: u64,
    #[schema(value_type = String)]
    pub candidate: Address,
    /// Seconds since the Unix epoch
    pub timestamp: u64,
    pub is_active: bool,
    pub skills: Vec<String>,
    pub experience_years: u64,
    pub education: String,
    pub is_public: bool,
    /// IPFS identifier of the resume file
    pub content_id: String,
}

/// Arguments of `CredentialVerifier.issueCredential`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueCredentialCall {
    pub credential_hash: B256,
    pub content_id: String,
    pub candidate: Address,
    pub credential_type: String,
    pub institution_name: String,
}

/// Arguments of `ResumeRegistry.registerResume`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterResumeCall {
    pub resume_hash: B256,
    pub content_id: String,
    pub skills: Vec<String>,
    pub experience_years: u64,
    pub education: String,
    pub is_public: bool,
}

/// Confirmed transaction that emitted a record id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOutcome {
    pub transaction_hash: B256,
    pub emitted_id: u64,
}
