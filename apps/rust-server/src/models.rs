// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API that are not workflow types
//! themselves. All derive `ToSchema` for the OpenAPI document.
//!
//! - **Wallet**: network switch request and result
//! - **Credentials**: issuance request
//! - **Resumes**: registration with a base64 file, listing, access grants

use alloy::primitives::{Address, B256};
use base64ct::{Base64, Encoding};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::blockchain::types::ResumeRecord;
use crate::wallet::ActiveNetwork;
use crate::workflows::{RegisterResumeRequest, WorkflowError};

// =============================================================================
// Wallet
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SwitchNetworkRequest {
    /// `ganache` or `polygon_mumbai`
    pub network: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SwitchNetworkResponse {
    /// Network after the switch; absent while disconnected
    pub network: Option<ActiveNetwork>,
}

// =============================================================================
// Credentials
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IssueCredentialRequest {
    /// Credential document; must carry `candidate`, `credentialType` and `institutionName`
    #[schema(value_type = Object)]
    pub credential: Value,
}

// =============================================================================
// Resumes
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResumeBody {
    /// Resume file, standard base64
    pub file: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_years: u64,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub is_public: bool,
}

impl TryFrom<RegisterResumeBody> for RegisterResumeRequest {
    type Error = WorkflowError;

    fn try_from(body: RegisterResumeBody) -> Result<Self, Self::Error> {
        let file = Base64::decode_vec(body.file.trim())
            .map_err(|e| WorkflowError::InvalidInput(format!("file is not valid base64: {e}")))?;
        Ok(RegisterResumeRequest {
            file,
            name: body.name,
            email: body.email,
            skills: body.skills,
            experience_years: body.experience_years,
            education: body.education,
            is_public: body.is_public,
        })
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CandidateResumesResponse {
    #[schema(value_type = String)]
    pub candidate: Address,
    pub resumes: Vec<ResumeRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GrantAccessRequest {
    /// Recruiter address
    pub recruiter: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    #[schema(value_type = String)]
    pub transaction_hash: B256,
}
