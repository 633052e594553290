// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential issuance and verification.

use alloy::primitives::B256;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};
use utoipa::ToSchema;

use super::{parse_address, parse_record_id, WorkflowError, Workflows};
use crate::blockchain::types::{CredentialRecord, IssueCredentialCall};

/// Receipt of a confirmed `issueCredential` transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssuedCredential {
    /// Id emitted by `CredentialIssued`
    pub credential_id: u64,
    #[schema(value_type = String)]
    pub transaction_hash: B256,
    /// IPFS identifier of the uploaded credential document
    pub content_id: String,
    /// keccak-256 of the uploaded document, as anchored on-chain
    #[schema(value_type = String)]
    pub content_hash: B256,
}

impl Workflows {
    /// Upload a credential document and anchor it in `CredentialVerifier`.
    ///
    /// The document must be a JSON object carrying `candidate`,
    /// `credentialType` and `institutionName`; it is stored as submitted.
    pub async fn issue_credential(&self, credential: Value) -> Result<IssuedCredential, WorkflowError> {
        let document = credential
            .as_object()
            .ok_or_else(|| WorkflowError::InvalidInput("credential must be a JSON object".to_string()))?;
        let candidate = parse_address(required_str(document, "candidate")?, "candidate")?;
        let credential_type = required_str(document, "credentialType")?.to_string();
        let institution_name = required_str(document, "institutionName")?.to_string();

        // Fail before uploading if nothing could be anchored.
        self.gateway.ensure_ready().await?;

        let uploaded = self.content.upload_json(&credential).await?;

        let outcome = self
            .gateway
            .issue_credential(IssueCredentialCall {
                credential_hash: uploaded.content_hash,
                content_id: uploaded.content_id.clone(),
                candidate,
                credential_type,
                institution_name,
            })
            .await
            .inspect_err(|e| {
                warn!(
                    content_id = %uploaded.content_id,
                    error = %e,
                    "Credential upload orphaned by failed transaction"
                );
            })?;

        info!(
            credential_id = outcome.emitted_id,
            candidate = %candidate,
            tx_hash = %outcome.transaction_hash,
            "Credential issued"
        );

        Ok(IssuedCredential {
            credential_id: outcome.emitted_id,
            transaction_hash: outcome.transaction_hash,
            content_id: uploaded.content_id,
            content_hash: uploaded.content_hash,
        })
    }

    /// Verify a credential given its id as text.
    pub async fn verify_credential(&self, raw_id: &str) -> Result<CredentialRecord, WorkflowError> {
        let id = parse_record_id(raw_id)?;
        self.verify_credential_id(id).await
    }

    /// Read a credential from the chain and join it with its stored document.
    ///
    /// The on-chain record is read on every call; only the document is
    /// served from the cache.
    pub async fn verify_credential_id(&self, id: u64) -> Result<CredentialRecord, WorkflowError> {
        let on_chain = self.gateway.get_credential(id).await?;

        let cached = self
            .cache
            .as_ref()
            .and_then(|cache| cache.get(&on_chain.content_id));
        let data = match cached {
            Some(document) => document,
            None => {
                let bytes = self.content.download_bytes(&on_chain.content_id).await?;
                let document: Value = serde_json::from_slice(&bytes).map_err(|e| {
                    WorkflowError::InvalidContent(format!("{}: {e}", on_chain.content_id))
                })?;
                if let Some(cache) = &self.cache {
                    cache.put(&on_chain.content_id, document.clone());
                }
                document
            }
        };

        Ok(CredentialRecord::assemble(on_chain, data))
    }
}

fn required_str<'a>(document: &'a Map<String, Value>, field: &str) -> Result<&'a str, WorkflowError> {
    document
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| WorkflowError::InvalidInput(format!("{field} is required")))
}
