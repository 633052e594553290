// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Resume registration, listing and access grants.

use alloy::primitives::{Address, B256, U256};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use super::{WorkflowError, Workflows};
use crate::blockchain::types::{RegisterResumeCall, ResumeRecord};

/// A resume file plus the profile fields anchored with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterResumeRequest {
    pub file: Vec<u8>,
    pub name: String,
    pub email: String,
    pub skills: Vec<String>,
    pub experience_years: u64,
    pub education: String,
    pub is_public: bool,
}

/// Metadata document uploaded next to the resume file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResumeMetadata<'a> {
    name: &'a str,
    email: &'a str,
    skills: &'a [String],
    experience_years: u64,
    education: &'a str,
    uploaded_at: String,
}

/// Receipt of a confirmed `registerResume` transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredResume {
    /// Id emitted by `ResumeRegistered`
    pub resume_id: u64,
    #[schema(value_type = String)]
    pub transaction_hash: B256,
    /// IPFS identifier of the resume file (the one anchored on-chain)
    pub file_content_id: String,
    /// IPFS identifier of the metadata document
    pub metadata_content_id: String,
    /// keccak-256 of the metadata document
    #[schema(value_type = String)]
    pub content_hash: B256,
}

impl Workflows {
    /// Upload a resume and its metadata, then register it in `ResumeRegistry`.
    pub async fn register_resume(
        &self,
        request: RegisterResumeRequest,
    ) -> Result<RegisteredResume, WorkflowError> {
        if request.file.is_empty() {
            return Err(WorkflowError::InvalidInput("resume file is empty".to_string()));
        }

        self.gateway.ensure_ready().await?;

        let file = self.content.upload_bytes(request.file).await?;

        let metadata = ResumeMetadata {
            name: &request.name,
            email: &request.email,
            skills: &request.skills,
            experience_years: request.experience_years,
            education: &request.education,
            uploaded_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        let uploaded = self.content.upload_json(&metadata).await.inspect_err(|e| {
            warn!(content_id = %file.content_id, error = %e, "Resume file orphaned by failed metadata upload");
        })?;

        let outcome = self
            .gateway
            .register_resume(RegisterResumeCall {
                resume_hash: uploaded.content_hash,
                content_id: file.content_id.clone(),
                skills: request.skills,
                experience_years: request.experience_years,
                education: request.education,
                is_public: request.is_public,
            })
            .await
            .inspect_err(|e| {
                warn!(
                    file_content_id = %file.content_id,
                    metadata_content_id = %uploaded.content_id,
                    error = %e,
                    "Resume uploads orphaned by failed transaction"
                );
            })?;

        info!(
            resume_id = outcome.emitted_id,
            tx_hash = %outcome.transaction_hash,
            "Resume registered"
        );

        Ok(RegisteredResume {
            resume_id: outcome.emitted_id,
            transaction_hash: outcome.transaction_hash,
            file_content_id: file.content_id,
            metadata_content_id: uploaded.content_id,
            content_hash: uploaded.content_hash,
        })
    }

    /// Every readable resume registered by `candidate`.
    ///
    /// Ids that cannot be represented and records that cannot be read are
    /// logged and skipped; only a failure to list the ids fails the call.
    pub async fn candidate_resumes(
        &self,
        candidate: Address,
    ) -> Result<Vec<ResumeRecord>, WorkflowError> {
        let ids = self.gateway.get_candidate_resumes(candidate).await?;

        let mut resumes = Vec::with_capacity(ids.len());
        for raw_id in ids {
            let Ok(id) = u64::try_from(raw_id) else {
                warn!(resume_id = %raw_id, candidate = %candidate, "Skipping resume id that does not fit in 64 bits");
                continue;
            };
            match self.gateway.get_resume(id).await {
                Ok(resume) => resumes.push(resume),
                Err(e) => {
                    warn!(resume_id = id, candidate = %candidate, error = %e, "Skipping unreadable resume");
                }
            }
        }
        Ok(resumes)
    }

    /// Let `recruiter` read a resume.
    pub async fn grant_access(
        &self,
        resume_id: u64,
        recruiter: Address,
    ) -> Result<B256, WorkflowError> {
        let tx_hash = self.gateway.grant_access(resume_id, recruiter).await?;
        info!(resume_id, recruiter = %recruiter, tx_hash = %tx_hash, "Resume access granted");
        Ok(tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{content_hash, ContentStore};
    use crate::testing::{Harness, TEST_ACCOUNT};
    use serde_json::Value;

    fn request() -> RegisterResumeRequest {
        RegisterResumeRequest {
            file: b"%PDF-1.7 resume".to_vec(),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            skills: vec!["rust".to_string(), "solidity".to_string()],
            experience_years: 5,
            education: "BSc Mathematics".to_string(),
            is_public: false,
        }
    }

    #[tokio::test]
    async fn register_uploads_file_and_metadata() {
        let harness = Harness::connected().await;

        let registered = harness.workflows.register_resume(request()).await.unwrap();
        assert_eq!(registered.resume_id, 1);

        let file = harness.store.cat(&registered.file_content_id).await.unwrap();
        assert_eq!(file, b"%PDF-1.7 resume".to_vec());

        let metadata_bytes = harness
            .store
            .cat(&registered.metadata_content_id)
            .await
            .unwrap();
        assert_eq!(registered.content_hash, content_hash(&metadata_bytes));

        let metadata: Value = serde_json::from_slice(&metadata_bytes).unwrap();
        assert_eq!(metadata["name"], "Ada Lovelace");
        assert_eq!(metadata["email"], "ada@example.com");
        assert_eq!(metadata["skills"][1], "solidity");
        assert_eq!(metadata["experienceYears"], 5);
        assert_eq!(metadata["education"], "BSc Mathematics");
        let uploaded_at = metadata["uploadedAt"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(uploaded_at).is_ok());
        assert!(uploaded_at.ends_with('Z'));

        let sent = harness.contracts.sent();
        assert_eq!(sent[0].method, "registerResume");
        assert_eq!(sent[0].gas_limit, 800_000);
    }

    #[tokio::test]
    async fn registered_resume_is_listed_for_candidate() {
        let harness = Harness::connected().await;
        let registered = harness.workflows.register_resume(request()).await.unwrap();

        let resumes = harness
            .workflows
            .candidate_resumes(TEST_ACCOUNT)
            .await
            .unwrap();
        assert_eq!(resumes.len(), 1);
        assert_eq!(resumes[0].id, registered.resume_id);
        assert_eq!(resumes[0].content_id, registered.file_content_id);
        assert_eq!(resumes[0].skills, vec!["rust", "solidity"]);
        assert!(!resumes[0].is_public);
    }

    #[tokio::test]
    async fn unreadable_resume_is_skipped() {
        let harness = Harness::connected().await;
        harness.workflows.register_resume(request()).await.unwrap();
        harness
            .contracts
            .list_dangling_resume(TEST_ACCOUNT, U256::from(77));
        harness.workflows.register_resume(request()).await.unwrap();

        let resumes = harness
            .workflows
            .candidate_resumes(TEST_ACCOUNT)
            .await
            .unwrap();
        let ids: Vec<u64> = resumes.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn oversized_resume_id_is_skipped() {
        let harness = Harness::connected().await;
        harness.workflows.register_resume(request()).await.unwrap();
        harness.contracts.list_dangling_resume(TEST_ACCOUNT, U256::MAX);
        harness
            .contracts
            .list_dangling_resume(TEST_ACCOUNT, U256::from(u64::MAX) + U256::from(1));
        harness.workflows.register_resume(request()).await.unwrap();

        let resumes = harness
            .workflows
            .candidate_resumes(TEST_ACCOUNT)
            .await
            .unwrap();
        let ids: Vec<u64> = resumes.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn candidate_without_resumes_gets_empty_list() {
        let harness = Harness::connected().await;
        assert_eq!(
            harness
                .workflows
                .candidate_resumes(Address::repeat_byte(0x42))
                .await,
            Ok(vec![])
        );
    }

    #[tokio::test]
    async fn empty_file_is_rejected() {
        let harness = Harness::connected().await;
        let mut empty = request();
        empty.file.clear();
        assert!(matches!(
            harness.workflows.register_resume(empty).await,
            Err(WorkflowError::InvalidInput(_))
        ));
        assert!(harness.store.is_empty());
    }

    #[tokio::test]
    async fn grant_access_sends_from_active_account() {
        let harness = Harness::connected().await;
        let registered = harness.workflows.register_resume(request()).await.unwrap();
        let recruiter = Address::repeat_byte(0x0e);

        harness
            .workflows
            .grant_access(registered.resume_id, recruiter)
            .await
            .unwrap();

        assert_eq!(harness.contracts.grants(), vec![(registered.resume_id, recruiter)]);
        let grant = harness.contracts.sent().pop().unwrap();
        assert_eq!(grant.method, "grantAccess");
        assert_eq!(grant.from, TEST_ACCOUNT);
        assert_eq!(grant.gas_limit, 200_000);
    }

    #[tokio::test]
    async fn grant_on_missing_resume_is_transaction_failed() {
        let harness = Harness::connected().await;
        assert!(matches!(
            harness
                .workflows
                .grant_access(5, Address::repeat_byte(0x0e))
                .await,
            Err(WorkflowError::TransactionFailed(_))
        ));
    }

    #[tokio::test]
    async fn disconnected_listing_is_not_initialized() {
        let harness = Harness::disconnected();
        assert_eq!(
            harness.workflows.candidate_resumes(TEST_ACCOUNT).await,
            Err(WorkflowError::ContractNotInitialized)
        );
    }
}
