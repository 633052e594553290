// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory doubles for the wallet provider and the contracts.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedSender;

use crate::blockchain::gateway::{ContractBackend, ContractGateway, GatewayError};
use crate::blockchain::networks::GANACHE;
use crate::blockchain::types::{
    IssueCredentialCall, OnChainCredential, RegisterResumeCall, ResumeRecord, TxOutcome,
};
use crate::content::{ContentStoreClient, MemoryContentStore};
use crate::wallet::provider::{
    ProviderEvent, ProviderRpcError, WalletProvider, UNRECOGNIZED_CHAIN_ERROR,
    USER_REJECTED_REQUEST,
};
use crate::wallet::WalletSession;
use crate::workflows::Workflows;

/// Account the mock wallet authorizes by default.
pub const TEST_ACCOUNT: Address = Address::new([0xc1; 20]);

/// Fixed block timestamp stamped on mock records.
pub const TEST_TIMESTAMP: u64 = 1_700_000_000;

#[derive(Default)]
struct WalletState {
    accounts: Vec<Address>,
    chain_id: String,
    known_chains: HashSet<String>,
    reject_accounts: bool,
    reject_add_chain: bool,
    delay: Option<Duration>,
    calls: Vec<(String, Value)>,
    sinks: Vec<UnboundedSender<ProviderEvent>>,
}

/// Scripted wallet: knows Ganache until told otherwise, answers 4902 for
/// unknown chains and records every request.
pub struct MockWalletProvider {
    state: Mutex<WalletState>,
}

impl MockWalletProvider {
    pub fn with_accounts(accounts: Vec<Address>) -> Self {
        let mut known_chains = HashSet::new();
        known_chains.insert(GANACHE.chain_id.to_string());
        Self {
            state: Mutex::new(WalletState {
                accounts,
                chain_id: GANACHE.chain_id.to_string(),
                known_chains,
                ..WalletState::default()
            }),
        }
    }

    pub fn accounts(&self) -> Vec<Address> {
        self.state.lock().unwrap().accounts.clone()
    }

    pub fn set_accounts(&self, accounts: Vec<Address>) {
        self.state.lock().unwrap().accounts = accounts;
    }

    pub fn set_chain_id(&self, chain_id: &str) {
        let mut state = self.state.lock().unwrap();
        state.chain_id = chain_id.to_string();
        state.known_chains.insert(chain_id.to_string());
    }

    pub fn know_chain(&self, chain_id: &str) {
        self.state
            .lock()
            .unwrap()
            .known_chains
            .insert(chain_id.to_string());
    }

    pub fn reject_accounts(&self) {
        self.state.lock().unwrap().reject_accounts = true;
    }

    pub fn reject_add_chain(&self) {
        self.state.lock().unwrap().reject_add_chain = true;
    }

    pub fn delay(&self, delay: Duration) {
        self.state.lock().unwrap().delay = Some(delay);
    }

    /// Number of requests made for `method`.
    pub fn count(&self, method: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|(m, _)| m == method)
            .count()
    }

    pub fn last_params(&self, method: &str) -> Option<Value> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .rev()
            .find(|(m, _)| m == method)
            .map(|(_, params)| params.clone())
    }

    pub fn subscriptions(&self) -> usize {
        self.state.lock().unwrap().sinks.len()
    }

    /// Deliver a notification to every subscriber.
    pub fn push(&self, event: ProviderEvent) {
        for sink in &self.state.lock().unwrap().sinks {
            let _ = sink.send(event.clone());
        }
    }

    fn answer(&self, method: &str, params: &Value) -> Result<Value, ProviderRpcError> {
        let mut state = self.state.lock().unwrap();
        match method {
            "eth_requestAccounts" | "eth_accounts" => {
                if state.reject_accounts {
                    return Err(ProviderRpcError::new(
                        USER_REJECTED_REQUEST,
                        "User rejected the request.",
                    ));
                }
                Ok(json!(state.accounts))
            }
            "eth_chainId" => Ok(json!(state.chain_id)),
            "wallet_switchEthereumChain" => {
                let target = params[0]["chainId"].as_str().unwrap_or_default().to_string();
                if state.known_chains.contains(&target) {
                    state.chain_id = target;
                    Ok(Value::Null)
                } else {
                    Err(ProviderRpcError::new(
                        UNRECOGNIZED_CHAIN_ERROR,
                        format!("Unrecognized chain ID \"{target}\"."),
                    ))
                }
            }
            "wallet_addEthereumChain" => {
                if state.reject_add_chain {
                    return Err(ProviderRpcError::new(
                        USER_REJECTED_REQUEST,
                        "User rejected the request.",
                    ));
                }
                let added = params[0]["chainId"].as_str().unwrap_or_default().to_string();
                state.known_chains.insert(added.clone());
                state.chain_id = added;
                Ok(Value::Null)
            }
            other => Err(ProviderRpcError::new(
                -32601,
                format!("method {other} not supported"),
            )),
        }
    }
}

#[async_trait]
impl WalletProvider for MockWalletProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderRpcError> {
        let delay = {
            let mut state = self.state.lock().unwrap();
            state.calls.push((method.to_string(), params.clone()));
            state.delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.answer(method, &params)
    }

    fn subscribe(&self, sink: UnboundedSender<ProviderEvent>) {
        self.state.lock().unwrap().sinks.push(sink);
    }
}

/// A state-changing call recorded by [`MockContracts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentTx {
    pub from: Address,
    pub gas_limit: u64,
    pub method: &'static str,
}

#[derive(Default)]
struct Ledger {
    credentials: HashMap<u64, OnChainCredential>,
    resumes: HashMap<u64, ResumeRecord>,
    by_candidate: HashMap<Address, Vec<U256>>,
    grants: Vec<(u64, Address)>,
    next_credential: u64,
    next_resume: u64,
    sent: Vec<SentTx>,
    write_failure: Option<String>,
    read_delay: Option<Duration>,
}

/// Contract double with sequential ids starting at 1.
#[derive(Default)]
pub struct MockContracts {
    ledger: Mutex<Ledger>,
}

impl MockContracts {
    pub fn sent(&self) -> Vec<SentTx> {
        self.ledger.lock().unwrap().sent.clone()
    }

    pub fn grants(&self) -> Vec<(u64, Address)> {
        self.ledger.lock().unwrap().grants.clone()
    }

    pub fn fail_writes_with(&self, message: &str) {
        self.ledger.lock().unwrap().write_failure = Some(message.to_string());
    }

    pub fn delay_reads(&self, delay: Duration) {
        self.ledger.lock().unwrap().read_delay = Some(delay);
    }

    /// List `id` under `candidate` without storing a resume for it.
    pub fn list_dangling_resume(&self, candidate: Address, id: U256) {
        self.ledger
            .lock()
            .unwrap()
            .by_candidate
            .entry(candidate)
            .or_default()
            .push(id);
    }

    /// Clear the issuer's verification flag on a stored credential.
    pub fn revoke_credential(&self, id: u64) {
        if let Some(credential) = self.ledger.lock().unwrap().credentials.get_mut(&id) {
            credential.is_verified = false;
        }
    }

    pub fn credential(&self, id: u64) -> Option<OnChainCredential> {
        self.ledger.lock().unwrap().credentials.get(&id).cloned()
    }

    fn record_write(&self, from: Address, gas_limit: u64, method: &'static str) -> Result<(), GatewayError> {
        let mut ledger = self.ledger.lock().unwrap();
        ledger.sent.push(SentTx {
            from,
            gas_limit,
            method,
        });
        match &ledger.write_failure {
            Some(message) => Err(GatewayError::TransactionFailed(message.clone())),
            None => Ok(()),
        }
    }

    async fn read_delay(&self) {
        let delay = self.ledger.lock().unwrap().read_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

fn tx_hash(method: &str, id: u64) -> B256 {
    alloy::primitives::keccak256(format!("{method}:{id}"))
}

#[async_trait]
impl ContractBackend for MockContracts {
    async fn get_credential(&self, id: u64) -> Result<OnChainCredential, GatewayError> {
        self.read_delay().await;
        self.ledger
            .lock()
            .unwrap()
            .credentials
            .get(&id)
            .cloned()
            .ok_or(GatewayError::RecordNotFound(id))
    }

    async fn get_resume(&self, id: u64) -> Result<ResumeRecord, GatewayError> {
        self.read_delay().await;
        self.ledger
            .lock()
            .unwrap()
            .resumes
            .get(&id)
            .cloned()
            .ok_or(GatewayError::RecordNotFound(id))
    }

    async fn get_candidate_resumes(&self, candidate: Address) -> Result<Vec<U256>, GatewayError> {
        self.read_delay().await;
        Ok(self
            .ledger
            .lock()
            .unwrap()
            .by_candidate
            .get(&candidate)
            .cloned()
            .unwrap_or_default())
    }

    async fn issue_credential(
        &self,
        from: Address,
        gas_limit: u64,
        call: IssueCredentialCall,
    ) -> Result<TxOutcome, GatewayError> {
        self.record_write(from, gas_limit, "issueCredential")?;
        let mut ledger = self.ledger.lock().unwrap();
        ledger.next_credential += 1;
        let id = ledger.next_credential;
        ledger.credentials.insert(
            id,
            OnChainCredential {
                id,
                candidate: call.candidate,
                issuer: from,
                is_verified: true,
                credential_type: call.credential_type,
                institution_name: call.institution_name,
                timestamp: TEST_TIMESTAMP,
                content_id: call.content_id,
                content_hash: call.credential_hash,
            },
        );
        Ok(TxOutcome {
            transaction_hash: tx_hash("issueCredential", id),
            emitted_id: id,
        })
    }

    async fn register_resume(
        &self,
        from: Address,
        gas_limit: u64,
        call: RegisterResumeCall,
    ) -> Result<TxOutcome, GatewayError> {
        self.record_write(from, gas_limit, "registerResume")?;
        let mut ledger = self.ledger.lock().unwrap();
        ledger.next_resume += 1;
        let id = ledger.next_resume;
        ledger.resumes.insert(
            id,
            ResumeRecord {
                id,
                candidate: from,
                timestamp: TEST_TIMESTAMP,
                is_active: true,
                skills: call.skills,
                experience_years: call.experience_years,
                education: call.education,
                is_public: call.is_public,
                content_id: call.content_id,
            },
        );
        ledger.by_candidate.entry(from).or_default().push(U256::from(id));
        Ok(TxOutcome {
            transaction_hash: tx_hash("registerResume", id),
            emitted_id: id,
        })
    }

    async fn grant_access(
        &self,
        from: Address,
        gas_limit: u64,
        resume_id: u64,
        recruiter: Address,
    ) -> Result<B256, GatewayError> {
        self.record_write(from, gas_limit, "grantAccess")?;
        let mut ledger = self.ledger.lock().unwrap();
        if !ledger.resumes.contains_key(&resume_id) {
            return Err(GatewayError::TransactionFailed(
                "execution reverted: Resume does not exist".to_string(),
            ));
        }
        ledger.grants.push((resume_id, recruiter));
        Ok(tx_hash("grantAccess", resume_id))
    }
}

/// Session connected to a mock wallet holding [`TEST_ACCOUNT`].
pub async fn connected_session() -> (WalletSession, Arc<MockWalletProvider>) {
    let provider = Arc::new(MockWalletProvider::with_accounts(vec![TEST_ACCOUNT]));
    let session = WalletSession::new(Some(provider.clone()));
    session.connect().await.unwrap();
    (session, provider)
}

/// Fully wired in-memory stack.
pub struct Harness {
    pub session: WalletSession,
    pub provider: Arc<MockWalletProvider>,
    pub contracts: Arc<MockContracts>,
    pub store: Arc<MemoryContentStore>,
    pub workflows: Workflows,
}

impl Harness {
    /// Stack with a connected session.
    pub async fn connected() -> Self {
        let harness = Self::disconnected();
        harness.session.connect().await.unwrap();
        harness
    }

    pub fn disconnected() -> Self {
        let provider = Arc::new(MockWalletProvider::with_accounts(vec![TEST_ACCOUNT]));
        let session = WalletSession::new(Some(provider.clone()));
        let contracts = Arc::new(MockContracts::default());
        let store = Arc::new(MemoryContentStore::new());
        let gateway = ContractGateway::new(Some(contracts.clone()), session.clone());
        let workflows = Workflows::new(gateway, ContentStoreClient::new(Some(store.clone())));
        Self {
            session,
            provider,
            contracts,
            store,
            workflows,
        }
    }
}
