// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded once from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `WALLET_RPC_URL` | JSON-RPC node with unlocked accounts (`none` disables the wallet) | `http://127.0.0.1:8545` |
//! | `WALLET_POLL_INTERVAL_SECS` | Account/chain polling interval | `2` |
//! | `IPFS_API_URL` | Kubo API endpoint, `memory` for the in-process store, `none` to disable | `http://localhost:5001` |
//! | `CREDENTIAL_VERIFIER_ADDRESS` | `CredentialVerifier` contract | Ganache demo deployment |
//! | `RESUME_REGISTRY_ADDRESS` | `ResumeRegistry` contract | Ganache demo deployment |
//! | `GAS_LIMIT_ISSUE_CREDENTIAL` | Gas ceiling for `issueCredential` | `500000` |
//! | `GAS_LIMIT_REGISTER_RESUME` | Gas ceiling for `registerResume` | `800000` |
//! | `GAS_LIMIT_GRANT_ACCESS` | Gas ceiling for `grantAccess` | `200000` |
//! | `CALL_TIMEOUT_SECS` | Bound for wallet, IPFS and contract read calls | `30` |
//! | `TX_CONFIRMATION_TIMEOUT_SECS` | Bound for waiting on a transaction receipt | `300` |
//! | `VERIFY_CACHE_CAPACITY` | Verified credentials kept in memory (`0` disables) | `0` |
//! | `VERIFY_CACHE_TTL_SECS` | Lifetime of a cached verification | `300` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use crate::blockchain::contracts::ContractAddresses;
use crate::blockchain::gateway::GasLimits;
use crate::content::ipfs::DEFAULT_IPFS_API_URL;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const WALLET_RPC_URL_ENV: &str = "WALLET_RPC_URL";
pub const WALLET_POLL_INTERVAL_ENV: &str = "WALLET_POLL_INTERVAL_SECS";
pub const IPFS_API_URL_ENV: &str = "IPFS_API_URL";
pub const CREDENTIAL_VERIFIER_ADDRESS_ENV: &str = "CREDENTIAL_VERIFIER_ADDRESS";
pub const RESUME_REGISTRY_ADDRESS_ENV: &str = "RESUME_REGISTRY_ADDRESS";
pub const GAS_LIMIT_ISSUE_CREDENTIAL_ENV: &str = "GAS_LIMIT_ISSUE_CREDENTIAL";
pub const GAS_LIMIT_REGISTER_RESUME_ENV: &str = "GAS_LIMIT_REGISTER_RESUME";
pub const GAS_LIMIT_GRANT_ACCESS_ENV: &str = "GAS_LIMIT_GRANT_ACCESS";
pub const CALL_TIMEOUT_ENV: &str = "CALL_TIMEOUT_SECS";
pub const TX_CONFIRMATION_TIMEOUT_ENV: &str = "TX_CONFIRMATION_TIMEOUT_SECS";
pub const VERIFY_CACHE_CAPACITY_ENV: &str = "VERIFY_CACHE_CAPACITY";
pub const VERIFY_CACHE_TTL_ENV: &str = "VERIFY_CACHE_TTL_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_WALLET_RPC_URL: &str = "http://127.0.0.1:8545";
const DISABLED: &str = "none";
const MEMORY_STORE: &str = "memory";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}' ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err("expected 'json' or 'pretty'".to_string()),
        }
    }
}

/// Where uploaded content goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBackend {
    Ipfs(String),
    Memory,
    Disabled,
}

/// Verification cache sizing; absent when the cache is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    pub capacity: usize,
    pub ttl: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub wallet_rpc_url: Option<String>,
    pub wallet_poll_interval: Duration,
    pub content: ContentBackend,
    pub contracts: ContractAddresses,
    pub gas: GasLimits,
    pub call_timeout: Duration,
    pub confirmation_timeout: Duration,
    pub verify_cache: Option<CacheSettings>,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let wallet_rpc_url = match get(WALLET_RPC_URL_ENV) {
            Some(v) if v.eq_ignore_ascii_case(DISABLED) => None,
            Some(v) => Some(v),
            None => Some(DEFAULT_WALLET_RPC_URL.to_string()),
        };

        let content = match get(IPFS_API_URL_ENV) {
            Some(v) if v.eq_ignore_ascii_case(DISABLED) => ContentBackend::Disabled,
            Some(v) if v.eq_ignore_ascii_case(MEMORY_STORE) => ContentBackend::Memory,
            Some(v) => ContentBackend::Ipfs(v),
            None => ContentBackend::Ipfs(DEFAULT_IPFS_API_URL.to_string()),
        };

        let defaults = ContractAddresses::default();
        let contracts = ContractAddresses {
            credential_verifier: parse_or(
                CREDENTIAL_VERIFIER_ADDRESS_ENV,
                get(CREDENTIAL_VERIFIER_ADDRESS_ENV),
                defaults.credential_verifier,
            )?,
            resume_registry: parse_or(
                RESUME_REGISTRY_ADDRESS_ENV,
                get(RESUME_REGISTRY_ADDRESS_ENV),
                defaults.resume_registry,
            )?,
        };

        let gas_defaults = GasLimits::default();
        let gas = GasLimits {
            issue_credential: parse_or(
                GAS_LIMIT_ISSUE_CREDENTIAL_ENV,
                get(GAS_LIMIT_ISSUE_CREDENTIAL_ENV),
                gas_defaults.issue_credential,
            )?,
            register_resume: parse_or(
                GAS_LIMIT_REGISTER_RESUME_ENV,
                get(GAS_LIMIT_REGISTER_RESUME_ENV),
                gas_defaults.register_resume,
            )?,
            grant_access: parse_or(
                GAS_LIMIT_GRANT_ACCESS_ENV,
                get(GAS_LIMIT_GRANT_ACCESS_ENV),
                gas_defaults.grant_access,
            )?,
        };

        let cache_capacity: usize = parse_or(
            VERIFY_CACHE_CAPACITY_ENV,
            get(VERIFY_CACHE_CAPACITY_ENV),
            0,
        )?;
        let cache_ttl = secs(VERIFY_CACHE_TTL_ENV, get(VERIFY_CACHE_TTL_ENV), 300)?;
        let verify_cache = (cache_capacity > 0).then_some(CacheSettings {
            capacity: cache_capacity,
            ttl: cache_ttl,
        });

        Ok(Self {
            host: get(HOST_ENV).unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(PORT_ENV, get(PORT_ENV), 8080)?,
            wallet_rpc_url,
            wallet_poll_interval: secs(WALLET_POLL_INTERVAL_ENV, get(WALLET_POLL_INTERVAL_ENV), 2)?,
            content,
            contracts,
            gas,
            call_timeout: secs(CALL_TIMEOUT_ENV, get(CALL_TIMEOUT_ENV), 30)?,
            confirmation_timeout: secs(
                TX_CONFIRMATION_TIMEOUT_ENV,
                get(TX_CONFIRMATION_TIMEOUT_ENV),
                300,
            )?,
            verify_cache,
            log_format: parse_or(LOG_FORMAT_ENV, get(LOG_FORMAT_ENV), LogFormat::default())?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

/// Whole seconds, at least one.
fn secs(name: &'static str, value: Option<String>, default: u64) -> Result<Duration, ConfigError> {
    let seconds: u64 = parse_or(name, value.clone(), default)?;
    if seconds == 0 {
        return Err(ConfigError::Invalid {
            name,
            value: value.unwrap_or_default(),
            reason: "must be at least 1 second".to_string(),
        });
    }
    Ok(Duration::from_secs(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Address;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_match_demo_deployment() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(
            config.wallet_rpc_url.as_deref(),
            Some("http://127.0.0.1:8545")
        );
        assert_eq!(
            config.content,
            ContentBackend::Ipfs("http://localhost:5001".to_string())
        );
        assert_eq!(config.contracts, ContractAddresses::default());
        assert_eq!(config.gas, GasLimits::default());
        assert_eq!(config.call_timeout, Duration::from_secs(30));
        assert_eq!(config.confirmation_timeout, Duration::from_secs(300));
        assert_eq!(config.verify_cache, None);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn overrides_are_applied() {
        let config = config(&[
            ("PORT", "9000"),
            ("WALLET_RPC_URL", "none"),
            ("IPFS_API_URL", "memory"),
            ("GAS_LIMIT_REGISTER_RESUME", "1000000"),
            ("RESUME_REGISTRY_ADDRESS", "0x0000000000000000000000000000000000000abc"),
            ("VERIFY_CACHE_CAPACITY", "64"),
            ("VERIFY_CACHE_TTL_SECS", "60"),
            ("LOG_FORMAT", "JSON"),
        ])
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.wallet_rpc_url, None);
        assert_eq!(config.content, ContentBackend::Memory);
        assert_eq!(config.gas.register_resume, 1_000_000);
        assert_eq!(config.gas.issue_credential, 500_000);
        assert_eq!(
            config.contracts.resume_registry,
            "0x0000000000000000000000000000000000000abc"
                .parse::<Address>()
                .unwrap()
        );
        assert_eq!(
            config.verify_cache,
            Some(CacheSettings {
                capacity: 64,
                ttl: Duration::from_secs(60)
            })
        );
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = config(&[("GAS_LIMIT_GRANT_ACCESS", "lots")]).unwrap_err();
        assert!(err.to_string().contains("GAS_LIMIT_GRANT_ACCESS"));

        assert!(config(&[("CREDENTIAL_VERIFIER_ADDRESS", "0x12")]).is_err());
        assert!(config(&[("CALL_TIMEOUT_SECS", "0")]).is_err());
        assert!(config(&[("LOG_FORMAT", "xml")]).is_err());
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config(&[("HOST", "  "), ("IPFS_API_URL", "")]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(
            config.content,
            ContentBackend::Ipfs("http://localhost:5001".to_string())
        );
    }
}
