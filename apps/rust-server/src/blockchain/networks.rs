// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Supported networks and chain-id lookups.
//!
//! Descriptors serialise to the EIP-3085 `wallet_addEthereumChain`
//! parameter shape, so they can be handed to the wallet provider as-is.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Native currency of a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NativeCurrency {
    pub name: &'static str,
    pub symbol: &'static str,
    pub decimals: u8,
}

/// Connection parameters for a network the wallet can be switched to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDescriptor {
    /// Hex chain id (e.g. `0x539`)
    pub chain_id: &'static str,
    /// Network name for display
    pub chain_name: &'static str,
    /// RPC endpoints, in order of preference
    pub rpc_urls: &'static [&'static str],
    pub native_currency: NativeCurrency,
}

/// Local Ganache development chain (1337).
pub const GANACHE: NetworkDescriptor = NetworkDescriptor {
    chain_id: "0x539",
    chain_name: "Ganache Local",
    rpc_urls: &["http://127.0.0.1:8545"],
    native_currency: NativeCurrency {
        name: "ETH",
        symbol: "ETH",
        decimals: 18,
    },
};

/// Polygon Mumbai testnet (80001).
pub const POLYGON_MUMBAI: NetworkDescriptor = NetworkDescriptor {
    chain_id: "0x13881",
    chain_name: "Polygon Mumbai",
    rpc_urls: &["https://rpc-mumbai.maticvigil.com"],
    native_currency: NativeCurrency {
        name: "MATIC",
        symbol: "MATIC",
        decimals: 18,
    },
};

/// Every network a session can switch to.
pub const REGISTERED_NETWORKS: &[&NetworkDescriptor] = &[&GANACHE, &POLYGON_MUMBAI];

/// Label used for chains missing from the display table.
pub const UNKNOWN_NETWORK: &str = "Unknown Network";

/// Display names for chains a wallet may report, including ones we cannot
/// switch to.
const NETWORK_NAMES: &[(&str, &str)] = &[
    ("0x3", "Ropsten Testnet"),
    ("0x4", "Rinkeby Testnet"),
    ("0x5", "Goerli Testnet"),
    ("0x539", "Ganache Local"),
    ("0x13881", "Polygon Mumbai"),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Unknown chain id: {0}")]
    NotFound(String),

    #[error("Unknown network key: {0}")]
    UnknownKey(String),
}

/// Look up the descriptor registered for `chain_id`.
pub fn describe(chain_id: &str) -> Result<&'static NetworkDescriptor, RegistryError> {
    let wanted = normalize_chain_id(chain_id);
    REGISTERED_NETWORKS
        .iter()
        .copied()
        .find(|network| normalize_chain_id(network.chain_id) == wanted)
        .ok_or_else(|| RegistryError::NotFound(chain_id.to_string()))
}

/// Display name for a hex chain id, falling back to [`UNKNOWN_NETWORK`].
pub fn network_name(chain_id: &str) -> &'static str {
    let wanted = normalize_chain_id(chain_id);
    NETWORK_NAMES
        .iter()
        .find(|(id, _)| *id == wanted)
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN_NETWORK)
}

/// Parse a `0x`-prefixed hex chain id into its decimal network id.
pub fn chain_id_to_decimal(chain_id: &str) -> Option<u64> {
    let trimmed = chain_id.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))?;
    u64::from_str_radix(digits, 16).ok()
}

fn normalize_chain_id(chain_id: &str) -> String {
    match chain_id_to_decimal(chain_id) {
        Some(value) => format!("{value:#x}"),
        None => chain_id.trim().to_ascii_lowercase(),
    }
}

/// Switch target accepted by the wallet session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NetworkKey {
    #[default]
    Ganache,
    PolygonMumbai,
}

impl NetworkKey {
    pub fn descriptor(self) -> &'static NetworkDescriptor {
        match self {
            NetworkKey::Ganache => &GANACHE,
            NetworkKey::PolygonMumbai => &POLYGON_MUMBAI,
        }
    }
}

impl FromStr for NetworkKey {
    type Err = RegistryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ganache" => Ok(NetworkKey::Ganache),
            "polygon_mumbai" | "mumbai" => Ok(NetworkKey::PolygonMumbai),
            _ => Err(RegistryError::UnknownKey(raw.to_string())),
        }
    }
}

impl fmt::Display for NetworkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkKey::Ganache => write!(f, "ganache"),
            NetworkKey::PolygonMumbai => write!(f, "polygon_mumbai"),
        }
    }
}
