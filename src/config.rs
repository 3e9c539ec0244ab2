use anyhow::{anyhow, Result};
use ethers::providers::{Http, Provider};
use std::env;
use std::time::Duration;
use url::Url;

use crate::wallet::WalletBackend;

/// A predefined EVM-compatible network.
///
/// `name` follows the identifiers wallets report for a network
/// (`homestead` for Ethereum mainnet), which is what the header badge shows
/// after normalization.
#[derive(Clone, Debug)]
pub struct EvmNetwork {
    pub label: &'static str,
    pub name: &'static str,
    pub chain_id: u64,
    pub native_token: &'static str,
    pub default_rpc: &'static str,
}

impl EvmNetwork {
    pub const fn new(
        label: &'static str,
        name: &'static str,
        chain_id: u64,
        native_token: &'static str,
        default_rpc: &'static str,
    ) -> Self {
        Self {
            label,
            name,
            chain_id,
            native_token,
            default_rpc,
        }
    }
}

pub const NETWORKS: &[EvmNetwork] = &[
    EvmNetwork::new("Ethereum", "homestead", 1, "ETH", "https://ethereum-rpc.publicnode.com"),
    EvmNetwork::new("Sepolia", "sepolia", 11155111, "ETH", "https://ethereum-sepolia-rpc.publicnode.com"),
    EvmNetwork::new("Holesky", "holesky", 17000, "ETH", "https://ethereum-holesky-rpc.publicnode.com"),
    EvmNetwork::new("Optimism", "optimism", 10, "ETH", "https://mainnet.optimism.io"),
    EvmNetwork::new("Arbitrum One", "arbitrum", 42161, "ETH", "https://arb1.arbitrum.io/rpc"),
    EvmNetwork::new("Base", "base", 8453, "ETH", "https://mainnet.base.org"),
    EvmNetwork::new("Polygon", "matic", 137, "POL", "https://polygon-rpc.com"),
    EvmNetwork::new("Gnosis Chain", "xdai", 100, "xDAI", "https://rpc.gnosischain.com"),
    EvmNetwork::new("Local node", "unknown", 31337, "ETH", "http://127.0.0.1:8545"),
];

/// Chain ID of the local development node (Hardhat / Anvil)
pub const LOCAL_CHAIN_ID: u64 = 31337;

/// Default interval between event filter polls
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 4_000;

/// Find a network by chain ID
pub fn find_network_by_chain_id(chain_id: u64) -> Option<&'static EvmNetwork> {
    NETWORKS.iter().find(|n| n.chain_id == chain_id)
}

/// Wallet-style network name for a chain ID, `"unknown"` when not built in
pub fn network_name(chain_id: u64) -> &'static str {
    find_network_by_chain_id(chain_id)
        .map(|n| n.name)
        .unwrap_or("unknown")
}

/// Normalize a network name for display.
///
/// Unrecognized or local networks show as `local`, the canonical main network
/// as `mainnet`, anything else passes through verbatim.
pub fn normalize_network_name(name: &str) -> String {
    match name {
        "unknown" | "" => "local".to_string(),
        "homestead" => "mainnet".to_string(),
        other => other.to_string(),
    }
}

/// Get the block explorer URL for a given chain ID
pub fn get_block_explorer_url(chain_id: u64) -> Option<&'static str> {
    match chain_id {
        1 => Some("https://etherscan.io"),
        11155111 => Some("https://sepolia.etherscan.io"),
        17000 => Some("https://holesky.etherscan.io"),
        10 => Some("https://optimistic.etherscan.io"),
        42161 => Some("https://arbiscan.io"),
        8453 => Some("https://basescan.org"),
        137 => Some("https://polygonscan.com"),
        100 => Some("https://gnosisscan.io"),
        _ => None,
    }
}

/// Get the full URL to view an address on the block explorer
pub fn get_address_explorer_url(chain_id: u64, address: &str) -> Option<String> {
    get_block_explorer_url(chain_id).map(|base| format!("{}/address/{}", base, address))
}

#[derive(Clone, Debug)]
pub struct Config {
    pub rpc_url: String,
    pub chain_id: u64,
    /// How often the event filter is polled for new logs
    pub poll_interval_ms: u64,
    pub wallet_backend: WalletBackend,
    /// Ledger Live account index used when signing with a Ledger
    pub ledger_account_index: u32,
}

impl Config {
    pub fn new(rpc_url: String, chain_id: u64) -> Self {
        let poll_interval_ms = env::var("MULTISIG_POLL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);

        Self {
            rpc_url,
            chain_id,
            poll_interval_ms,
            wallet_backend: WalletBackend::default(),
            ledger_account_index: 0,
        }
    }

    pub fn from_network(network: &EvmNetwork) -> Self {
        Self::new(network.default_rpc.to_string(), network.chain_id)
    }

    /// Build a config from `MULTISIG_RPC_URL` / `MULTISIG_CHAIN_ID`, falling back to the default network
    pub fn from_env() -> Self {
        let chain_id = env::var("MULTISIG_CHAIN_ID")
            .ok()
            .and_then(|v| v.parse().ok());
        let rpc_url = env::var("MULTISIG_RPC_URL").ok().filter(|v| !v.trim().is_empty());

        match (rpc_url, chain_id) {
            (Some(rpc), Some(chain_id)) => Self::new(rpc, chain_id),
            (Some(rpc), None) => Self::new(rpc, LOCAL_CHAIN_ID),
            (None, Some(chain_id)) => find_network_by_chain_id(chain_id)
                .map(Self::from_network)
                .unwrap_or_default(),
            (None, None) => Self::default(),
        }
    }

    /// True when `MULTISIG_RPC_URL` or `MULTISIG_CHAIN_ID` is set
    pub fn env_overrides_present() -> bool {
        ["MULTISIG_RPC_URL", "MULTISIG_CHAIN_ID"]
            .iter()
            .any(|key| env::var(key).map(|v| !v.trim().is_empty()).unwrap_or(false))
    }

    /// Native token symbol of the configured chain, `ETH` for chains not built in
    pub fn native_token(&self) -> &'static str {
        find_network_by_chain_id(self.chain_id)
            .map(|n| n.native_token)
            .unwrap_or("ETH")
    }

    pub fn network_label(&self) -> &'static str {
        find_network_by_chain_id(self.chain_id)
            .map(|n| n.label)
            .unwrap_or("Unknown")
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(250))
    }

    /// HTTP provider for this config's RPC endpoint with the configured poll interval
    pub fn get_provider(&self) -> Result<Provider<Http>> {
        let url = Url::parse(&self.rpc_url)
            .map_err(|e| anyhow!("Invalid RPC URL '{}': {}", self.rpc_url, e))?;
        let provider = Provider::<Http>::try_from(url.as_str())?.interval(self.poll_interval());
        Ok(provider)
    }
}

impl Default for Config {
    fn default() -> Self {
        // Local development node unless settings or env say otherwise
        if let Some(local) = find_network_by_chain_id(LOCAL_CHAIN_ID) {
            Self::from_network(local)
        } else {
            Self::new("http://127.0.0.1:8545".to_string(), LOCAL_CHAIN_ID)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== network lookup tests ====================

    #[test]
    fn test_find_network_by_chain_id_ethereum() {
        let network = find_network_by_chain_id(1).unwrap();
        assert_eq!(network.label, "Ethereum");
        assert_eq!(network.name, "homestead");
    }

    #[test]
    fn test_find_network_by_chain_id_not_found() {
        assert!(find_network_by_chain_id(999999).is_none());
    }

    #[test]
    fn test_network_name_unknown_chain() {
        assert_eq!(network_name(424242), "unknown");
        assert_eq!(network_name(11155111), "sepolia");
    }

    // ==================== normalize_network_name tests ====================

    #[test]
    fn test_normalize_unknown_is_local() {
        assert_eq!(normalize_network_name("unknown"), "local");
        assert_eq!(normalize_network_name(network_name(LOCAL_CHAIN_ID)), "local");
    }

    #[test]
    fn test_normalize_homestead_is_mainnet() {
        assert_eq!(normalize_network_name("homestead"), "mainnet");
        assert_eq!(normalize_network_name(network_name(1)), "mainnet");
    }

    #[test]
    fn test_normalize_passes_others_through() {
        assert_eq!(normalize_network_name("sepolia"), "sepolia");
        assert_eq!(normalize_network_name("matic"), "matic");
    }

    // ==================== explorer tests ====================

    #[test]
    fn test_explorer_urls() {
        assert_eq!(
            get_address_explorer_url(1, "0xabc"),
            Some("https://etherscan.io/address/0xabc".to_string())
        );
        assert_eq!(
            get_address_explorer_url(11155111, "0xdef"),
            Some("https://sepolia.etherscan.io/address/0xdef".to_string())
        );
        assert!(get_address_explorer_url(LOCAL_CHAIN_ID, "0xabc").is_none());
    }

    // ==================== Config tests ====================

    #[test]
    fn test_config_default_is_local_node() {
        let config = Config::default();
        assert_eq!(config.chain_id, LOCAL_CHAIN_ID);
        assert_eq!(config.rpc_url, "http://127.0.0.1:8545");
        assert_eq!(config.wallet_backend, WalletBackend::NodeAccount);
    }

    #[test]
    fn test_config_native_token() {
        assert_eq!(Config::new("https://polygon-rpc.com".into(), 137).native_token(), "POL");
        assert_eq!(Config::new("https://example.com".into(), 999999).native_token(), "ETH");
        assert_eq!(Config::new("https://rpc.gnosischain.com".into(), 100).native_token(), "xDAI");
    }

    #[test]
    fn test_config_network_label() {
        assert_eq!(Config::new("https://example.com".into(), 999999).network_label(), "Unknown");
        assert_eq!(Config::new("https://example.com".into(), 10).network_label(), "Optimism");
    }

    #[test]
    fn test_poll_interval_has_floor() {
        let mut config = Config::default();
        config.poll_interval_ms = 10;
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_get_provider_rejects_bad_url() {
        let config = Config::new("not a url".into(), 1);
        assert!(config.get_provider().is_err());
    }

    #[test]
    fn test_get_provider_accepts_http_url() {
        let config = Config::default();
        assert!(config.get_provider().is_ok());
    }
}
