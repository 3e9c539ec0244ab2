use anyhow::Result;
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::config::{self, Config, DEFAULT_POLL_INTERVAL_MS, LOCAL_CHAIN_ID};
use crate::wallet::WalletBackend;

const SETTINGS_FILE: &str = "settings.json";

/// Directory name under the platform config dir
pub const APP_DIR: &str = "multisig-interface";

/// How many recently opened multisigs to remember
pub const MAX_RECENT_MULTISIGS: usize = 8;

/// A multisig the user opened before, shown on the home page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentMultiSig {
    pub address: Address,
    pub chain_id: u64,
    /// RFC 3339 timestamp of the last visit
    pub last_opened: String,
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

/// User settings that persist between sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    /// Selected network chain ID
    pub selected_chain_id: u64,
    /// Custom RPC overrides per chain ID
    #[serde(default)]
    pub custom_rpcs: HashMap<u64, String>,
    #[serde(default)]
    pub wallet_backend: WalletBackend,
    /// Ledger Live account index used for signing
    #[serde(default)]
    pub ledger_account_index: u32,
    /// Event filter polling interval in milliseconds
    #[serde(default = "default_poll_interval")]
    pub event_poll_interval_ms: u64,
    #[serde(default)]
    pub recent_multisigs: Vec<RecentMultiSig>,
    #[serde(default)]
    pub dark_mode: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            selected_chain_id: LOCAL_CHAIN_ID,
            custom_rpcs: HashMap::new(),
            wallet_backend: WalletBackend::default(),
            ledger_account_index: 0,
            event_poll_interval_ms: default_poll_interval(),
            recent_multisigs: Vec::new(),
            dark_mode: false,
        }
    }
}

impl UserSettings {
    /// Get the settings file path
    fn settings_path() -> PathBuf {
        // Try to use the app data directory, fall back to current directory
        if let Some(config_dir) = dirs::config_dir() {
            let app_dir = config_dir.join(APP_DIR);
            if !app_dir.exists() {
                let _ = fs::create_dir_all(&app_dir);
            }
            app_dir.join(SETTINGS_FILE)
        } else {
            PathBuf::from(SETTINGS_FILE)
        }
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let path = Self::settings_path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(settings) => {
                        tracing::info!("Loaded settings from {:?}", path);
                        return settings;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse settings file: {}", e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read settings file: {}", e);
                }
            }
        }
        tracing::info!("Using default settings");
        Self::default()
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::settings_path();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;
        tracing::info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Get the settings file path for display
    pub fn settings_path_display() -> String {
        Self::settings_path().display().to_string()
    }

    /// Get custom RPC for a chain, or None if using default
    pub fn get_custom_rpc(&self, chain_id: u64) -> Option<&String> {
        self.custom_rpcs.get(&chain_id).filter(|s| !s.is_empty())
    }

    /// Set custom RPC for a chain (empty string removes the override)
    pub fn set_custom_rpc(&mut self, chain_id: u64, rpc: String) {
        if rpc.trim().is_empty() {
            self.custom_rpcs.remove(&chain_id);
        } else {
            self.custom_rpcs.insert(chain_id, rpc.trim().to_string());
        }
    }

    /// Remember a visit, most recent first, without duplicates
    pub fn record_recent(&mut self, address: Address, chain_id: u64) {
        self.recent_multisigs
            .retain(|r| !(r.address == address && r.chain_id == chain_id));
        self.recent_multisigs.insert(
            0,
            RecentMultiSig {
                address,
                chain_id,
                last_opened: chrono::Utc::now().to_rfc3339(),
            },
        );
        self.recent_multisigs.truncate(MAX_RECENT_MULTISIGS);
    }

    pub fn recent_for_chain(&self, chain_id: u64) -> impl Iterator<Item = &RecentMultiSig> {
        self.recent_multisigs
            .iter()
            .filter(move |r| r.chain_id == chain_id)
    }

    /// Connection config for the selected network with all overrides applied
    pub fn to_config(&self) -> Config {
        let mut config = match config::find_network_by_chain_id(self.selected_chain_id) {
            Some(network) => Config::from_network(network),
            None => Config::new(
                self.get_custom_rpc(self.selected_chain_id)
                    .cloned()
                    .unwrap_or_else(|| Config::default().rpc_url),
                self.selected_chain_id,
            ),
        };
        if let Some(rpc) = self.get_custom_rpc(self.selected_chain_id) {
            config.rpc_url = rpc.clone();
        }
        config.wallet_backend = self.wallet_backend;
        config.ledger_account_index = self.ledger_account_index;
        config.poll_interval_ms = self.event_poll_interval_ms;
        config
    }

    /// Seed settings from an environment-derived config on first run
    pub fn apply_config(&mut self, config: &Config) {
        self.selected_chain_id = config.chain_id;
        let default_rpc = config::find_network_by_chain_id(config.chain_id).map(|n| n.default_rpc);
        if default_rpc != Some(config.rpc_url.as_str()) {
            self.set_custom_rpc(config.chain_id, config.rpc_url.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    // ==================== UserSettings::default tests ====================

    #[test]
    fn test_user_settings_default_values() {
        let settings = UserSettings::default();
        assert_eq!(settings.selected_chain_id, LOCAL_CHAIN_ID);
        assert_eq!(settings.wallet_backend, WalletBackend::NodeAccount);
        assert_eq!(settings.event_poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert!(settings.recent_multisigs.is_empty());
        assert!(!settings.dark_mode);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: UserSettings = serde_json::from_str(r#"{"selected_chain_id": 1}"#).unwrap();
        assert_eq!(settings.selected_chain_id, 1);
        assert_eq!(settings.event_poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert_eq!(settings.wallet_backend, WalletBackend::NodeAccount);
    }

    // ==================== get_custom_rpc / set_custom_rpc tests ====================

    #[test]
    fn test_set_and_get_custom_rpc() {
        let mut settings = UserSettings::default();
        settings.set_custom_rpc(1, "  https://my-eth-node.com  ".to_string());
        assert_eq!(settings.get_custom_rpc(1).unwrap(), "https://my-eth-node.com");
    }

    #[test]
    fn test_set_custom_rpc_whitespace_removes() {
        let mut settings = UserSettings::default();
        settings.set_custom_rpc(1, "https://my-eth-node.com".to_string());
        settings.set_custom_rpc(1, "   ".to_string());
        assert!(settings.get_custom_rpc(1).is_none());
    }

    // ==================== recent multisig tests ====================

    #[test]
    fn test_record_recent_dedupes_and_orders() {
        let mut settings = UserSettings::default();
        settings.record_recent(address(1), 1);
        settings.record_recent(address(2), 1);
        settings.record_recent(address(1), 1);

        let addresses: Vec<Address> = settings.recent_multisigs.iter().map(|r| r.address).collect();
        assert_eq!(addresses, vec![address(1), address(2)]);
    }

    #[test]
    fn test_record_recent_is_bounded() {
        let mut settings = UserSettings::default();
        for n in 0..(MAX_RECENT_MULTISIGS as u64 + 3) {
            settings.record_recent(address(n), 1);
        }
        assert_eq!(settings.recent_multisigs.len(), MAX_RECENT_MULTISIGS);
    }

    #[test]
    fn test_recent_for_chain_filters() {
        let mut settings = UserSettings::default();
        settings.record_recent(address(1), 1);
        settings.record_recent(address(2), 31337);
        assert_eq!(settings.recent_for_chain(31337).count(), 1);
    }

    // ==================== to_config tests ====================

    #[test]
    fn test_to_config_applies_overrides() {
        let mut settings = UserSettings::default();
        settings.selected_chain_id = 11155111;
        settings.set_custom_rpc(11155111, "https://my-sepolia.example".to_string());
        settings.wallet_backend = WalletBackend::Ledger;
        settings.ledger_account_index = 2;
        settings.event_poll_interval_ms = 1_000;

        let config = settings.to_config();
        assert_eq!(config.chain_id, 11155111);
        assert_eq!(config.rpc_url, "https://my-sepolia.example");
        assert_eq!(config.wallet_backend, WalletBackend::Ledger);
        assert_eq!(config.ledger_account_index, 2);
        assert_eq!(config.poll_interval_ms, 1_000);
    }

    #[test]
    fn test_to_config_unknown_chain_uses_custom_rpc() {
        let mut settings = UserSettings::default();
        settings.selected_chain_id = 424242;
        settings.set_custom_rpc(424242, "http://10.0.0.5:8545".to_string());

        let config = settings.to_config();
        assert_eq!(config.rpc_url, "http://10.0.0.5:8545");
        assert_eq!(config.network_label(), "Unknown");
    }

    #[test]
    fn test_apply_config_records_non_default_rpc() {
        let mut settings = UserSettings::default();
        settings.apply_config(&Config::new("http://192.168.1.10:8545".to_string(), 1));

        assert_eq!(settings.selected_chain_id, 1);
        assert_eq!(settings.get_custom_rpc(1).unwrap(), "http://192.168.1.10:8545");

        let mut untouched = UserSettings::default();
        untouched.apply_config(&Config::default());
        assert!(untouched.custom_rpcs.is_empty());
    }
}
