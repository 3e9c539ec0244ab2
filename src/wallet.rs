//! Signer backends used for multisig writes.

use anyhow::{anyhow, Result};
use ethers::prelude::*;
use ethers::signers::{HDPath, Ledger};
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::OnceLock;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Environment variable holding the hex private key for [`WalletBackend::PrivateKey`]
pub const PRIVATE_KEY_ENV: &str = "MULTISIG_PRIVATE_KEY";

/// Where signatures come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WalletBackend {
    /// First account unlocked on the connected node; the node signs
    #[default]
    NodeAccount,
    /// Ledger hardware wallet through ethers' native HID support
    Ledger,
    /// Local key from the environment
    PrivateKey,
}

impl WalletBackend {
    pub const ALL: [WalletBackend; 3] = [
        WalletBackend::NodeAccount,
        WalletBackend::Ledger,
        WalletBackend::PrivateKey,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            WalletBackend::NodeAccount => "Node account",
            WalletBackend::Ledger => "Ledger",
            WalletBackend::PrivateKey => "Private key",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WalletBackend::NodeAccount => "Sign with the first account unlocked on the RPC node (local dev nodes).",
            WalletBackend::Ledger => "Sign on a Ledger device with the Ethereum app open.",
            WalletBackend::PrivateKey => "Sign with the key in MULTISIG_PRIVATE_KEY.",
        }
    }
}

/// Global mutex to serialize all Ledger/HID access.
///
/// Concurrent HID sessions fail with overlapped I/O errors on some platforms.
static LEDGER_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

pub fn ledger_lock() -> &'static Mutex<()> {
    LEDGER_LOCK.get_or_init(|| Mutex::new(()))
}

/// Ledger Live derivation path for an account index
pub fn ledger_path(index: u32) -> String {
    format!("m/44'/60'/{}'/0/0", index)
}

/// Open the Ledger for signing. Callers must hold [`ledger_lock`] for as long as the signer is used.
pub async fn connect_ledger(index: u32, chain_id: u64) -> Result<Ledger> {
    let path = ledger_path(index);
    info!("Connecting to Ledger at path {} (chain_id {})", path, chain_id);
    Ledger::new(HDPath::Other(path), chain_id)
        .await
        .map_err(map_ledger_error)
}

/// Local wallet from `MULTISIG_PRIVATE_KEY`, bound to `chain_id`
pub fn local_wallet(chain_id: u64) -> Result<LocalWallet> {
    let key = env::var(PRIVATE_KEY_ENV)
        .map_err(|_| anyhow!("{} is not set; cannot load private key", PRIVATE_KEY_ENV))?;
    parse_private_key(&key, chain_id)
}

pub fn parse_private_key(key: &str, chain_id: u64) -> Result<LocalWallet> {
    let trimmed = key.trim();
    let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let wallet: LocalWallet = trimmed
        .parse()
        .map_err(|_| anyhow!("Invalid private key in {}", PRIVATE_KEY_ENV))?;
    Ok(wallet.with_chain_id(chain_id))
}

/// First account the node manages, used as `from` for node-signed writes
pub async fn node_account<M: Middleware>(client: &M) -> Result<Address> {
    let accounts = client
        .get_accounts()
        .await
        .map_err(|e| anyhow!("eth_accounts failed: {}", e))?;
    accounts
        .first()
        .copied()
        .ok_or_else(|| anyhow!("Node reported no accounts to sign with"))
}

/// Map Ledger errors to user-friendly messages
fn map_ledger_error<E: std::fmt::Display>(e: E) -> anyhow::Error {
    let err_str = e.to_string();
    error!("Ledger error: {}", err_str);

    let lower = err_str.to_lowercase();

    if lower.contains("device not found") || lower.contains("no device") || lower.contains("hidapi") {
        anyhow!("Ledger device not found. Please ensure it's connected and unlocked.")
    } else if lower.contains("denied") || lower.contains("rejected") || lower.contains("6985") {
        anyhow!("Transaction was rejected on the Ledger device.")
    } else if lower.contains("locked") || lower.contains("6983") {
        anyhow!("Ledger is locked or Ethereum app is not open.")
    } else if lower.contains("timeout") {
        anyhow!("Ledger operation timed out. Please try again.")
    } else {
        anyhow!("Ledger error: {}", err_str)
    }
}
