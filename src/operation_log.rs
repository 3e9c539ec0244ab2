use anyhow::Result;
use chrono::Utc;
use ethers::types::{Address, TxHash};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use crate::user_settings::APP_DIR;
use crate::utils::display_address;

/// Log file name
const OPERATION_LOG_FILE: &str = "operation_log.txt";

/// Get the directory where app data is stored (same as settings)
fn app_data_dir() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        let app_dir = config_dir.join(APP_DIR);
        if !app_dir.exists() {
            let _ = fs::create_dir_all(&app_dir);
        }
        app_dir
    } else {
        // Fall back to current directory
        PathBuf::from(".")
    }
}

/// Get the full path to the operation log file
fn log_path() -> PathBuf {
    app_data_dir().join(OPERATION_LOG_FILE)
}

/// Get the full path to the operation log file as a string for display
pub fn log_file_path() -> String {
    log_path().display().to_string()
}

fn format_entry(timestamp: &str, chain_id: u64, multisig: &Address, operation: &str, details: &str) -> String {
    let mut entry = format!(
        "[{}] chain_id={} multisig={} operation={}\n",
        timestamp,
        chain_id,
        display_address(multisig),
        operation
    );

    if details.trim().is_empty() {
        entry.push_str("  (no additional details)\n");
    } else {
        for line in details.lines() {
            if line.trim().is_empty() {
                entry.push('\n');
            } else {
                entry.push_str("  ");
                entry.push_str(line);
                entry.push('\n');
            }
        }
    }
    entry.push('\n');
    entry
}

/// Append a structured log entry describing a user-requested operation.
pub fn append_log(operation: &str, chain_id: u64, multisig: &Address, details: impl AsRef<str>) -> Result<()> {
    let path = log_path();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let timestamp = Utc::now().to_rfc3339();
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    write!(
        file,
        "{}",
        format_entry(&timestamp, chain_id, multisig, operation, details.as_ref())
    )?;
    Ok(())
}

/// Record the outcome of a submit or confirm attempt
pub fn log_write_outcome(
    operation: &str,
    chain_id: u64,
    multisig: &Address,
    details: &str,
    outcome: &Result<TxHash>,
) {
    let body = match outcome {
        Ok(hash) => format!("{}\nstatus=ok tx_hash={:?}", details, hash),
        Err(e) => format!("{}\nstatus=failed error={:#}", details, e),
    };
    if let Err(e) = append_log(operation, chain_id, multisig, body) {
        tracing::warn!("Failed to write operation log: {}", e);
    }
}

/// Read the entire log file content
pub fn read_log() -> Result<String> {
    let path = log_path();
    if path.exists() {
        Ok(fs::read_to_string(&path)?)
    } else {
        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_entry_indents_details() {
        let multisig: Address = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap();
        let entry = format_entry(
            "2024-01-01T00:00:00+00:00",
            31337,
            &multisig,
            "confirm",
            "transaction_id=3\nstatus=ok",
        );

        assert_eq!(
            entry,
            "[2024-01-01T00:00:00+00:00] chain_id=31337 multisig=0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed operation=confirm\n  transaction_id=3\n  status=ok\n\n"
        );
    }

    #[test]
    fn test_format_entry_without_details() {
        let entry = format_entry("t", 1, &Address::zero(), "submit", "  ");
        assert!(entry.contains("(no additional details)"));
    }
}
