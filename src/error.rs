//! Error taxonomy for chain interactions.
//!
//! Fallible operations return `anyhow::Result`; typed errors exist only where a
//! caller branches on them (form validation, routing). Everything else is
//! classified at the job boundary so it can be logged and reported uniformly.

use thiserror::Error;

/// Field-level validation failure on the submission form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid address")]
    InvalidAddress,
    #[error("Invalid amount")]
    InvalidAmount,
}

/// Broad category of a failed chain interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Node unreachable, timeouts, malformed responses
    Provider,
    /// User declined to sign (Ledger or node wallet)
    WalletRejected,
    /// No signer could be obtained (device missing, key not configured)
    WalletUnavailable,
    /// The contract reverted or returned undecodable data
    Contract,
    Validation,
}

impl ErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::Provider => "network error",
            ErrorKind::WalletRejected => "rejected in wallet",
            ErrorKind::WalletUnavailable => "wallet unavailable",
            ErrorKind::Contract => "contract error",
            ErrorKind::Validation => "invalid input",
        }
    }

    /// Extra guidance shown alongside the error in notifications
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ErrorKind::WalletRejected => Some("The request was declined in the wallet."),
            ErrorKind::WalletUnavailable => Some(
                "Check the wallet backend in Settings. Ledger must be unlocked with the Ethereum app open.",
            ),
            ErrorKind::Contract => Some("Only owners can submit or confirm, and each owner confirms once."),
            _ => None,
        }
    }
}

/// Classify an error by inspecting its chain of messages.
pub fn classify(err: &anyhow::Error) -> ErrorKind {
    if err.chain().any(|cause| cause.downcast_ref::<ValidationError>().is_some()) {
        return ErrorKind::Validation;
    }

    let message = format!("{:#}", err).to_lowercase();

    const REJECTION: &[&str] = &[
        "user rejected",
        "user denied",
        "user declined",
        "denied by the user",
        "rejected by the user",
        "rejected on the ledger",
        "0x6985",
    ];
    const CONTRACT: &[&str] = &["revert", "abi decod", "abi error", "decoding error"];

    if REJECTION.iter().any(|phrase| message.contains(phrase)) {
        ErrorKind::WalletRejected
    } else if message.contains("ledger")
        || message.contains("hidapi")
        || message.contains("no device")
        || message.contains("private key")
        || message.contains("no accounts")
    {
        ErrorKind::WalletUnavailable
    } else if CONTRACT.iter().any(|phrase| message.contains(phrase)) {
        ErrorKind::Contract
    } else {
        ErrorKind::Provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_classify_validation() {
        let err = anyhow::Error::new(ValidationError::InvalidAmount);
        assert_eq!(classify(&err), ErrorKind::Validation);
    }

    #[test]
    fn test_classify_wallet_rejection() {
        assert_eq!(classify(&anyhow!("Ledger device: Condition of use not satisfied (denied by the user?) (0x6985)")), ErrorKind::WalletRejected);
        assert_eq!(classify(&anyhow!("User rejected the request")), ErrorKind::WalletRejected);
    }

    #[test]
    fn test_classify_wallet_unavailable() {
        assert_eq!(classify(&anyhow!("hidapi error: No device found")), ErrorKind::WalletUnavailable);
        assert_eq!(classify(&anyhow!("MULTISIG_PRIVATE_KEY is not set; cannot load private key")), ErrorKind::WalletUnavailable);
    }

    #[test]
    fn test_classify_contract_revert() {
        assert_eq!(classify(&anyhow!("(code: 3, message: execution reverted, data: None)")), ErrorKind::Contract);
    }

    #[test]
    fn test_classify_defaults_to_provider() {
        assert_eq!(classify(&anyhow!("error sending request for url (http://127.0.0.1:8545/)")), ErrorKind::Provider);
    }

    #[test]
    fn test_classify_node_errors_are_not_wallet_or_contract() {
        assert_eq!(classify(&anyhow!("tcp connect error: connection rejected")), ErrorKind::Provider);
        assert_eq!(classify(&anyhow!("node does not advertise the requested capabilities")), ErrorKind::Provider);
        assert_eq!(classify(&anyhow!("Abi decoding failed for getOwners()")), ErrorKind::Contract);
    }

    #[test]
    fn test_classify_uses_context_chain() {
        let err = anyhow!("execution reverted").context("confirmTransaction(3) failed");
        assert_eq!(classify(&err), ErrorKind::Contract);
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(ValidationError::InvalidAddress.to_string(), "Invalid address");
        assert_eq!(ValidationError::InvalidAmount.to_string(), "Invalid amount");
    }
}
