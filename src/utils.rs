use anyhow::{anyhow, Result};
use ethers::types::{Address, U256};
use ethers::utils::to_checksum;

/// Format wei as ether, trimming trailing zeros but keeping one decimal place.
///
/// `4206900000000000000` becomes `"4.2069"`, one ether becomes `"1.0"`.
pub fn format_ether(wei: U256) -> String {
    let full = ethers::utils::format_units(wei, "ether").unwrap_or_else(|_| "0.0".to_string());
    match full.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{}.0", whole)
            } else {
                format!("{}.{}", whole, fraction)
            }
        }
        None => format!("{}.0", full),
    }
}

/// Parse a string representing ETH to Wei
///
/// Decimal strings are parsed directly, without going through f64.
///
/// # Errors
/// Returns an error if the string is empty, negative, not a decimal number,
/// or has more than 18 fractional digits
pub fn parse_eth_str_to_wei(input: &str) -> Result<U256> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("ETH amount cannot be empty"));
    }
    // parse_ether accepts negatives and wraps them into U256
    if trimmed.starts_with('-') {
        return Err(anyhow!("ETH amount cannot be negative: {}", trimmed));
    }
    if !trimmed.chars().all(|c| c.is_ascii_digit() || c == '.') || trimmed == "." {
        return Err(anyhow!("Invalid ETH amount '{}'", trimmed));
    }
    // parse_units truncates extra digits instead of failing
    if let Some((_, fraction)) = trimmed.split_once('.') {
        if fraction.len() > 18 {
            return Err(anyhow!("ETH amount '{}' has more than 18 decimal places", trimmed));
        }
    }

    ethers::utils::parse_ether(trimmed)
        .map_err(|e| anyhow!("Invalid ETH amount '{}': {}", trimmed, e))
}

/// Syntactic address check.
///
/// Accepts `0x` followed by 40 hex digits. All-lowercase or all-uppercase
/// input is accepted as-is; mixed case must match the EIP-55 checksum.
pub fn is_address(input: &str) -> bool {
    parse_address(input).is_ok()
}

pub fn parse_address(input: &str) -> Result<Address> {
    let trimmed = input.trim();
    let hex_part = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| anyhow!("Address must start with 0x: {}", trimmed))?;

    if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(anyhow!("Address must be 40 hex characters: {}", trimmed));
    }

    let address: Address = format!("0x{}", hex_part)
        .parse()
        .map_err(|e| anyhow!("Invalid address '{}': {}", trimmed, e))?;

    let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && to_checksum(&address, None) != format!("0x{}", hex_part) {
        return Err(anyhow!("Address checksum mismatch: {}", trimmed));
    }

    Ok(address)
}

/// Full checksummed form, used everywhere an address is displayed.
pub fn display_address(address: &Address) -> String {
    to_checksum(address, None)
}

/// `0x1234...abcd` style abbreviation for tight layouts
pub fn short_address(address: &Address) -> String {
    let full = display_address(address);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// Hex rendering of a transaction payload, `0x` for an empty one
pub fn format_payload(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUMMED: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    // ==================== format_ether tests ====================

    #[test]
    fn test_format_ether_zero() {
        assert_eq!(format_ether(U256::zero()), "0.0");
    }

    #[test]
    fn test_format_ether_one_eth() {
        let wei = U256::from(10u64.pow(18));
        assert_eq!(format_ether(wei), "1.0");
    }

    #[test]
    fn test_format_ether_fractional() {
        let wei = U256::from(5u64) * U256::from(10u64.pow(17));
        assert_eq!(format_ether(wei), "0.5");
    }

    #[test]
    fn test_format_ether_single_wei() {
        assert_eq!(format_ether(U256::one()), "0.000000000000000001");
    }

    // ==================== parse_eth_str_to_wei tests ====================

    #[test]
    fn test_parse_eth_str_to_wei_one_and_a_half() {
        let result = parse_eth_str_to_wei("1.5").unwrap();
        let expected = U256::from(15u64) * U256::from(10u64.pow(17));
        assert_eq!(result, expected);
    }

    #[test]
    fn test_parse_eth_str_to_wei_with_whitespace() {
        let result = parse_eth_str_to_wei("  2  ").unwrap();
        assert_eq!(result, U256::from(2u64) * U256::from(10u64.pow(18)));
    }

    #[test]
    fn test_parse_eth_str_to_wei_empty_fails() {
        let result = parse_eth_str_to_wei("");
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_parse_eth_str_to_wei_negative_fails() {
        let result = parse_eth_str_to_wei("-1");
        assert!(result.unwrap_err().to_string().contains("negative"));
    }

    #[test]
    fn test_parse_eth_str_to_wei_invalid_fails() {
        assert!(parse_eth_str_to_wei("abc").is_err());
        assert!(parse_eth_str_to_wei("1e18").is_err());
        assert!(parse_eth_str_to_wei(".").is_err());
    }

    #[test]
    fn test_parse_eth_str_to_wei_high_precision() {
        let result = parse_eth_str_to_wei("0.123456789012345678").unwrap();
        assert_eq!(result, U256::from(123456789012345678u64));
    }

    #[test]
    fn test_parse_eth_str_to_wei_rejects_sub_wei_digits() {
        assert!(parse_eth_str_to_wei("0.0000000000000000001").is_err());
        assert!(parse_eth_str_to_wei("1.1234567890123456789").is_err());
        assert_eq!(
            parse_eth_str_to_wei("0.000000000000000001").unwrap(),
            U256::one()
        );
    }

    #[test]
    fn test_decimal_amount_round_trips() {
        let wei = parse_eth_str_to_wei("4.2069").unwrap();
        assert_eq!(format_ether(wei), "4.2069");
    }

    // ==================== address tests ====================

    #[test]
    fn test_is_address_lowercase() {
        assert!(is_address("0xa0b1c2d3e4f5a6b7c8d9e0f1a2b3c4d5e6f7a842"));
    }

    #[test]
    fn test_is_address_checksummed() {
        assert!(is_address(CHECKSUMMED));
    }

    #[test]
    fn test_is_address_bad_checksum() {
        assert!(!is_address("0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
    }

    #[test]
    fn test_is_address_rejects_garbage() {
        assert!(!is_address("not-an-address"));
        assert!(!is_address(""));
        assert!(!is_address("0x1234"));
        assert!(!is_address("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
        assert!(!is_address("0xzzzeb6053f3e94c9b9a09f33669435e7ef1beaed"));
    }

    #[test]
    fn test_display_and_short_address() {
        let address = parse_address(&CHECKSUMMED.to_lowercase()).unwrap();
        assert_eq!(display_address(&address), CHECKSUMMED);
        assert_eq!(short_address(&address), "0x5aAe...eAed");
    }

    #[test]
    fn test_format_payload() {
        assert_eq!(format_payload(&[]), "0x");
        assert_eq!(format_payload(&[0xde, 0xad]), "0xdead");
    }
}
