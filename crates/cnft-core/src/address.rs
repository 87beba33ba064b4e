//! # Address Module
//!
//! Solana public keys are 32 bytes, written in base58.

use crate::error::{CoreError, Result};

/// Byte length of a decoded public key.
pub const PUBKEY_LENGTH: usize = 32;

/// Check that `address` is a base58 public key and return it trimmed.
pub fn validate_address(address: &str) -> Result<String> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidAddress("address is empty".to_string()));
    }

    let bytes = bs58::decode(trimmed)
        .into_vec()
        .map_err(|e| CoreError::InvalidAddress(format!("{}: {}", trimmed, e)))?;

    if bytes.len() != PUBKEY_LENGTH {
        return Err(CoreError::InvalidAddress(format!(
            "{}: expected {} bytes, got {}",
            trimmed,
            PUBKEY_LENGTH,
            bytes.len()
        )));
    }

    Ok(trimmed.to_string())
}

/// [`validate_address`] for optional inputs; blank strings count as absent.
pub fn validate_optional_address(address: Option<&str>) -> Result<Option<String>> {
    match address.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => validate_address(value).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYSTEM_PROGRAM: &str = "11111111111111111111111111111111";
    const TOKEN_PROGRAM: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

    #[test]
    fn test_valid_addresses() {
        assert_eq!(validate_address(SYSTEM_PROGRAM).unwrap(), SYSTEM_PROGRAM);
        assert_eq!(
            validate_address(&format!("  {}\n", TOKEN_PROGRAM)).unwrap(),
            TOKEN_PROGRAM
        );
    }

    #[test]
    fn test_empty_address() {
        assert!(validate_address("   ").is_err());
    }

    #[test]
    fn test_invalid_base58() {
        // '0', 'O', 'I' and 'l' are not in the base58 alphabet.
        assert!(validate_address("0OIl0OIl0OIl0OIl0OIl0OIl0OIl0OIl").is_err());
    }

    #[test]
    fn test_wrong_length() {
        assert!(validate_address("1111").is_err());
    }

    #[test]
    fn test_optional_address() {
        assert_eq!(validate_optional_address(None).unwrap(), None);
        assert_eq!(validate_optional_address(Some(" ")).unwrap(), None);
        assert_eq!(
            validate_optional_address(Some(TOKEN_PROGRAM)).unwrap(),
            Some(TOKEN_PROGRAM.to_string())
        );
        assert!(validate_optional_address(Some("nope")).is_err());
    }
}
