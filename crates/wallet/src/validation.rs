//! Local input validation.
//!
//! Everything here runs before a request is issued. A validation failure
//! means no network call is made.

use thiserror::Error;

/// Length of a wallet seed in hex characters.
pub const SEED_HEX_LEN: usize = 64;

/// Input rejected locally.
///
/// The display text is the notification shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No wallet loaded")]
    NoWallet,

    #[error("Please enter a seed")]
    EmptySeed,

    #[error("Seed must be 64 hex characters")]
    MalformedSeed,

    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Amount must be a number")]
    AmountNotNumeric,

    #[error("Amount must be greater than 0")]
    NonPositiveAmount,
}

/// Check a seed and return it trimmed.
pub fn validate_seed(seed: &str) -> Result<&str, ValidationError> {
    let seed = seed.trim();
    if seed.is_empty() {
        return Err(ValidationError::EmptySeed);
    }
    if seed.len() != SEED_HEX_LEN || !seed.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::MalformedSeed);
    }
    Ok(seed)
}

/// Check a transfer form and return the trimmed recipient and parsed amount.
pub fn validate_transfer<'a>(to: &'a str, amount: &str) -> Result<(&'a str, f64), ValidationError> {
    let to = to.trim();
    let amount = amount.trim();
    if to.is_empty() || amount.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    Ok((to, parse_amount(amount)?))
}

/// Parse a positive, finite amount.
pub fn parse_amount(amount: &str) -> Result<f64, ValidationError> {
    let value: f64 = amount
        .trim()
        .parse()
        .map_err(|_| ValidationError::AmountNotNumeric)?;
    if !value.is_finite() {
        return Err(ValidationError::AmountNotNumeric);
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveAmount);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fba_test_helpers::VALID_SEED;

    #[test]
    fn test_seed_is_trimmed() {
        let padded = format!("  {}\n", VALID_SEED);
        assert_eq!(validate_seed(&padded), Ok(VALID_SEED));
    }

    #[test]
    fn test_seed_rejections() {
        assert_eq!(validate_seed("   "), Err(ValidationError::EmptySeed));
        assert_eq!(validate_seed("abc"), Err(ValidationError::MalformedSeed));
        // Right length, not hex
        let not_hex = "z".repeat(SEED_HEX_LEN);
        assert_eq!(validate_seed(&not_hex), Err(ValidationError::MalformedSeed));
        // One character too long
        let long = format!("{}0", VALID_SEED);
        assert_eq!(validate_seed(&long), Err(ValidationError::MalformedSeed));
    }

    #[test]
    fn test_amount_rejections() {
        assert_eq!(parse_amount("0"), Err(ValidationError::NonPositiveAmount));
        assert_eq!(parse_amount("-5"), Err(ValidationError::NonPositiveAmount));
        assert_eq!(parse_amount("five"), Err(ValidationError::AmountNotNumeric));
        assert_eq!(parse_amount("NaN"), Err(ValidationError::AmountNotNumeric));
        assert_eq!(parse_amount("inf"), Err(ValidationError::AmountNotNumeric));
        assert_eq!(parse_amount(" 2.5 "), Ok(2.5));
    }

    #[test]
    fn test_transfer_requires_both_fields() {
        assert_eq!(validate_transfer("  ", "5"), Err(ValidationError::MissingFields));
        assert_eq!(validate_transfer("deadbeef", ""), Err(ValidationError::MissingFields));
        assert_eq!(validate_transfer(" deadbeef ", "5"), Ok(("deadbeef", 5.0)));
    }
}
