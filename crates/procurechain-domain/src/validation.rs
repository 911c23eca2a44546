//! Field-level checks shared by the record constructors

use crate::{Money, ValidationError};

/// Length of a SHA-256 digest in hex characters
pub const DIGEST_HEX_LEN: usize = 64;

/// Require a non-blank text field, returning it trimmed
pub fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

/// Trim every entry of a list, rejecting blank entries
pub fn require_entries(field: &'static str, values: &[String]) -> Result<Vec<String>, ValidationError> {
    values.iter().map(|v| require_text(field, v)).collect()
}

/// Validate a NAICS classification code (2 to 6 ASCII digits)
pub fn require_naics(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let code = require_text(field, value)?;
    if !(2..=6).contains(&code.len()) || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidField {
            field,
            reason: format!("'{}' is not a 2-6 digit NAICS code", code),
        });
    }
    Ok(code)
}

/// Require a strictly positive money amount
pub fn require_positive(field: &'static str, amount: Money) -> Result<Money, ValidationError> {
    if amount <= Money::ZERO {
        return Err(ValidationError::InvalidField {
            field,
            reason: format!("{} must be greater than zero", amount),
        });
    }
    Ok(amount)
}

/// Validate an optional document digest
///
/// Documents never enter the ledger; only their SHA-256 digest does.
/// Digests are normalized to lowercase hex.
pub fn optional_digest(field: &'static str, value: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(raw) = value else {
        return Ok(None);
    };

    let digest = raw.trim().to_ascii_lowercase();
    if digest.len() != DIGEST_HEX_LEN || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::InvalidField {
            field,
            reason: format!("expected {} hex characters, got '{}'", DIGEST_HEX_LEN, raw),
        });
    }
    Ok(Some(digest))
}
