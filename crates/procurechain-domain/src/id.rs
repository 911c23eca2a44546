//! Identifiers for lifecycle records
//!
//! Solicitations, bids, awards and deliverables are keyed by UUIDv7 values:
//! - Chronological sortability (creation order survives in the id)
//! - 128-bit uniqueness with no coordination between callers
//! - Stable hyphenated string form for export and lookup
//!
//! Vendors are identified by the caller-supplied registry code instead.

use crate::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new UUIDv7-based identifier
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wrap an existing UUID (import and test fixtures)
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Parse an identifier from its hyphenated string form
            pub fn parse(s: &str) -> Result<Self, ValidationError> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|e| ValidationError::InvalidId {
                        kind: $kind,
                        reason: e.to_string(),
                    })
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a solicitation
    SolicitationId,
    "solicitation"
);

uuid_id!(
    /// Unique identifier for a bid
    BidId,
    "bid"
);

uuid_id!(
    /// Unique identifier for an award
    AwardId,
    "award"
);

uuid_id!(
    /// Unique identifier for a deliverable
    DeliverableId,
    "deliverable"
);

/// Vendor registry code (e.g. `VENDOR_ACME`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorId(String);

impl VendorId {
    /// Create a vendor identifier, rejecting blank codes
    pub fn new(code: impl Into<String>) -> Result<Self, ValidationError> {
        let code = code.into();
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingField("vendor_id"));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidField {
                field: "vendor_id",
                reason: format!("'{}' must not contain whitespace", trimmed),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the vendor code
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VendorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_chronological() {
        let id1 = BidId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = BidId::new();

        assert!(id1 < id2, "Earlier UUIDv7 should sort before later UUIDv7");
    }

    #[test]
    fn test_id_display_and_parse() {
        let id = SolicitationId::new();
        let id_str = id.to_string();

        assert_eq!(id_str.len(), 36);
        assert_eq!(SolicitationId::parse(&id_str).unwrap(), id);
        assert_eq!(id_str.parse::<SolicitationId>().unwrap(), id);
    }

    #[test]
    fn test_id_invalid_string() {
        let err = AwardId::parse("not-a-uuid").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidId { kind: "award", .. }));
    }

    #[test]
    fn test_id_serializes_as_string() {
        let id = DeliverableId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }

    #[test]
    fn test_vendor_id_trims() {
        let vendor = VendorId::new("  VENDOR_ACME ").unwrap();
        assert_eq!(vendor.as_str(), "VENDOR_ACME");
    }

    #[test]
    fn test_vendor_id_rejects_blank_and_spaces() {
        assert_eq!(VendorId::new("   "), Err(ValidationError::MissingField("vendor_id")));
        assert!(matches!(
            VendorId::new("ACME CORP"),
            Err(ValidationError::InvalidField { field: "vendor_id", .. })
        ));
    }
}
