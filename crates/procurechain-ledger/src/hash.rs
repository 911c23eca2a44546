//! Hash chain primitives
//!
//! All hashes are SHA-256, lowercase hex.

use crate::{LedgerError, Payload};
use chrono::SecondsFormat;
use procurechain_domain::{Actor, Timestamp};
use sha2::{Digest, Sha256};

/// Previous hash recorded on the genesis block
pub const ZERO_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// SHA-256 of `data` as lowercase hex
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Canonical encoding of a payload
///
/// The payload is converted to a JSON value first so that object keys come
/// out sorted, then written compactly.
pub fn canonical_payload(payload: &Payload) -> Result<Vec<u8>, LedgerError> {
    let value = serde_json::to_value(payload)?;
    Ok(serde_json::to_vec(&value)?)
}

/// Hash of a payload's canonical encoding
pub fn payload_hash(payload: &Payload) -> Result<String, LedgerError> {
    Ok(sha256_hex(&canonical_payload(payload)?))
}

/// Timestamp text that enters the block hash and the export record
pub fn format_timestamp(timestamp: &Timestamp) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Hash of a block's fields
///
/// Input is `index` (big-endian) followed by the payload hash, the previous
/// hash, the timestamp text, and the actor as `ROLE:id`.
pub fn block_hash(
    index: u64,
    payload_hash: &str,
    previous_hash: &str,
    timestamp: &Timestamp,
    actor: &Actor,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(index.to_be_bytes());
    hasher.update(payload_hash.as_bytes());
    hasher.update(previous_hash.as_bytes());
    hasher.update(format_timestamp(timestamp).as_bytes());
    hasher.update(actor.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Whether `value` is a 64-digit lowercase hex string
pub fn is_digest(value: &str) -> bool {
    value.len() == 64 && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GenesisRecord;
    use chrono::{TimeZone, Utc};
    use procurechain_domain::{ActorRole, SolicitationId};

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_zero_hash_shape() {
        assert!(is_digest(ZERO_HASH));
        assert!(ZERO_HASH.bytes().all(|b| b == b'0'));
        assert!(!is_digest("ABC"));
        assert!(!is_digest(&"G".repeat(64)));
    }

    #[test]
    fn test_canonical_payload_sorts_keys() {
        let payload = Payload::Genesis(GenesisRecord::new(SolicitationId::new(), "Ledger initialized"));
        let text = String::from_utf8(canonical_payload(&payload).unwrap()).unwrap();

        assert!(text.starts_with("{\"payload\":{\"message\":"));
        assert!(text.ends_with("\"payloadType\":\"GENESIS\"}"));
        assert!(!text.contains('\n'));
    }

    #[test]
    fn test_block_hash_depends_on_every_field() {
        let ts = Utc.with_ymd_and_hms(2025, 11, 1, 9, 0, 0).unwrap();
        let payload = "a".repeat(64);
        let officer = Actor::contracting_officer("CO_JSMITH").unwrap();
        let base = block_hash(1, &payload, ZERO_HASH, &ts, &officer);
        let later = ts + chrono::Duration::seconds(1);

        assert_eq!(base, block_hash(1, &payload, ZERO_HASH, &ts, &officer));
        assert_ne!(base, block_hash(2, &payload, ZERO_HASH, &ts, &officer));
        assert_ne!(base, block_hash(1, &"b".repeat(64), ZERO_HASH, &ts, &officer));
        assert_ne!(base, block_hash(1, &payload, &"c".repeat(64), &ts, &officer));
        assert_ne!(base, block_hash(1, &payload, ZERO_HASH, &later, &officer));
        assert!(is_digest(&base));

        // Same id in another role, or another id in the same role
        let qa = Actor::new(ActorRole::AgencyQa, "CO_JSMITH").unwrap();
        let other = Actor::contracting_officer("CO_MJONES").unwrap();
        assert_ne!(base, block_hash(1, &payload, ZERO_HASH, &ts, &qa));
        assert_ne!(base, block_hash(1, &payload, ZERO_HASH, &ts, &other));
    }

    #[test]
    fn test_timestamp_text() {
        let ts = Utc.with_ymd_and_hms(2025, 11, 1, 9, 0, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "2025-11-01T09:00:00Z");

        let precise = ts + chrono::Duration::milliseconds(250);
        assert_eq!(format_timestamp(&precise), "2025-11-01T09:00:00.250Z");
    }
}
