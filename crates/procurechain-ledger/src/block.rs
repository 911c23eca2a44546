//! Blocks and their export records

use crate::hash::{block_hash, format_timestamp, payload_hash};
use crate::{LedgerError, Payload, PayloadType};
use chrono::{DateTime, Utc};
use procurechain_domain::{Actor, Timestamp};
use serde::{Deserialize, Serialize};

/// One sealed lifecycle event
///
/// Fields are private; blocks are created by the chain and only read
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    index: u64,
    timestamp: Timestamp,
    actor: Actor,
    payload: Payload,
    payload_hash: String,
    previous_hash: String,
    block_hash: String,
}

impl Block {
    /// Seal `payload`, performed by `actor`, at `index`, linked to `previous_hash`
    pub(crate) fn seal(
        index: u64,
        timestamp: Timestamp,
        actor: Actor,
        payload: Payload,
        previous_hash: &str,
    ) -> Result<Self, LedgerError> {
        let payload_hash = payload_hash(&payload)?;
        let block_hash = block_hash(index, &payload_hash, previous_hash, &timestamp, &actor);

        Ok(Self {
            index,
            timestamp,
            actor,
            payload,
            payload_hash,
            previous_hash: previous_hash.to_string(),
            block_hash,
        })
    }

    /// Position in the chain
    pub fn index(&self) -> u64 {
        self.index
    }

    /// When the event was sealed
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Who performed the event
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// The sealed event
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The payload's tag
    pub fn payload_type(&self) -> PayloadType {
        self.payload.payload_type()
    }

    /// Recorded payload hash
    pub fn payload_hash(&self) -> &str {
        &self.payload_hash
    }

    /// Recorded link to the preceding block
    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    /// Recorded hash of this block
    pub fn block_hash(&self) -> &str {
        &self.block_hash
    }

    /// Export form of this block
    pub fn to_record(&self) -> Result<BlockRecord, LedgerError> {
        let mut tagged = serde_json::to_value(&self.payload)?;
        let payload = tagged
            .get_mut("payload")
            .map(serde_json::Value::take)
            .unwrap_or(serde_json::Value::Null);

        Ok(BlockRecord {
            index: self.index,
            timestamp: format_timestamp(&self.timestamp),
            actor: self.actor.clone(),
            payload_type: self.payload_type(),
            payload,
            payload_hash: self.payload_hash.clone(),
            previous_hash: self.previous_hash.clone(),
            block_hash: self.block_hash.clone(),
        })
    }
}

impl TryFrom<BlockRecord> for Block {
    type Error = LedgerError;

    /// Rebuild a block exactly as recorded, hashes included
    fn try_from(record: BlockRecord) -> Result<Self, Self::Error> {
        let index = record.index;
        let decode = |reason: String| LedgerError::Decode { index, reason };

        let timestamp = DateTime::parse_from_rfc3339(&record.timestamp)
            .map_err(|e| decode(format!("timestamp '{}': {}", record.timestamp, e)))?
            .with_timezone(&Utc);

        let tagged = serde_json::json!({
            "payloadType": record.payload_type,
            "payload": record.payload,
        });
        let payload: Payload = serde_json::from_value(tagged)
            .map_err(|e| decode(format!("{} payload: {}", record.payload_type, e)))?;

        Ok(Self {
            index,
            timestamp,
            actor: record.actor,
            payload,
            payload_hash: record.payload_hash,
            previous_hash: record.previous_hash,
            block_hash: record.block_hash,
        })
    }
}

/// Stable JSON shape of an exported block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    /// Position in the chain
    pub index: u64,

    /// RFC 3339 UTC timestamp
    pub timestamp: String,

    /// Who performed the event
    pub actor: Actor,

    /// Payload tag
    pub payload_type: PayloadType,

    /// Event body
    pub payload: serde_json::Value,

    /// SHA-256 of the canonical payload
    pub payload_hash: String,

    /// Hash of the preceding block
    pub previous_hash: String,

    /// Hash of this block
    pub block_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GenesisRecord, ZERO_HASH};
    use chrono::TimeZone;
    use procurechain_domain::SolicitationId;

    fn genesis() -> Block {
        Block::seal(
            0,
            Utc.with_ymd_and_hms(2025, 11, 1, 9, 0, 0).unwrap(),
            Actor::system(),
            Payload::Genesis(GenesisRecord::new(SolicitationId::new(), "Ledger initialized")),
            ZERO_HASH,
        )
        .unwrap()
    }

    #[test]
    fn test_seal() {
        let block = genesis();
        assert_eq!(block.index(), 0);
        assert_eq!(block.previous_hash(), ZERO_HASH);
        assert_eq!(block.payload_type(), PayloadType::Genesis);
        assert_eq!(block.payload_hash().len(), 64);
        assert_ne!(block.block_hash(), block.payload_hash());
    }

    #[test]
    fn test_record_shape() {
        let record = genesis().to_record().unwrap();
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["index"], 0);
        assert_eq!(value["timestamp"], "2025-11-01T09:00:00Z");
        assert_eq!(value["actor"]["role"], "SYSTEM");
        assert_eq!(value["actor"]["id"], "PROCURECHAIN");
        assert_eq!(value["payloadType"], "GENESIS");
        assert_eq!(value["payload"]["message"], "Ledger initialized");
        assert_eq!(value["previousHash"], ZERO_HASH);
        assert!(value.get("payloadHash").is_some());
        assert!(value.get("blockHash").is_some());
    }

    #[test]
    fn test_record_roundtrip() {
        let block = genesis();
        let back = Block::try_from(block.to_record().unwrap()).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn test_decode_failures() {
        let mut record = genesis().to_record().unwrap();
        record.timestamp = "yesterday".to_string();
        assert!(matches!(
            Block::try_from(record),
            Err(LedgerError::Decode { index: 0, .. })
        ));

        let mut record = genesis().to_record().unwrap();
        record.payload_type = PayloadType::AwardIssued;
        assert!(matches!(
            Block::try_from(record),
            Err(LedgerError::Decode { index: 0, .. })
        ));
    }
}
