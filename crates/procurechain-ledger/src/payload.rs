//! Block payloads
//!
//! One variant per lifecycle event. The serialized form is tagged:
//! `{"payloadType": "BID_SUBMITTED", "payload": {...}}`.

use procurechain_domain::{
    Award, Bid, BidId, Deliverable, Solicitation, SolicitationId, Timestamp,
};
use serde::{Deserialize, Serialize};

/// Version of the payload encoding written into genesis blocks
pub const PROTOCOL_VERSION: u32 = 1;

/// First block of every chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisRecord {
    /// Solicitation this chain records
    pub solicitation_id: SolicitationId,

    /// Free-form initialization message
    pub message: String,

    /// Payload encoding version
    pub protocol_version: u32,
}

impl GenesisRecord {
    /// Genesis record at the current protocol version
    pub fn new(solicitation_id: SolicitationId, message: impl Into<String>) -> Self {
        Self {
            solicitation_id,
            message: message.into(),
            protocol_version: PROTOCOL_VERSION,
        }
    }
}

/// Bidding closed; the listed bids are sealed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingRecord {
    /// Closed solicitation
    pub solicitation_id: SolicitationId,

    /// When bidding closed
    pub closed_at: Timestamp,

    /// Bids received, in submission order
    pub bid_ids: Vec<BidId>,
}

/// Risk evaluation of every sealed bid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// Evaluated solicitation
    pub solicitation_id: SolicitationId,

    /// When the evaluation ran
    pub evaluated_at: Timestamp,

    /// Evaluated copies of the bids, in submission order
    pub bids: Vec<Bid>,

    /// Eligible bids in award order
    pub ranking: Vec<BidId>,

    /// Disqualification threshold in force
    pub disqualification_threshold: u8,
}

/// Deliverable accepted by the agency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptanceRecord {
    /// The accepted deliverable
    pub deliverable: Deliverable,

    /// Whether this acceptance completed performance
    pub performance_complete: bool,
}

/// Contract closed out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseoutRecord {
    /// Closed-out solicitation
    pub solicitation_id: SolicitationId,

    /// When closeout was confirmed
    pub closed_out_at: Timestamp,

    /// Closeout statement
    pub statement: String,

    /// Number of deliverables accepted under the award
    pub deliverables_accepted: usize,
}

/// The event sealed into a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "payloadType", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Payload {
    /// Chain initialized
    Genesis(GenesisRecord),
    /// Solicitation opened for bidding
    SolicitationPublished(Solicitation),
    /// Bid received
    BidSubmitted(Bid),
    /// Bidding window closed
    BiddingClosed(ClosingRecord),
    /// Bids scored and ranked
    BidsEvaluated(EvaluationRecord),
    /// Contract awarded
    AwardIssued(Award),
    /// Deliverable received
    DeliverableSubmitted(Deliverable),
    /// Deliverable accepted
    DeliverableAccepted(AcceptanceRecord),
    /// Contract closed out
    CloseoutConfirmed(CloseoutRecord),
}

/// Payload tag as written in exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayloadType {
    /// See [`Payload::Genesis`]
    Genesis,
    /// See [`Payload::SolicitationPublished`]
    SolicitationPublished,
    /// See [`Payload::BidSubmitted`]
    BidSubmitted,
    /// See [`Payload::BiddingClosed`]
    BiddingClosed,
    /// See [`Payload::BidsEvaluated`]
    BidsEvaluated,
    /// See [`Payload::AwardIssued`]
    AwardIssued,
    /// See [`Payload::DeliverableSubmitted`]
    DeliverableSubmitted,
    /// See [`Payload::DeliverableAccepted`]
    DeliverableAccepted,
    /// See [`Payload::CloseoutConfirmed`]
    CloseoutConfirmed,
}

impl PayloadType {
    /// Export tag
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadType::Genesis => "GENESIS",
            PayloadType::SolicitationPublished => "SOLICITATION_PUBLISHED",
            PayloadType::BidSubmitted => "BID_SUBMITTED",
            PayloadType::BiddingClosed => "BIDDING_CLOSED",
            PayloadType::BidsEvaluated => "BIDS_EVALUATED",
            PayloadType::AwardIssued => "AWARD_ISSUED",
            PayloadType::DeliverableSubmitted => "DELIVERABLE_SUBMITTED",
            PayloadType::DeliverableAccepted => "DELIVERABLE_ACCEPTED",
            PayloadType::CloseoutConfirmed => "CLOSEOUT_CONFIRMED",
        }
    }
}

impl std::fmt::Display for PayloadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Payload {
    /// This payload's tag
    pub fn payload_type(&self) -> PayloadType {
        match self {
            Payload::Genesis(_) => PayloadType::Genesis,
            Payload::SolicitationPublished(_) => PayloadType::SolicitationPublished,
            Payload::BidSubmitted(_) => PayloadType::BidSubmitted,
            Payload::BiddingClosed(_) => PayloadType::BiddingClosed,
            Payload::BidsEvaluated(_) => PayloadType::BidsEvaluated,
            Payload::AwardIssued(_) => PayloadType::AwardIssued,
            Payload::DeliverableSubmitted(_) => PayloadType::DeliverableSubmitted,
            Payload::DeliverableAccepted(_) => PayloadType::DeliverableAccepted,
            Payload::CloseoutConfirmed(_) => PayloadType::CloseoutConfirmed,
        }
    }

    /// Solicitation the event belongs to
    pub fn solicitation_id(&self) -> SolicitationId {
        match self {
            Payload::Genesis(r) => r.solicitation_id,
            Payload::SolicitationPublished(s) => s.id,
            Payload::BidSubmitted(b) => b.solicitation_id,
            Payload::BiddingClosed(r) => r.solicitation_id,
            Payload::BidsEvaluated(r) => r.solicitation_id,
            Payload::AwardIssued(a) => a.solicitation_id,
            Payload::DeliverableSubmitted(d) => d.solicitation_id,
            Payload::DeliverableAccepted(r) => r.deliverable.solicitation_id,
            Payload::CloseoutConfirmed(r) => r.solicitation_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_tagged_encoding() {
        let id = SolicitationId::new();
        let payload = Payload::BiddingClosed(ClosingRecord {
            solicitation_id: id,
            closed_at: Utc.with_ymd_and_hms(2025, 11, 12, 17, 0, 0).unwrap(),
            bid_ids: vec![],
        });

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["payloadType"], "BIDDING_CLOSED");
        assert_eq!(value["payload"]["solicitation_id"], id.to_string());
        assert_eq!(value["payload"]["closed_at"], "2025-11-12T17:00:00Z");

        let back: Payload = serde_json::from_value(value).unwrap();
        assert_eq!(back, payload);
        assert_eq!(back.solicitation_id(), id);
    }

    #[test]
    fn test_payload_type_tags_match_serde() {
        let payload = Payload::Genesis(GenesisRecord::new(SolicitationId::new(), "init"));
        let value = serde_json::to_value(&payload).unwrap();
        let tag = serde_json::to_value(payload.payload_type()).unwrap();

        assert_eq!(value["payloadType"], tag);
        assert_eq!(PayloadType::CloseoutConfirmed.to_string(), "CLOSEOUT_CONFIRMED");
        assert_eq!(
            serde_json::to_value(PayloadType::DeliverableAccepted).unwrap(),
            "DELIVERABLE_ACCEPTED"
        );
    }

    #[test]
    fn test_genesis_carries_protocol_version() {
        let genesis = GenesisRecord::new(SolicitationId::new(), "init");
        assert_eq!(genesis.protocol_version, PROTOCOL_VERSION);
    }
}
