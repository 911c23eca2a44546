//! Integration tests for procurechain-ledger
//!
//! These tests build chains from real lifecycle payloads, export them, edit
//! the export, and check that validation points at the edited block.

use chrono::{Duration, TimeZone, Utc};
use procurechain_domain::{
    Actor, ActorRole, Bid, BidFields, ComplianceAttributes, Solicitation, SolicitationFields, Timestamp,
};
use procurechain_ledger::{
    Chain, ClosingRecord, GenesisRecord, IntegrityIssue, LedgerError, Payload, PayloadType,
};
use proptest::prelude::*;
use rust_decimal_macros::dec;

fn published() -> Timestamp {
    Utc.with_ymd_and_hms(2025, 11, 1, 9, 0, 0).unwrap()
}

fn solicitation() -> Solicitation {
    Solicitation::draft(
        SolicitationFields {
            agency_name: "City of Houston Procurement".to_string(),
            title: "IT Helpdesk Support Services".to_string(),
            naics: "541519".to_string(),
            requirements: vec!["Provide Tier 1-2 helpdesk support".to_string()],
            required_certifications: vec!["ISO-20000".to_string()],
            estimated_value: Some(dec!(110000)),
            closing_at: published() + Duration::days(11),
        },
        published(),
    )
    .unwrap()
}

fn bid(s: &Solicitation, vendor: &str, hours: i64) -> Bid {
    Bid::submit(
        s,
        BidFields {
            vendor_id: vendor.to_string(),
            price: dec!(105000.00),
            delivery_days: 21,
            compliance: ComplianceAttributes {
                sam_registered: true,
                insurance_valid: true,
                technical_compliance: true,
                documents_complete: true,
                certifications: vec!["ISO-20000".to_string()],
                naics_codes: vec!["541519".to_string()],
                past_performance_score: Some(85),
            },
            document_hash: Some("ab".repeat(32)),
        },
        s.published_at + Duration::hours(hours),
    )
    .unwrap()
}

fn officer() -> Actor {
    Actor::contracting_officer("CO_JSMITH").unwrap()
}

/// Genesis, publication, three bids, closing: six blocks
fn build_chain() -> anyhow::Result<Chain> {
    let s = solicitation();
    let mut chain = Chain::new(GenesisRecord::new(s.id, "Ledger initialized"), published())?;
    chain.append(Payload::SolicitationPublished(s.clone()), officer(), published())?;

    let mut bid_ids = Vec::new();
    for (i, vendor) in ["VENDOR_ACME", "VENDOR_BETA", "VENDOR_GAMMA"].iter().enumerate() {
        let b = bid(&s, vendor, i as i64 + 1);
        bid_ids.push(b.id);
        chain.append(Payload::BidSubmitted(b.clone()), Actor::vendor(vendor)?, b.submitted_at)?;
    }

    chain.append(
        Payload::BiddingClosed(ClosingRecord {
            solicitation_id: s.id,
            closed_at: s.closing_at,
            bid_ids,
        }),
        officer(),
        s.closing_at,
    )?;
    Ok(chain)
}

#[test]
fn test_chain_roundtrip_through_json() -> anyhow::Result<()> {
    let chain = build_chain()?;
    assert_eq!(chain.len(), 6);
    assert!(chain.validate().ok);

    let json = chain.to_json()?;
    let loaded = Chain::from_json(&json)?;

    assert_eq!(loaded.block_hashes(), chain.block_hashes());
    assert_eq!(loaded.blocks(), chain.blocks());
    assert!(loaded.validate().ok);

    let roles: Vec<ActorRole> = loaded.blocks().iter().map(|b| b.actor().role).collect();
    assert_eq!(roles[0], ActorRole::System);
    assert_eq!(roles[1], ActorRole::ContractingOfficer);
    assert_eq!(loaded.blocks()[3].actor().id, "VENDOR_BETA");
    Ok(())
}

#[test]
fn test_export_shape() -> anyhow::Result<()> {
    let chain = build_chain()?;
    let records = chain.export()?;

    assert_eq!(records[0].payload_type, PayloadType::Genesis);
    assert_eq!(records[1].payload_type, PayloadType::SolicitationPublished);
    assert_eq!(records[2].payload["price"], "105000.00");
    assert_eq!(records[5].payload_type, PayloadType::BiddingClosed);

    let value = serde_json::to_value(&records[2])?;
    assert_eq!(value["actor"]["role"], "VENDOR");
    assert_eq!(value["actor"]["id"], "VENDOR_ACME");
    for key in ["index", "timestamp", "actor", "payloadType", "payload", "payloadHash", "previousHash", "blockHash"] {
        assert!(value.get(key).is_some(), "missing key {}", key);
    }
    Ok(())
}

#[test]
fn test_edited_bid_price_detected() -> anyhow::Result<()> {
    let chain = build_chain()?;
    let mut records = chain.export()?;
    records[3].payload["price"] = serde_json::json!("95000.00");

    let loaded = Chain::from_records(records)?;
    let validation = loaded.validate();

    assert!(!validation.ok);
    assert_eq!(validation.first_invalid_index, Some(3));
    Ok(())
}

#[test]
fn test_recomputed_payload_hash_still_detected() -> anyhow::Result<()> {
    let chain = build_chain()?;
    let mut records = chain.export()?;

    // Re-hash the edited payload so only the block hash disagrees
    records[2].payload["vendor_id"] = serde_json::json!("VENDOR_MALLORY");
    let edited = Chain::from_records(records.clone())?;
    records[2].payload_hash = procurechain_ledger::hash::payload_hash(edited.blocks()[2].payload())?;

    let loaded = Chain::from_records(records)?;
    let err = loaded.ensure_valid().unwrap_err();
    assert_eq!(err.index, 2);
    assert!(matches!(err.issue, IntegrityIssue::BlockHashMismatch { .. }));
    Ok(())
}

#[test]
fn test_reordered_blocks_detected() -> anyhow::Result<()> {
    let chain = build_chain()?;
    let mut records = chain.export()?;
    records.swap(2, 3);

    let loaded = Chain::from_records(records)?;
    assert_eq!(loaded.validate().first_invalid_index, Some(2));
    Ok(())
}

#[test]
fn test_malformed_json_rejected() {
    assert!(matches!(Chain::from_json("not json"), Err(LedgerError::Json(_))));
    assert!(matches!(Chain::from_json("[]"), Err(LedgerError::EmptyChain)));
}

proptest! {
    /// Property: changing one character of any bid's vendor code is caught at that block
    #[test]
    fn test_single_edit_reported_at_its_block(block in 2usize..5, replacement in "[A-Z]") {
        let chain = build_chain().unwrap();
        let mut records = chain.export().unwrap();

        let original = records[block].payload["vendor_id"].as_str().unwrap().to_string();
        let mut edited = original.clone();
        edited.replace_range(0..1, &replacement);
        prop_assume!(edited != original);
        records[block].payload["vendor_id"] = serde_json::json!(edited);

        let loaded = Chain::from_records(records).unwrap();
        let validation = loaded.validate();
        prop_assert!(!validation.ok);
        prop_assert_eq!(validation.first_invalid_index, Some(block as u64));
    }
}
