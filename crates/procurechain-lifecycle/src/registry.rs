//! Thread-safe registry of procurements
//!
//! Each procurement sits behind its own mutex, so events for one
//! solicitation are serialized while different solicitations proceed in
//! parallel. Lookup maps for awards and deliverables sit behind `RwLock`s.
//! A poisoned lock is reported as [`ProcurementError::Poisoned`].
//!
//! Lock order: `procurements`, then a procurement's mutex, then `awards` and
//! `deliverables`.

use crate::{Clock, Procurement, ProcurementConfig, ProcurementError, SystemClock};
use procurechain_domain::{
    Actor, Award, AwardId, Bid, BidFields, Deliverable, DeliverableFields, DeliverableId,
    LifecycleState, Solicitation, SolicitationFields, SolicitationId, Timestamp,
};
use procurechain_ledger::{BlockRecord, BlockSink, Chain, Validation};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

type Shared = Arc<Mutex<Procurement>>;

/// Entry point for every procurement operation
pub struct ProcurementRegistry {
    config: ProcurementConfig,
    clock: Arc<dyn Clock>,
    sink: Option<Arc<dyn BlockSink>>,
    procurements: RwLock<HashMap<SolicitationId, Shared>>,
    awards: RwLock<HashMap<AwardId, SolicitationId>>,
    deliverables: RwLock<HashMap<DeliverableId, SolicitationId>>,
}

impl ProcurementRegistry {
    /// Create a registry using the system clock and no sink
    pub fn new(config: ProcurementConfig) -> Result<Self, ProcurementError> {
        config.validate()?;
        Ok(Self {
            config,
            clock: Arc::new(SystemClock),
            sink: None,
            procurements: RwLock::new(HashMap::new()),
            awards: RwLock::new(HashMap::new()),
            deliverables: RwLock::new(HashMap::new()),
        })
    }

    /// Create a registry with the default configuration
    pub fn default_config() -> Self {
        Self {
            config: ProcurementConfig::default(),
            clock: Arc::new(SystemClock),
            sink: None,
            procurements: RwLock::new(HashMap::new()),
            awards: RwLock::new(HashMap::new()),
            deliverables: RwLock::new(HashMap::new()),
        }
    }

    /// Use `clock` for every recorded timestamp
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Forward every sealed block to `sink`
    pub fn with_sink(mut self, sink: Arc<dyn BlockSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Configuration in effect
    pub fn config(&self) -> &ProcurementConfig {
        &self.config
    }

    /// Draft and publish a solicitation on behalf of `officer`
    pub fn publish_solicitation(
        &self,
        fields: SolicitationFields,
        officer: Actor,
    ) -> Result<Solicitation, ProcurementError> {
        let now = self.clock.now();
        let mut procurement = Procurement::new(fields, &self.config, now)?;
        let solicitation = procurement.publish(officer, now)?;
        self.forward(&procurement, 0);

        let id = solicitation.id;
        self.procurements
            .write()
            .map_err(|_| ProcurementError::Poisoned("procurements"))?
            .insert(id, Arc::new(Mutex::new(procurement)));

        tracing::info!(solicitation_id = %id, title = %solicitation.title, "Solicitation published");
        Ok(solicitation)
    }

    /// Submit a bid to an open solicitation, attributed to its vendor
    pub fn submit_bid(&self, solicitation_id: SolicitationId, fields: BidFields) -> Result<Bid, ProcurementError> {
        self.apply(solicitation_id, |p, now| p.submit_bid(fields, now))
    }

    /// Close bidding on behalf of `officer`
    pub fn close_bidding(
        &self,
        solicitation_id: SolicitationId,
        officer: Actor,
    ) -> Result<Solicitation, ProcurementError> {
        self.apply(solicitation_id, |p, now| p.close_bidding(officer, now))
    }

    /// Score every bid, attributed to the configured risk engine
    pub fn evaluate_bids(&self, solicitation_id: SolicitationId) -> Result<Vec<Bid>, ProcurementError> {
        self.apply(solicitation_id, |p, now| p.evaluate_bids(now))
    }

    /// Award the contract to the top-ranked eligible bid on behalf of `officer`
    ///
    /// The award is indexed before the procurement lock is released.
    pub fn award_contract(
        &self,
        solicitation_id: SolicitationId,
        officer: Actor,
    ) -> Result<Award, ProcurementError> {
        self.apply(solicitation_id, |p, now| {
            let mut awards = self
                .awards
                .write()
                .map_err(|_| ProcurementError::Poisoned("awards"))?;
            let award = p.award_contract(officer, now)?;
            awards.insert(award.id, solicitation_id);
            Ok(award)
        })
    }

    /// Submit a deliverable against an award, attributed to the awarded vendor
    pub fn submit_deliverable(
        &self,
        award_id: AwardId,
        fields: DeliverableFields,
    ) -> Result<Deliverable, ProcurementError> {
        let solicitation_id = self
            .awards
            .read()
            .map_err(|_| ProcurementError::Poisoned("awards"))?
            .get(&award_id)
            .copied()
            .ok_or_else(|| ProcurementError::not_found("award", award_id))?;

        self.apply(solicitation_id, |p, now| {
            let mut deliverables = self
                .deliverables
                .write()
                .map_err(|_| ProcurementError::Poisoned("deliverables"))?;
            let deliverable = p.submit_deliverable(fields, now)?;
            deliverables.insert(deliverable.id, solicitation_id);
            Ok(deliverable)
        })
    }

    /// Accept a deliverable with the configured default notes
    pub fn accept_deliverable(
        &self,
        deliverable_id: DeliverableId,
        reviewer: Actor,
    ) -> Result<Deliverable, ProcurementError> {
        self.accept_deliverable_with_notes(deliverable_id, reviewer, None)
    }

    /// Accept a deliverable on behalf of `reviewer`, recording `notes`
    pub fn accept_deliverable_with_notes(
        &self,
        deliverable_id: DeliverableId,
        reviewer: Actor,
        notes: Option<String>,
    ) -> Result<Deliverable, ProcurementError> {
        let solicitation_id = self
            .deliverables
            .read()
            .map_err(|_| ProcurementError::Poisoned("deliverables"))?
            .get(&deliverable_id)
            .copied()
            .ok_or_else(|| ProcurementError::not_found("deliverable", deliverable_id))?;

        self.apply(solicitation_id, |p, now| {
            p.accept_deliverable(deliverable_id, reviewer, notes, now)
        })
    }

    /// Confirm closeout on behalf of `officer`
    pub fn close_out(
        &self,
        solicitation_id: SolicitationId,
        officer: Actor,
    ) -> Result<Solicitation, ProcurementError> {
        self.apply(solicitation_id, |p, now| p.close_out(officer, now))
    }

    /// Snapshot of the solicitation's chain
    pub fn export_chain(&self, solicitation_id: SolicitationId) -> Result<Vec<BlockRecord>, ProcurementError> {
        self.read(solicitation_id, |p| Ok(p.chain().export()?))
    }

    /// Snapshot of the solicitation's chain as JSON
    pub fn export_chain_json(&self, solicitation_id: SolicitationId) -> Result<String, ProcurementError> {
        self.read(solicitation_id, |p| Ok(p.chain().to_json()?))
    }

    /// Validate the solicitation's chain
    pub fn verify_chain(&self, solicitation_id: SolicitationId) -> Result<Validation, ProcurementError> {
        self.read(solicitation_id, |p| Ok(p.verify()))
    }

    /// Load a procurement from exported records
    ///
    /// The records must validate and replay to a legal lifecycle. A
    /// solicitation the registry already holds is rejected with
    /// [`ProcurementError::AlreadyRegistered`] and left untouched.
    pub fn import_chain(&self, records: Vec<BlockRecord>) -> Result<SolicitationId, ProcurementError> {
        let chain = Chain::from_records(records)?;
        let procurement = Procurement::replay(chain, &self.config)?;
        let id = procurement.id();

        let mut procurements = self
            .procurements
            .write()
            .map_err(|_| ProcurementError::Poisoned("procurements"))?;
        if procurements.contains_key(&id) {
            tracing::warn!(solicitation_id = %id, "Import rejected, solicitation already registered");
            return Err(ProcurementError::AlreadyRegistered(id));
        }

        if let Some(award) = procurement.award() {
            self.awards
                .write()
                .map_err(|_| ProcurementError::Poisoned("awards"))?
                .insert(award.id, id);
        }
        {
            let mut deliverables = self
                .deliverables
                .write()
                .map_err(|_| ProcurementError::Poisoned("deliverables"))?;
            for d in procurement.deliverables() {
                deliverables.insert(d.id, id);
            }
        }
        procurements.insert(id, Arc::new(Mutex::new(procurement)));

        tracing::info!(solicitation_id = %id, "Chain imported");
        Ok(id)
    }

    /// Current solicitation record
    pub fn solicitation(&self, solicitation_id: SolicitationId) -> Result<Solicitation, ProcurementError> {
        self.read(solicitation_id, |p| Ok(p.solicitation().clone()))
    }

    /// Bids in submission order
    pub fn bids(&self, solicitation_id: SolicitationId) -> Result<Vec<Bid>, ProcurementError> {
        self.read(solicitation_id, |p| Ok(p.bids().to_vec()))
    }

    /// The award, if issued
    pub fn award(&self, solicitation_id: SolicitationId) -> Result<Option<Award>, ProcurementError> {
        self.read(solicitation_id, |p| Ok(p.award().cloned()))
    }

    /// Deliverables in submission order
    pub fn deliverables(&self, solicitation_id: SolicitationId) -> Result<Vec<Deliverable>, ProcurementError> {
        self.read(solicitation_id, |p| Ok(p.deliverables().to_vec()))
    }

    /// Current lifecycle state
    pub fn state(&self, solicitation_id: SolicitationId) -> Result<LifecycleState, ProcurementError> {
        self.read(solicitation_id, |p| Ok(p.state()))
    }

    /// Every registered solicitation, oldest first
    pub fn solicitation_ids(&self) -> Result<Vec<SolicitationId>, ProcurementError> {
        let mut ids: Vec<_> = self
            .procurements
            .read()
            .map_err(|_| ProcurementError::Poisoned("procurements"))?
            .keys()
            .copied()
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn lookup(&self, solicitation_id: SolicitationId) -> Result<Shared, ProcurementError> {
        self.procurements
            .read()
            .map_err(|_| ProcurementError::Poisoned("procurements"))?
            .get(&solicitation_id)
            .cloned()
            .ok_or_else(|| ProcurementError::not_found("solicitation", solicitation_id))
    }

    /// Run a mutating operation under the procurement's lock
    ///
    /// Blocks appended by the operation are forwarded to the sink before the
    /// lock is released, keeping sink order equal to chain order.
    fn apply<T, F>(&self, solicitation_id: SolicitationId, op: F) -> Result<T, ProcurementError>
    where
        F: FnOnce(&mut Procurement, Timestamp) -> Result<T, ProcurementError>,
    {
        let shared = self.lookup(solicitation_id)?;
        let mut procurement = shared
            .lock()
            .map_err(|_| ProcurementError::Poisoned("procurement"))?;

        let before = procurement.chain().len();
        let result = op(&mut *procurement, self.clock.now())?;
        self.forward(&procurement, before);
        Ok(result)
    }

    fn read<T, F>(&self, solicitation_id: SolicitationId, view: F) -> Result<T, ProcurementError>
    where
        F: FnOnce(&Procurement) -> Result<T, ProcurementError>,
    {
        let shared = self.lookup(solicitation_id)?;
        let procurement = shared
            .lock()
            .map_err(|_| ProcurementError::Poisoned("procurement"))?;
        view(&*procurement)
    }

    /// Hand blocks from `from` onward to the sink
    ///
    /// The in-memory append has already happened; sink failures are logged
    /// and do not undo it.
    fn forward(&self, procurement: &Procurement, from: usize) {
        let Some(sink) = &self.sink else {
            return;
        };

        for block in procurement.chain().blocks().iter().skip(from) {
            let outcome = block
                .to_record()
                .map_err(|e| e.to_string())
                .and_then(|record| sink.record(&record).map_err(|e| e.to_string()));

            if let Err(error) = outcome {
                tracing::warn!(
                    solicitation_id = %procurement.id(),
                    index = block.index(),
                    %error,
                    "Block sink failed"
                );
            }
        }
    }
}

impl std::fmt::Debug for ProcurementRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcurementRegistry")
            .field("config", &self.config)
            .field("has_sink", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;
    use chrono::{Duration, TimeZone, Utc};
    use procurechain_ledger::MemorySink;
    use rust_decimal_macros::dec;

    fn officer() -> Actor {
        Actor::contracting_officer("CO_001").unwrap()
    }

    fn fields(clock: &ManualClock) -> SolicitationFields {
        SolicitationFields {
            agency_name: "City of Houston Procurement".to_string(),
            title: "IT Helpdesk Support Services".to_string(),
            naics: "541519".to_string(),
            requirements: vec![],
            required_certifications: vec![],
            estimated_value: Some(dec!(110000)),
            closing_at: clock.now() + Duration::days(10),
        }
    }

    #[test]
    fn test_unknown_solicitation() {
        let registry = ProcurementRegistry::default_config();
        let err = registry.close_bidding(SolicitationId::new(), officer()).unwrap_err();
        assert!(matches!(err, ProcurementError::NotFound { kind: "solicitation", .. }));
    }

    #[test]
    fn test_unknown_award_and_deliverable() {
        let registry = ProcurementRegistry::default_config();
        let err = registry
            .submit_deliverable(
                AwardId::new(),
                DeliverableFields {
                    description: "Report".to_string(),
                    document_hash: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, ProcurementError::NotFound { kind: "award", .. }));

        let reviewer = Actor::agency_qa("QA_001").unwrap();
        let err = registry.accept_deliverable(DeliverableId::new(), reviewer).unwrap_err();
        assert!(matches!(err, ProcurementError::NotFound { kind: "deliverable", .. }));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ProcurementConfig::default();
        config.risk.max_score = 0;
        assert!(matches!(
            ProcurementRegistry::new(config),
            Err(ProcurementError::Config(_))
        ));
    }

    #[test]
    fn test_sink_receives_blocks_in_order() {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 11, 1, 9, 0, 0).unwrap()));
        let sink = Arc::new(MemorySink::new());
        let registry = ProcurementRegistry::new(ProcurementConfig::default())
            .unwrap()
            .with_clock(clock.clone())
            .with_sink(sink.clone());

        let s = registry.publish_solicitation(fields(&clock), officer()).unwrap();
        clock.advance(Duration::days(1));
        registry.close_bidding(s.id, officer()).unwrap();

        let received: Vec<u64> = sink.records().iter().map(|r| r.index).collect();
        assert_eq!(received, vec![0, 1, 2]);
        assert_eq!(sink.records(), registry.export_chain(s.id).unwrap());
    }

    #[test]
    fn test_solicitation_ids() {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 11, 1, 9, 0, 0).unwrap()));
        let registry = ProcurementRegistry::default_config().with_clock(clock.clone());

        let a = registry.publish_solicitation(fields(&clock), officer()).unwrap();
        let b = registry.publish_solicitation(fields(&clock), officer()).unwrap();

        let ids = registry.solicitation_ids().unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&a.id) && ids.contains(&b.id));
        assert_eq!(registry.state(a.id).unwrap(), LifecycleState::Open);
    }
}
