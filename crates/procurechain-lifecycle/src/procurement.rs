//! Per-solicitation lifecycle controller
//!
//! A [`Procurement`] owns one solicitation, its bids, award and deliverables,
//! and the chain recording them. Each operation checks the transition table,
//! validates its input, builds every new value, and only then appends one
//! block. The append is the last fallible step, so a failed operation leaves
//! the procurement untouched.
//!
//! Officer and reviewer actors are supplied by the caller. Vendor actors come
//! from the bid or the award, and the risk engine actor from
//! [`LedgerSettings::risk_engine_id`]. Roles are recorded, not enforced.

use crate::transition::transition;
use crate::{LedgerSettings, ProcurementConfig, ProcurementError};
use procurechain_domain::{
    Actor, ActorRole, Award, Bid, BidFields, BidId, Deliverable, DeliverableFields,
    DeliverableId, LifecycleEvent, LifecycleState, Solicitation, SolicitationFields,
    SolicitationId, Timestamp,
};
use procurechain_ledger::{
    AcceptanceRecord, Block, Chain, ClosingRecord, CloseoutRecord, EvaluationRecord,
    GenesisRecord, Payload, Validation,
};
use procurechain_risk::{rank_bids, RiskEngine};

/// One solicitation's lifecycle and ledger
#[derive(Debug, Clone)]
pub struct Procurement {
    state: LifecycleState,
    solicitation: Solicitation,
    bids: Vec<Bid>,
    award: Option<Award>,
    deliverables: Vec<Deliverable>,
    chain: Chain,
    engine: RiskEngine,
    settings: LedgerSettings,
}

impl Procurement {
    /// Draft a solicitation and seal the genesis block
    ///
    /// The bidding window opens at `at`.
    pub fn new(
        fields: SolicitationFields,
        config: &ProcurementConfig,
        at: Timestamp,
    ) -> Result<Self, ProcurementError> {
        let solicitation = Solicitation::draft(fields, at)?;
        let genesis = GenesisRecord::new(solicitation.id, config.ledger.genesis_message.clone());
        let chain = Chain::new(genesis, at)?;

        Ok(Self {
            state: LifecycleState::Draft,
            solicitation,
            bids: Vec::new(),
            award: None,
            deliverables: Vec::new(),
            chain,
            engine: RiskEngine::new(config.risk.clone()),
            settings: config.ledger.clone(),
        })
    }

    /// Open the solicitation for bidding
    pub fn publish(&mut self, officer: Actor, at: Timestamp) -> Result<Solicitation, ProcurementError> {
        let next = self.advance(LifecycleEvent::Publish)?;
        let solicitation = self.solicitation.with_status(next)?;

        self.seal(Payload::SolicitationPublished(solicitation.clone()), officer, at)?;
        self.solicitation = solicitation.clone();
        self.state = next;
        Ok(solicitation)
    }

    /// Record a bid
    ///
    /// Bids outside `[published_at, closing_at)` are rejected even while the
    /// state is still Open.
    pub fn submit_bid(&mut self, fields: BidFields, at: Timestamp) -> Result<Bid, ProcurementError> {
        let next = self.advance(LifecycleEvent::SubmitBid)?;
        let bid = Bid::submit(&self.solicitation, fields, at).inspect_err(|e| {
            tracing::warn!(solicitation_id = %self.solicitation.id, error = %e, "Bid rejected");
        })?;
        let vendor = Actor::vendor(bid.vendor_id.as_str())?;

        self.seal(Payload::BidSubmitted(bid.clone()), vendor, at)?;
        self.bids.push(bid.clone());
        self.state = next;
        Ok(bid)
    }

    /// Close bidding and seal the received bids
    pub fn close_bidding(&mut self, officer: Actor, at: Timestamp) -> Result<Solicitation, ProcurementError> {
        let next = self.advance(LifecycleEvent::CloseBidding)?;
        let solicitation = self.solicitation.with_status(next)?;

        let record = ClosingRecord {
            solicitation_id: solicitation.id,
            closed_at: at,
            bid_ids: self.bids.iter().map(|b| b.id).collect(),
        };

        self.seal(Payload::BiddingClosed(record), officer, at)?;
        self.solicitation = solicitation.clone();
        self.state = next;
        Ok(solicitation)
    }

    /// Score every sealed bid
    ///
    /// Returns the evaluated copies in submission order.
    pub fn evaluate_bids(&mut self, at: Timestamp) -> Result<Vec<Bid>, ProcurementError> {
        let next = self.advance(LifecycleEvent::EvaluateBids)?;
        let solicitation = self.solicitation.with_status(next)?;
        let engine = Actor::risk_engine(&self.settings.risk_engine_id)?;

        let evaluated = self.engine.evaluate_all(&self.bids, &self.solicitation)?;
        let policy = self.engine.policy();
        let ranking = rank_bids(&evaluated, policy)?
            .into_iter()
            .filter(|r| r.eligible)
            .map(|r| r.bid.id)
            .collect();

        let record = EvaluationRecord {
            solicitation_id: solicitation.id,
            evaluated_at: at,
            bids: evaluated.clone(),
            ranking,
            disqualification_threshold: policy.disqualification_threshold,
        };

        self.seal(Payload::BidsEvaluated(record), engine, at)?;
        self.bids = evaluated.clone();
        self.solicitation = solicitation;
        self.state = next;
        Ok(evaluated)
    }

    /// Award the contract to the top-ranked eligible bid
    pub fn award_contract(&mut self, officer: Actor, at: Timestamp) -> Result<Award, ProcurementError> {
        let next = self.advance(LifecycleEvent::AwardContract)?;
        let solicitation = self.solicitation.with_status(next)?;

        let winner = self.engine.select_winner(&self.bids).inspect_err(|e| {
            tracing::warn!(solicitation_id = %self.solicitation.id, error = %e, "No award issued");
        })?;
        let award = Award::issue(&self.solicitation, &self.bids, winner.id, at)?;

        self.seal(Payload::AwardIssued(award.clone()), officer, at)?;
        self.award = Some(award.clone());
        self.solicitation = solicitation;
        self.state = next;
        Ok(award)
    }

    /// Record a deliverable against the award
    pub fn submit_deliverable(
        &mut self,
        fields: DeliverableFields,
        at: Timestamp,
    ) -> Result<Deliverable, ProcurementError> {
        let next = self.advance(LifecycleEvent::SubmitDeliverable)?;
        let award = self
            .award
            .as_ref()
            .ok_or_else(|| ProcurementError::not_found("award", self.solicitation.id))?;
        let deliverable = Deliverable::submit(award, fields, at)?;
        let vendor = Actor::vendor(award.winning_vendor_id.as_str())?;

        self.seal(Payload::DeliverableSubmitted(deliverable.clone()), vendor, at)?;
        self.deliverables.push(deliverable.clone());
        self.state = next;
        Ok(deliverable)
    }

    /// Accept a submitted deliverable on behalf of `reviewer`
    ///
    /// When this clears the last pending deliverable, performance is
    /// complete and the procurement moves to Completed in the same block.
    pub fn accept_deliverable(
        &mut self,
        deliverable_id: DeliverableId,
        reviewer: Actor,
        notes: Option<String>,
        at: Timestamp,
    ) -> Result<Deliverable, ProcurementError> {
        let mut next = self.advance(LifecycleEvent::AcceptDeliverable)?;

        let position = self
            .deliverables
            .iter()
            .position(|d| d.id == deliverable_id)
            .ok_or_else(|| ProcurementError::not_found("deliverable", deliverable_id))?;

        let notes = notes.or_else(|| Some(self.settings.default_acceptance_notes.clone()));
        let accepted = self.deliverables[position].accept(at, notes)?;

        let still_pending = self
            .deliverables
            .iter()
            .enumerate()
            .any(|(i, d)| i != position && !d.accepted);
        let performance_complete = !still_pending;
        if performance_complete {
            next = transition(next, LifecycleEvent::CompletePerformance)?;
        }
        let solicitation = self.solicitation.with_status(next)?;

        let record = AcceptanceRecord {
            deliverable: accepted.clone(),
            performance_complete,
        };

        self.seal(Payload::DeliverableAccepted(record), reviewer, at)?;
        self.deliverables[position] = accepted.clone();
        self.solicitation = solicitation;
        self.state = next;
        Ok(accepted)
    }

    /// Confirm closeout; nothing can be recorded afterwards
    pub fn close_out(&mut self, officer: Actor, at: Timestamp) -> Result<Solicitation, ProcurementError> {
        let next = self.advance(LifecycleEvent::CloseOut)?;
        let solicitation = self.solicitation.with_status(next)?;

        let record = CloseoutRecord {
            solicitation_id: solicitation.id,
            closed_out_at: at,
            statement: self.settings.closeout_statement.clone(),
            deliverables_accepted: self.deliverables.iter().filter(|d| d.accepted).count(),
        };

        self.seal(Payload::CloseoutConfirmed(record), officer, at)?;
        self.solicitation = solicitation.clone();
        self.state = next;
        Ok(solicitation)
    }

    /// Rebuild a procurement from a chain
    ///
    /// The chain must validate, and its blocks must describe a legal
    /// lifecycle for a single solicitation: records agree with the ones
    /// they follow, and vendor events are attributed to that vendor.
    pub fn replay(chain: Chain, config: &ProcurementConfig) -> Result<Self, ProcurementError> {
        chain.ensure_valid()?;

        let blocks = chain.blocks();
        let solicitation_id = match blocks.first().map(Block::payload) {
            Some(Payload::Genesis(genesis)) => genesis.solicitation_id,
            _ => return Err(replay_error(0, "first block is not genesis")),
        };
        let mut solicitation = match blocks.get(1).map(Block::payload) {
            Some(Payload::SolicitationPublished(s)) => s.clone(),
            _ => return Err(replay_error(1, "second block is not the publication")),
        };
        if solicitation.id != solicitation_id {
            return Err(replay_error(1, "publication belongs to another solicitation"));
        }

        let mut state = transition(LifecycleState::Draft, LifecycleEvent::Publish)?;
        let mut bids: Vec<Bid> = Vec::new();
        let mut award: Option<Award> = None;
        let mut deliverables: Vec<Deliverable> = Vec::new();

        for block in &blocks[2..] {
            let index = block.index();
            let payload = block.payload();
            if payload.solicitation_id() != solicitation_id {
                return Err(replay_error(index, "block belongs to another solicitation"));
            }

            let event = match payload {
                Payload::Genesis(_) | Payload::SolicitationPublished(_) => {
                    return Err(replay_error(index, "unexpected repeated chain header"));
                }
                Payload::BidSubmitted(bid) => {
                    if !is_vendor(block.actor(), bid.vendor_id.as_str()) {
                        return Err(replay_error(index, "bid is not attributed to its vendor"));
                    }
                    bids.push(bid.clone());
                    LifecycleEvent::SubmitBid
                }
                Payload::BiddingClosed(record) => {
                    if !same_bids(&record.bid_ids, &bids) {
                        return Err(replay_error(index, "closing lists other bids than were submitted"));
                    }
                    LifecycleEvent::CloseBidding
                }
                Payload::BidsEvaluated(record) => {
                    let evaluated: Vec<_> = record.bids.iter().map(|b| b.id).collect();
                    if !same_bids(&evaluated, &bids) {
                        return Err(replay_error(index, "evaluated bids differ from submitted bids"));
                    }
                    bids = record.bids.clone();
                    LifecycleEvent::EvaluateBids
                }
                Payload::AwardIssued(a) => {
                    let winner = bids
                        .iter()
                        .find(|b| b.id == a.winning_bid_id)
                        .ok_or_else(|| replay_error(index, "award names a bid that was not evaluated"))?;
                    if winner.vendor_id != a.winning_vendor_id {
                        return Err(replay_error(index, "award vendor differs from winning bid"));
                    }
                    award = Some(a.clone());
                    LifecycleEvent::AwardContract
                }
                Payload::DeliverableSubmitted(d) => {
                    let Some(current) = award.as_ref() else {
                        return Err(replay_error(index, "deliverable submitted before any award"));
                    };
                    if d.award_id != current.id {
                        return Err(replay_error(index, "deliverable references another award"));
                    }
                    if !is_vendor(block.actor(), current.winning_vendor_id.as_str()) {
                        return Err(replay_error(index, "deliverable not attributed to awarded vendor"));
                    }
                    deliverables.push(d.clone());
                    LifecycleEvent::SubmitDeliverable
                }
                Payload::DeliverableAccepted(record) => {
                    let slot = deliverables
                        .iter_mut()
                        .find(|d| d.id == record.deliverable.id)
                        .ok_or_else(|| replay_error(index, "accepted deliverable was never submitted"))?;
                    *slot = record.deliverable.clone();
                    LifecycleEvent::AcceptDeliverable
                }
                Payload::CloseoutConfirmed(_) => LifecycleEvent::CloseOut,
            };

            state = transition(state, event).map_err(|e| replay_error(index, e.to_string()))?;
            if let Payload::DeliverableAccepted(record) = payload {
                if record.performance_complete {
                    state = transition(state, LifecycleEvent::CompletePerformance)
                        .map_err(|e| replay_error(index, e.to_string()))?;
                }
            }
        }

        solicitation = solicitation.with_status(state)?;
        tracing::info!(
            solicitation_id = %solicitation_id,
            state = %state,
            blocks = blocks.len(),
            "Procurement replayed"
        );

        Ok(Self {
            state,
            solicitation,
            bids,
            award,
            deliverables,
            chain,
            engine: RiskEngine::new(config.risk.clone()),
            settings: config.ledger.clone(),
        })
    }

    /// Solicitation identifier
    pub fn id(&self) -> SolicitationId {
        self.solicitation.id
    }

    /// Current lifecycle state
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Current solicitation record
    pub fn solicitation(&self) -> &Solicitation {
        &self.solicitation
    }

    /// Bids in submission order, evaluated once scoring has run
    pub fn bids(&self) -> &[Bid] {
        &self.bids
    }

    /// The award, once issued
    pub fn award(&self) -> Option<&Award> {
        self.award.as_ref()
    }

    /// Deliverables in submission order
    pub fn deliverables(&self) -> &[Deliverable] {
        &self.deliverables
    }

    /// Deliverables not yet accepted
    pub fn pending_deliverables(&self) -> impl Iterator<Item = &Deliverable> {
        self.deliverables.iter().filter(|d| !d.accepted)
    }

    /// The ledger
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Validate the ledger
    pub fn verify(&self) -> Validation {
        self.chain.validate()
    }

    fn advance(&self, event: LifecycleEvent) -> Result<LifecycleState, ProcurementError> {
        transition(self.state, event).map_err(|e| {
            tracing::warn!(
                solicitation_id = %self.solicitation.id,
                state = %e.state,
                event = %e.event,
                "Event rejected"
            );
            ProcurementError::from(e)
        })
    }

    fn seal(&mut self, payload: Payload, actor: Actor, at: Timestamp) -> Result<Block, ProcurementError> {
        let block = self.chain.append(payload, actor, at)?;
        tracing::info!(
            solicitation_id = %self.solicitation.id,
            index = block.index(),
            payload_type = %block.payload_type(),
            actor = %block.actor(),
            "Lifecycle event sealed"
        );
        Ok(block)
    }
}

fn is_vendor(actor: &Actor, vendor_id: &str) -> bool {
    actor.role == ActorRole::Vendor && actor.id == vendor_id
}

/// Whether `ids` names exactly `bids`, in submission order
fn same_bids(ids: &[BidId], bids: &[Bid]) -> bool {
    ids.len() == bids.len() && ids.iter().zip(bids).all(|(id, bid)| *id == bid.id)
}

fn replay_error(index: u64, reason: impl Into<String>) -> ProcurementError {
    ProcurementError::Replay {
        index,
        reason: reason.into(),
    }
}
