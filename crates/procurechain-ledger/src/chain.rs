//! The append-only chain

use crate::hash::{block_hash, payload_hash, ZERO_HASH};
use crate::{Block, BlockRecord, GenesisRecord, IntegrityError, IntegrityIssue, LedgerError, Payload, PayloadType};
use procurechain_domain::{Actor, SolicitationId, Timestamp};

/// Result of walking the chain once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    /// True when every block checks out
    pub ok: bool,

    /// First block that failed, if any
    pub first_invalid_index: Option<u64>,

    /// What failed there
    pub issue: Option<IntegrityIssue>,
}

impl Validation {
    fn valid() -> Self {
        Self {
            ok: true,
            first_invalid_index: None,
            issue: None,
        }
    }

    fn invalid(index: u64, issue: IntegrityIssue) -> Self {
        Self {
            ok: false,
            first_invalid_index: Some(index),
            issue: Some(issue),
        }
    }
}

/// Ordered, hash-linked blocks for one solicitation
///
/// Never empty: construction seals a genesis block and imports reject zero
/// records.
#[derive(Debug, Clone)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// Start a chain with a genesis block, attributed to the system actor
    pub fn new(genesis: GenesisRecord, timestamp: Timestamp) -> Result<Self, LedgerError> {
        let block = Block::seal(0, timestamp, Actor::system(), Payload::Genesis(genesis), ZERO_HASH)?;
        tracing::debug!(block_hash = %block.block_hash(), "Genesis block sealed");
        Ok(Self { blocks: vec![block] })
    }

    /// Seal `payload`, performed by `actor`, after the current tail
    ///
    /// Returns a copy of the new block. Nothing is appended when the
    /// timestamp precedes the tail's.
    pub fn append(&mut self, payload: Payload, actor: Actor, timestamp: Timestamp) -> Result<Block, LedgerError> {
        let tail = self.tail();
        if timestamp < tail.timestamp() {
            return Err(LedgerError::TimestampRegression {
                index: tail.index(),
                tail: tail.timestamp(),
                attempted: timestamp,
            });
        }

        let block = Block::seal(tail.index() + 1, timestamp, actor, payload, tail.block_hash())?;
        tracing::debug!(
            index = block.index(),
            payload_type = %block.payload_type(),
            actor = %block.actor(),
            block_hash = %block.block_hash(),
            "Block appended"
        );

        self.blocks.push(block.clone());
        Ok(block)
    }

    /// Walk every block, stopping at the first that fails
    ///
    /// Checks, per block: index continuity, the previous-hash link, the
    /// payload hash, then the block hash.
    pub fn validate(&self) -> Validation {
        let mut expected_previous = ZERO_HASH;

        for (position, block) in self.blocks.iter().enumerate() {
            let position = position as u64;

            if let Some(issue) = check_block(position, expected_previous, block) {
                tracing::warn!(index = position, %issue, "Chain validation failed");
                return Validation::invalid(position, issue);
            }

            expected_previous = block.block_hash();
        }

        Validation::valid()
    }

    /// Like [`Chain::validate`], as a `Result`
    pub fn ensure_valid(&self) -> Result<(), IntegrityError> {
        let validation = self.validate();
        match (validation.first_invalid_index, validation.issue) {
            (Some(index), Some(issue)) => Err(IntegrityError { index, issue }),
            _ => Ok(()),
        }
    }

    /// Lazily iterate blocks matching `predicate`
    pub fn find<P>(&self, predicate: P) -> Find<'_, P>
    where
        P: Fn(&Block) -> bool,
    {
        Find {
            blocks: self.blocks.iter(),
            predicate,
        }
    }

    /// Blocks whose payload belongs to `solicitation_id`
    pub fn blocks_for(&self, solicitation_id: SolicitationId) -> Find<'_, impl Fn(&Block) -> bool + Clone> {
        self.find(move |block| block.payload().solicitation_id() == solicitation_id)
    }

    /// Blocks carrying `payload_type`
    pub fn blocks_of_type(&self, payload_type: PayloadType) -> Find<'_, impl Fn(&Block) -> bool + Clone> {
        self.find(move |block| block.payload_type() == payload_type)
    }

    /// All blocks in order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Block at `index`
    pub fn get(&self, index: u64) -> Option<&Block> {
        usize::try_from(index).ok().and_then(|i| self.blocks.get(i))
    }

    /// Most recent block
    pub fn tail(&self) -> &Block {
        // never empty
        &self.blocks[self.blocks.len() - 1]
    }

    /// Number of blocks, genesis included
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the chain holds no blocks
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Recorded block hashes in order
    pub fn block_hashes(&self) -> Vec<String> {
        self.blocks.iter().map(|b| b.block_hash().to_string()).collect()
    }

    /// Snapshot of every block as an export record
    pub fn export(&self) -> Result<Vec<BlockRecord>, LedgerError> {
        self.blocks.iter().map(Block::to_record).collect()
    }

    /// Export as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, LedgerError> {
        Ok(serde_json::to_string_pretty(&self.export()?)?)
    }

    /// Load records exactly as given
    ///
    /// Stored hashes are kept, not recomputed; call [`Chain::validate`] to
    /// find out whether the records were altered.
    pub fn from_records(records: Vec<BlockRecord>) -> Result<Self, LedgerError> {
        if records.is_empty() {
            return Err(LedgerError::EmptyChain);
        }

        let blocks = records
            .into_iter()
            .map(Block::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { blocks })
    }

    /// Load from the JSON produced by [`Chain::to_json`]
    pub fn from_json(json: &str) -> Result<Self, LedgerError> {
        let records: Vec<BlockRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }
}

fn check_block(position: u64, expected_previous: &str, block: &Block) -> Option<IntegrityIssue> {
    if block.index() != position {
        return Some(IntegrityIssue::IndexMismatch {
            expected: position,
            actual: block.index(),
        });
    }

    if block.previous_hash() != expected_previous {
        return Some(IntegrityIssue::BrokenLink {
            expected: expected_previous.to_string(),
            actual: block.previous_hash().to_string(),
        });
    }

    let recomputed_payload = match payload_hash(block.payload()) {
        Ok(hash) => hash,
        Err(e) => return Some(IntegrityIssue::Unhashable(e.to_string())),
    };
    if block.payload_hash() != recomputed_payload {
        return Some(IntegrityIssue::PayloadHashMismatch {
            expected: recomputed_payload,
            actual: block.payload_hash().to_string(),
        });
    }

    let recomputed_block = block_hash(
        block.index(),
        block.payload_hash(),
        block.previous_hash(),
        &block.timestamp(),
        block.actor(),
    );
    if block.block_hash() != recomputed_block {
        return Some(IntegrityIssue::BlockHashMismatch {
            expected: recomputed_block,
            actual: block.block_hash().to_string(),
        });
    }

    None
}

/// Iterator returned by [`Chain::find`]
///
/// Restartable: clone it before consuming to walk the matches again.
#[derive(Clone)]
pub struct Find<'a, P> {
    blocks: std::slice::Iter<'a, Block>,
    predicate: P,
}

impl<'a, P> Iterator for Find<'a, P>
where
    P: Fn(&Block) -> bool,
{
    type Item = &'a Block;

    fn next(&mut self) -> Option<Self::Item> {
        let predicate = &self.predicate;
        self.blocks.find(|block| predicate(block))
    }
}

impl<P> std::fmt::Debug for Find<'_, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Find").field("remaining", &self.blocks.len()).finish()
    }
}
