//! Records kept for every reported block and justified checkpoint.

use borsh::{BorshDeserialize, BorshSerialize};
use mosaic_primitives::{BlockHash, Buf32, OriginSnapshot};
use serde::{Deserialize, Serialize};

/// A block accepted by `report_block`.  Never changes once stored.
#[derive(
    Clone, Debug, Eq, PartialEq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct ReportedBlock {
    hash: BlockHash,
    height: u64,
    parent_hash: BlockHash,
    state_root: Buf32,

    /// Gas used by every block from genesis up to and including this one.
    accumulated_gas: u64,

    /// Running fold of transaction roots from genesis.
    accumulated_tx_root: Buf32,

    /// Origin chain as seen when the block was reported, only recorded by the
    /// auxiliary store.
    origin: Option<OriginSnapshot>,
}

impl ReportedBlock {
    pub(crate) fn new(
        hash: BlockHash,
        height: u64,
        parent_hash: BlockHash,
        state_root: Buf32,
        accumulated_gas: u64,
        accumulated_tx_root: Buf32,
        origin: Option<OriginSnapshot>,
    ) -> Self {
        Self {
            hash,
            height,
            parent_hash,
            state_root,
            accumulated_gas,
            accumulated_tx_root,
            origin,
        }
    }

    pub fn hash(&self) -> &BlockHash {
        &self.hash
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn parent_hash(&self) -> &BlockHash {
        &self.parent_hash
    }

    pub fn state_root(&self) -> &Buf32 {
        &self.state_root
    }

    pub fn accumulated_gas(&self) -> u64 {
        self.accumulated_gas
    }

    pub fn accumulated_tx_root(&self) -> &Buf32 {
        &self.accumulated_tx_root
    }

    pub fn origin(&self) -> Option<&OriginSnapshot> {
        self.origin.as_ref()
    }
}

/// A justified checkpoint.
///
/// Only justified checkpoints get a record, so its parent is fixed from the
/// moment it exists.
#[derive(
    Clone, Debug, Eq, PartialEq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct Checkpoint {
    block_hash: BlockHash,

    /// Source the checkpoint was justified from, zero for genesis.
    parent: BlockHash,

    /// Number of justified checkpoints from genesis (exclusive) up to this
    /// one.
    dynasty: u64,

    finalized: bool,
}

impl Checkpoint {
    pub(crate) fn genesis(block_hash: BlockHash) -> Self {
        Self {
            block_hash,
            parent: BlockHash::zero(),
            dynasty: 0,
            finalized: true,
        }
    }

    pub(crate) fn justified(block_hash: BlockHash, parent: BlockHash, dynasty: u64) -> Self {
        Self {
            block_hash,
            parent,
            dynasty,
            finalized: false,
        }
    }

    pub(crate) fn finalize(&mut self) {
        self.finalized = true;
    }

    pub fn block_hash(&self) -> &BlockHash {
        &self.block_hash
    }

    pub fn parent(&self) -> &BlockHash {
        &self.parent
    }

    pub fn dynasty(&self) -> u64 {
        self.dynasty
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}
