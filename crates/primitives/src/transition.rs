//! Transition objects, the payload validators vote on.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::{
    buf::Buf32,
    hash::compute_transition_hash,
    ids::{BlockHash, CoreIdentifier, KernelHash},
};

/// Snapshot of the origin chain taken when an auxiliary block is reported.
///
/// Blocks of the origin store carry none and contribute zero values to their
/// transition objects.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Eq,
    PartialEq,
    Hash,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
pub struct OriginSnapshot {
    dynasty: u64,
    block_hash: BlockHash,
    height: u64,
}

impl OriginSnapshot {
    pub fn new(dynasty: u64, block_hash: BlockHash, height: u64) -> Self {
        Self {
            dynasty,
            block_hash,
            height,
        }
    }

    pub fn dynasty(&self) -> u64 {
        self.dynasty
    }

    pub fn block_hash(&self) -> &BlockHash {
        &self.block_hash
    }

    pub fn height(&self) -> u64 {
        self.height
    }
}

/// Everything a vote on a checkpoint commits to.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct TransitionObject {
    core_identifier: CoreIdentifier,
    kernel_hash: KernelHash,
    dynasty: u64,
    block_hash: BlockHash,
    accumulated_gas: u64,
    origin_dynasty: u64,
    origin_block_hash: BlockHash,
    accumulated_tx_root: Buf32,
}

impl TransitionObject {
    pub fn new(
        core_identifier: CoreIdentifier,
        kernel_hash: KernelHash,
        dynasty: u64,
        block_hash: BlockHash,
        accumulated_gas: u64,
        origin: OriginSnapshot,
        accumulated_tx_root: Buf32,
    ) -> Self {
        Self {
            core_identifier,
            kernel_hash,
            dynasty,
            block_hash,
            accumulated_gas,
            origin_dynasty: origin.dynasty(),
            origin_block_hash: *origin.block_hash(),
            accumulated_tx_root,
        }
    }

    pub fn core_identifier(&self) -> &CoreIdentifier {
        &self.core_identifier
    }

    pub fn kernel_hash(&self) -> &KernelHash {
        &self.kernel_hash
    }

    pub fn dynasty(&self) -> u64 {
        self.dynasty
    }

    pub fn block_hash(&self) -> &BlockHash {
        &self.block_hash
    }

    pub fn accumulated_gas(&self) -> u64 {
        self.accumulated_gas
    }

    pub fn origin_dynasty(&self) -> u64 {
        self.origin_dynasty
    }

    pub fn origin_block_hash(&self) -> &BlockHash {
        &self.origin_block_hash
    }

    pub fn accumulated_tx_root(&self) -> &Buf32 {
        &self.accumulated_tx_root
    }

    /// Computes the hash validators sign for this transition.
    pub fn compute_hash(&self) -> Buf32 {
        compute_transition_hash(
            &self.core_identifier,
            &self.kernel_hash,
            self.dynasty,
            &self.block_hash,
            self.accumulated_gas,
            self.origin_dynasty,
            &self.origin_block_hash,
            &self.accumulated_tx_root,
        )
    }
}
