//! Kernel objects, the staged validator-set transitions.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::{
    hash::compute_kernel_hash,
    ids::{Address, BlockHash, KernelHash},
};

/// A validator-set transition proposed on the origin chain.
///
/// The kernel at `height` extends the kernel at `height - 1` (its parent) and
/// becomes active on the auxiliary chain some time after the block
/// `activation_block` has been justified there.  The genesis kernel has
/// height 0 and a zero activation block.
#[derive(
    Clone, Debug, Eq, PartialEq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct Kernel {
    height: u64,
    parent: KernelHash,
    validators: Vec<Address>,
    weights: Vec<u64>,
    activation_block: BlockHash,
    hash: KernelHash,
}

impl Kernel {
    /// Builds a kernel and computes its hash.
    ///
    /// Callers must make sure `validators` and `weights` have the same length.
    pub fn new(
        height: u64,
        parent: KernelHash,
        validators: Vec<Address>,
        weights: Vec<u64>,
        activation_block: BlockHash,
    ) -> Self {
        let hash = compute_kernel_hash(height, &parent, &validators, &weights, &activation_block);
        Self {
            height,
            parent,
            validators,
            weights,
            activation_block,
            hash,
        }
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn parent(&self) -> &KernelHash {
        &self.parent
    }

    pub fn validators(&self) -> &[Address] {
        &self.validators
    }

    pub fn weights(&self) -> &[u64] {
        &self.weights
    }

    pub fn activation_block(&self) -> &BlockHash {
        &self.activation_block
    }

    pub fn hash(&self) -> &KernelHash {
        &self.hash
    }

    /// Whether this is a genesis kernel.
    pub fn is_genesis(&self) -> bool {
        self.height == 0
    }
}
