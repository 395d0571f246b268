//! Validator and meta-block records.

use borsh::{BorshDeserialize, BorshSerialize};
use mosaic_primitives::Address;
use serde::{Deserialize, Serialize};

/// A weighted member of the validator set.
///
/// Heights are meta-block heights, not block heights of either chain.  A
/// validator takes part from `start_height` on; once `ended` it stops taking
/// part at `end_height`.
#[derive(
    Clone, Debug, Eq, PartialEq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct Validator {
    address: Address,
    weight: u64,
    ended: bool,
    start_height: u64,
    end_height: u64,
}

impl Validator {
    pub(crate) fn new(address: Address, weight: u64, start_height: u64) -> Self {
        Self {
            address,
            weight,
            ended: false,
            start_height,
            end_height: 0,
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn weight(&self) -> u64 {
        self.weight
    }

    pub fn ended(&self) -> bool {
        self.ended
    }

    pub fn start_height(&self) -> u64 {
        self.start_height
    }

    pub fn end_height(&self) -> u64 {
        self.end_height
    }

    /// Whether the validator takes part in the given meta-block.
    pub fn is_active_at(&self, meta_block_height: u64) -> bool {
        meta_block_height >= self.start_height
            && (!self.ended || meta_block_height < self.end_height)
    }
}

/// What the registry recorded when it entered a meta-block.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct MetaBlock {
    /// Origin height that closed the previous meta-block, absent for the
    /// initial one.
    origin_height: Option<u64>,

    /// Auxiliary height that closed the previous meta-block, absent for the
    /// initial one.
    auxiliary_height: Option<u64>,

    /// Sum of the weights of every validator active in this meta-block.
    total_weight: u64,
}

impl MetaBlock {
    pub(crate) fn genesis(total_weight: u64) -> Self {
        Self {
            origin_height: None,
            auxiliary_height: None,
            total_weight,
        }
    }

    pub(crate) fn new(origin_height: u64, auxiliary_height: u64, total_weight: u64) -> Self {
        Self {
            origin_height: Some(origin_height),
            auxiliary_height: Some(auxiliary_height),
            total_weight,
        }
    }

    pub fn origin_height(&self) -> Option<u64> {
        self.origin_height
    }

    pub fn auxiliary_height(&self) -> Option<u64> {
        self.auxiliary_height
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }
}
