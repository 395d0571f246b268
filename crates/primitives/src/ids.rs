//! Identifier newtypes.

use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::buf::{Buf20, Buf32};

/// ID of a reported block, the hash of its raw header.
#[derive(
    Copy,
    Clone,
    Eq,
    Default,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Arbitrary,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct BlockHash(Buf32);

impl_buf_wrapper!(BlockHash, Buf32, 32);

/// Hash of a kernel, committing to a validator-set transition.
#[derive(
    Copy,
    Clone,
    Eq,
    Default,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Arbitrary,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct KernelHash(Buf32);

impl_buf_wrapper!(KernelHash, Buf32, 32);

/// Account address, used both for validators and for caller identities.
#[derive(
    Copy,
    Clone,
    Eq,
    Default,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Arbitrary,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Address(Buf20);

impl_buf_wrapper!(Address, Buf20, 20);

/// Identifies the core of the auxiliary chain that both stores attest for.
#[derive(
    Copy,
    Clone,
    Eq,
    Default,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Arbitrary,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct CoreIdentifier(Buf20);

impl_buf_wrapper!(CoreIdentifier, Buf20, 20);

/// Read-only description of the chain pair a store participates in.
///
/// Both the origin and the auxiliary stores are handed the same descriptor,
/// so neither needs a live handle to the other to know which core the
/// transition objects are bound to.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Hash, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct ChainDescriptor {
    core_identifier: CoreIdentifier,
}

impl ChainDescriptor {
    pub fn new(core_identifier: CoreIdentifier) -> Self {
        Self { core_identifier }
    }

    pub fn core_identifier(&self) -> CoreIdentifier {
        self.core_identifier
    }
}
