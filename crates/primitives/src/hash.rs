//! Hashing used across the bridge.
//!
//! Every multi-field hash is keccak256 over the ABI parameter encoding of the
//! fields, so each scalar takes one 32-byte word and arrays are encoded with
//! their usual offset/length prefix. This keeps the values identical to the
//! ones computed by the contracts on either chain.

use alloy_primitives::{keccak256, Address as AlloyAddress, FixedBytes, B256, U256};
use alloy_sol_types::SolValue;

use crate::{
    buf::Buf32,
    ids::{Address, BlockHash, CoreIdentifier, KernelHash},
};

/// Plain keccak256 of a byte string.
pub fn keccak(data: &[u8]) -> Buf32 {
    keccak256(data).into()
}

/// Folds a block's transaction root into the accumulated root of its parent.
pub fn accumulate_tx_root(accumulated: &Buf32, tx_root: &Buf32) -> Buf32 {
    let encoded = (B256::from(*accumulated), B256::from(*tx_root)).abi_encode_params();
    keccak(&encoded)
}

/// Computes the hash of a kernel from its fields.
pub fn compute_kernel_hash(
    height: u64,
    parent: &KernelHash,
    validators: &[Address],
    weights: &[u64],
    activation_block: &BlockHash,
) -> KernelHash {
    let validators: Vec<AlloyAddress> = validators
        .iter()
        .map(|v| AlloyAddress::from(*v.inner()))
        .collect();
    let weights: Vec<U256> = weights.iter().map(|w| U256::from(*w)).collect();

    let encoded = (
        U256::from(height),
        B256::from(*parent.inner()),
        validators,
        weights,
        B256::from(*activation_block.inner()),
    )
        .abi_encode_params();

    KernelHash::from(keccak(&encoded))
}

/// Computes the hash validators sign when voting on a transition.
#[expect(clippy::too_many_arguments, reason = "mirrors the signed payload")]
pub fn compute_transition_hash(
    core_identifier: &CoreIdentifier,
    kernel_hash: &KernelHash,
    dynasty: u64,
    block_hash: &BlockHash,
    accumulated_gas: u64,
    origin_dynasty: u64,
    origin_block_hash: &BlockHash,
    accumulated_tx_root: &Buf32,
) -> Buf32 {
    let encoded = (
        FixedBytes::<20>::from(*core_identifier.inner()),
        B256::from(*kernel_hash.inner()),
        U256::from(dynasty),
        B256::from(*block_hash.inner()),
        U256::from(accumulated_gas),
        U256::from(origin_dynasty),
        B256::from(*origin_block_hash.inner()),
        B256::from(*accumulated_tx_root),
    )
        .abi_encode_params();

    keccak(&encoded)
}
