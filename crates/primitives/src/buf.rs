//! Fixed-size byte buffers used for hashes and account addresses.

use alloy_primitives::{Address as AlloyAddress, FixedBytes, B256};
use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};

/// 32-byte buffer, used for hashes and roots.
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
)]
pub struct Buf32(pub [u8; 32]);

impl_buf_common!(Buf32, 32);

/// 20-byte buffer, used for account addresses and core identifiers.
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
)]
pub struct Buf20(pub [u8; 20]);

impl_buf_common!(Buf20, 20);

impl From<Buf32> for B256 {
    fn from(value: Buf32) -> Self {
        B256::from(value.0)
    }
}

impl From<B256> for Buf32 {
    fn from(value: B256) -> Self {
        Self(value.0)
    }
}

impl From<Buf20> for AlloyAddress {
    fn from(value: Buf20) -> Self {
        AlloyAddress::from(value.0)
    }
}

impl From<Buf20> for FixedBytes<20> {
    fn from(value: Buf20) -> Self {
        FixedBytes::from(value.0)
    }
}
