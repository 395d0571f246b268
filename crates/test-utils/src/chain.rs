//! Builder for chains of real RLP-encoded Ethereum headers.

use alloy_consensus::Header;
use alloy_primitives::{Bytes, B256};
use mosaic_primitives::{hash::keccak, BlockHash, Buf32};

/// A header produced by [`ChainBuilder`] together with the values the stores
/// will decode from it.
#[derive(Clone, Debug)]
pub struct TestBlock {
    pub raw: Vec<u8>,
    pub hash: BlockHash,
    pub parent_hash: BlockHash,
    pub height: u64,
    pub state_root: Buf32,
    pub transactions_root: Buf32,
    pub gas_used: u64,
}

/// Builds a linear chain of headers starting at an arbitrary height.
///
/// Forks share the prefix of the chain they were taken from but produce
/// different hashes from the fork point on, since the salt goes into the
/// header's extra data.
#[derive(Clone, Debug)]
pub struct ChainBuilder {
    blocks: Vec<TestBlock>,
    salt: u8,
}

impl ChainBuilder {
    /// Starts a chain whose first block sits at `genesis_height` and has a
    /// zero parent.
    pub fn new(genesis_height: u64) -> Self {
        let genesis = make_block(BlockHash::zero(), genesis_height, 0);
        Self {
            blocks: vec![genesis],
            salt: 0,
        }
    }

    pub fn genesis(&self) -> &TestBlock {
        &self.blocks[0]
    }

    pub fn tip(&self) -> &TestBlock {
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn blocks(&self) -> &[TestBlock] {
        &self.blocks
    }

    /// Blocks after genesis, in the order they have to be reported.
    pub fn descendants(&self) -> &[TestBlock] {
        &self.blocks[1..]
    }

    pub fn block_at(&self, height: u64) -> Option<&TestBlock> {
        let offset = height.checked_sub(self.genesis().height)?;
        self.blocks.get(usize::try_from(offset).ok()?)
    }

    pub fn hash_at(&self, height: u64) -> BlockHash {
        self.block_at(height)
            .map(|b| b.hash)
            .unwrap_or_else(|| panic!("test: no block at height {height}"))
    }

    /// Appends `count` blocks and returns them.
    pub fn extend(&mut self, count: usize) -> &[TestBlock] {
        let start = self.blocks.len();
        for _ in 0..count {
            let tip = self.tip();
            let block = make_block(tip.hash, tip.height + 1, self.salt);
            self.blocks.push(block);
        }
        &self.blocks[start..]
    }

    /// Extends the chain until its tip is at `height`.
    pub fn extend_to(&mut self, height: u64) -> &[TestBlock] {
        let count = height.saturating_sub(self.tip().height);
        self.extend(count as usize)
    }

    /// Returns a new builder that shares this chain up to `height` and then
    /// diverges.
    pub fn fork_at(&self, height: u64, salt: u8) -> Self {
        assert_ne!(salt, 0, "test: fork salt must differ from the main chain");
        let offset = (height - self.genesis().height) as usize;
        Self {
            blocks: self.blocks[..=offset].to_vec(),
            salt,
        }
    }
}

fn make_block(parent_hash: BlockHash, height: u64, salt: u8) -> TestBlock {
    let state_root = tagged_root(b"state", height, salt);
    let transactions_root = tagged_root(b"txs", height, salt);
    let gas_used = 21_000 * (height % 5 + 1);

    let header = Header {
        parent_hash: B256::from(*parent_hash.inner()),
        state_root: B256::from(state_root),
        transactions_root: B256::from(transactions_root),
        gas_used,
        gas_limit: 30_000_000,
        number: height,
        timestamp: 1_700_000_000 + height * 12,
        extra_data: Bytes::from(vec![salt]),
        ..Default::default()
    };
    let raw = alloy_rlp::encode(&header);
    let hash = BlockHash::from(keccak(&raw));

    TestBlock {
        raw,
        hash,
        parent_hash,
        height,
        state_root,
        transactions_root,
        gas_used,
    }
}

fn tagged_root(tag: &[u8], height: u64, salt: u8) -> Buf32 {
    let mut data = tag.to_vec();
    data.extend_from_slice(&height.to_be_bytes());
    data.push(salt);
    keccak(&data)
}
