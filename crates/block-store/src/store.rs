//! Checkpoint store for one observed chain.

use std::{
    collections::{BTreeMap, HashMap},
    mem,
};

use mosaic_primitives::{
    hash::accumulate_tx_root, Address, BlockHash, Buf32, ChainDescriptor, HeaderCodec,
    KernelHash, OriginSnapshot, TransitionObject,
};
use tracing::{debug, info, warn};

use crate::{
    block::{Checkpoint, ReportedBlock},
    errors::{StoreError, StoreResult},
    events::StoreEvent,
    params::StoreParams,
};

/// Everything `justify` needs to apply a justification that already passed
/// its checks.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct JustifyPlan {
    pub(crate) source: BlockHash,
    pub(crate) target: BlockHash,
    pub(crate) target_height: u64,
    pub(crate) target_dynasty: u64,

    /// Whether the source becomes finalized.
    pub(crate) finalizes: bool,
}

/// Records the blocks of one chain and the checkpoints validators justify
/// on it.
///
/// Blocks are reported one by one, each on top of an already known parent.
/// Blocks at heights that are multiples of the epoch length are checkpoints.
/// The registered authority justifies checkpoints by linking a justified
/// source to a higher target; a source whose direct epoch-child gets
/// justified becomes finalized.  The head is the highest justified
/// checkpoint.
#[derive(Debug)]
pub struct BlockStore<C> {
    codec: C,
    descriptor: ChainDescriptor,

    /// Identity allowed to call [`Self::justify`].
    authority: Address,

    epoch_length: u64,
    genesis: BlockHash,

    blocks: HashMap<BlockHash, ReportedBlock>,

    /// Justified checkpoints, keyed by block hash.
    checkpoints: HashMap<BlockHash, Checkpoint>,

    /// Justified checkpoints, keyed by height.
    justified_heights: BTreeMap<u64, BlockHash>,

    head: BlockHash,
    latest_finalized: BlockHash,

    events: Vec<StoreEvent>,
}

impl<C: HeaderCodec> BlockStore<C> {
    pub fn new(
        codec: C,
        descriptor: ChainDescriptor,
        authority: Address,
        params: StoreParams,
    ) -> StoreResult<Self> {
        let StoreParams {
            epoch_length,
            genesis,
        } = params;

        if epoch_length == 0 {
            return Err(StoreError::ZeroEpochLength);
        }
        if genesis.height % epoch_length != 0 {
            return Err(StoreError::MisalignedGenesis {
                height: genesis.height,
                epoch_length,
            });
        }
        if genesis.block_hash.is_zero() {
            return Err(StoreError::ZeroGenesisHash);
        }
        if authority.is_zero() {
            return Err(StoreError::ZeroIdentity);
        }

        let hash = genesis.block_hash;
        let block = ReportedBlock::new(
            hash,
            genesis.height,
            BlockHash::zero(),
            genesis.state_root,
            genesis.accumulated_gas,
            genesis.accumulated_tx_root,
            genesis.origin,
        );

        info!(%hash, height = genesis.height, epoch_length, "initialized block store");

        Ok(Self {
            codec,
            descriptor,
            authority,
            epoch_length,
            genesis: hash,
            blocks: HashMap::from([(hash, block)]),
            checkpoints: HashMap::from([(hash, Checkpoint::genesis(hash))]),
            justified_heights: BTreeMap::from([(genesis.height, hash)]),
            head: hash,
            latest_finalized: hash,
            events: Vec::new(),
        })
    }

    /// Decodes and records a raw header, returning its hash.
    ///
    /// Reporting a known block again is a no-op.
    pub fn report_block(&mut self, raw: &[u8]) -> StoreResult<BlockHash> {
        self.report_block_with(raw, None)
    }

    /// Records a block together with the origin snapshot taken for it.
    pub(crate) fn report_block_with(
        &mut self,
        raw: &[u8],
        origin: Option<OriginSnapshot>,
    ) -> StoreResult<BlockHash> {
        let header = self.codec.decode(raw)?;
        let hash = self.codec.block_hash(raw);

        if self.blocks.contains_key(&hash) {
            debug!(%hash, "block already reported");
            return Ok(hash);
        }

        let parent = self
            .blocks
            .get(&header.parent_hash)
            .ok_or(StoreError::UnknownParent(header.parent_hash))?;

        if parent.height().checked_add(1) != Some(header.height) {
            return Err(StoreError::HeightNotParentSuccessor {
                parent_height: parent.height(),
                height: header.height,
            });
        }

        let accumulated_gas = parent
            .accumulated_gas()
            .checked_add(header.gas_used)
            .ok_or(StoreError::GasOverflow(hash))?;
        let accumulated_tx_root =
            accumulate_tx_root(parent.accumulated_tx_root(), &header.transactions_root);

        let block = ReportedBlock::new(
            hash,
            header.height,
            header.parent_hash,
            header.state_root,
            accumulated_gas,
            accumulated_tx_root,
            origin,
        );
        self.blocks.insert(hash, block);
        self.events.push(StoreEvent::BlockReported(hash));

        debug!(%hash, height = header.height, accumulated_gas, "reported block");
        Ok(hash)
    }
}

impl<C> BlockStore<C> {
    pub fn descriptor(&self) -> &ChainDescriptor {
        &self.descriptor
    }

    pub fn epoch_length(&self) -> u64 {
        self.epoch_length
    }

    pub fn genesis(&self) -> &BlockHash {
        &self.genesis
    }

    /// Justifies `target` from `source` on behalf of `caller`.
    pub fn justify(
        &mut self,
        caller: &Address,
        source: &BlockHash,
        target: &BlockHash,
    ) -> StoreResult<()> {
        let plan = self.check_justify(caller, source, target)?;
        self.apply_justify(&plan);
        Ok(())
    }

    /// Runs every check of `justify` without changing anything.
    pub(crate) fn check_justify(
        &self,
        caller: &Address,
        source: &BlockHash,
        target: &BlockHash,
    ) -> StoreResult<JustifyPlan> {
        if *caller != self.authority {
            warn!(%caller, "rejected justification from unregistered caller");
            return Err(StoreError::Unauthorized(*caller));
        }

        let source_block = self
            .blocks
            .get(source)
            .ok_or(StoreError::UnknownSource(*source))?;
        let source_checkpoint = self
            .checkpoints
            .get(source)
            .ok_or(StoreError::SourceNotJustified(*source))?;
        let target_block = self
            .blocks
            .get(target)
            .ok_or(StoreError::UnknownTarget(*target))?;

        let target_height = target_block.height();
        if target_height % self.epoch_length != 0 {
            return Err(StoreError::EpochMisaligned {
                height: target_height,
                epoch_length: self.epoch_length,
            });
        }

        let head_height = self.head_height();
        if target_height <= head_height {
            return Err(StoreError::TargetNotAboveHead {
                target_height,
                head_height,
            });
        }

        if self.checkpoints.contains_key(target) {
            return Err(StoreError::TargetAlreadyJustified(*target));
        }

        let source_height = source_block.height();
        if target_height <= source_height {
            return Err(StoreError::TargetNotAboveSource {
                source_height,
                target_height,
            });
        }

        if !self.is_ancestor(source, target) {
            return Err(StoreError::NotADescendant {
                ancestor: *source,
                target: *target,
            });
        }

        Ok(JustifyPlan {
            source: *source,
            target: *target,
            target_height,
            target_dynasty: source_checkpoint.dynasty() + 1,
            finalizes: target_height - source_height == self.epoch_length
                && !source_checkpoint.is_finalized(),
        })
    }

    /// Writes a justification checked by [`Self::check_justify`].
    pub(crate) fn apply_justify(&mut self, plan: &JustifyPlan) {
        let JustifyPlan {
            source,
            target,
            target_height,
            target_dynasty,
            finalizes,
        } = *plan;

        self.checkpoints.insert(
            target,
            Checkpoint::justified(target, source, target_dynasty),
        );
        self.justified_heights.insert(target_height, target);
        self.head = target;
        self.events.push(StoreEvent::BlockJustified(target));
        info!(%source, %target, height = target_height, dynasty = target_dynasty, "justified checkpoint");

        if finalizes {
            if let Some(checkpoint) = self.checkpoints.get_mut(&source) {
                checkpoint.finalize();
            }
            self.latest_finalized = source;
            self.events.push(StoreEvent::BlockFinalised(source));
            info!(%source, "finalized checkpoint");
        }
    }

    /// Checks whether `ancestor` lies on the parent chain of `block`.
    pub fn is_ancestor(&self, ancestor: &BlockHash, block: &BlockHash) -> bool {
        let Some(ancestor_height) = self.blocks.get(ancestor).map(ReportedBlock::height) else {
            return false;
        };

        let mut cursor = *block;
        loop {
            let Some(current) = self.blocks.get(&cursor) else {
                return false;
            };
            if current.height() <= ancestor_height {
                return cursor == *ancestor;
            }
            cursor = *current.parent_hash();
        }
    }

    /// Structural part of vote validation, everything except the transition
    /// hash comparison.
    pub(crate) fn is_vote_link_valid(&self, source: &BlockHash, target: &BlockHash) -> bool {
        let (Some(source_block), Some(target_block)) =
            (self.blocks.get(source), self.blocks.get(target))
        else {
            return false;
        };

        self.checkpoints.contains_key(source)
            && target_block.height() % self.epoch_length == 0
            && !self.checkpoints.contains_key(target)
            && target_block.height() > source_block.height()
            && self.is_ancestor(source, target)
    }

    /// Checks a vote for the link `source -> target`.
    ///
    /// `transition_hash` must be the hash of the transition object of
    /// `source`.  Never fails, an invalid vote just yields `false`.
    pub fn is_vote_valid(
        &self,
        transition_hash: &Buf32,
        source: &BlockHash,
        target: &BlockHash,
    ) -> bool {
        self.is_vote_link_valid(source, target)
            && self
                .transition_hash_at(source)
                .is_some_and(|h| h == *transition_hash)
    }

    /// Builds the transition object of a justified checkpoint, bound to the
    /// given kernel.
    pub(crate) fn transition_object_with(
        &self,
        hash: &BlockHash,
        kernel_hash: KernelHash,
    ) -> Option<TransitionObject> {
        let block = self.blocks.get(hash)?;
        let checkpoint = self.checkpoints.get(hash)?;

        Some(TransitionObject::new(
            self.descriptor.core_identifier(),
            kernel_hash,
            checkpoint.dynasty(),
            *hash,
            block.accumulated_gas(),
            block.origin().copied().unwrap_or_default(),
            *block.accumulated_tx_root(),
        ))
    }

    /// Transition object validators sign for a justified checkpoint.
    ///
    /// Blocks of a store that tracks no kernels are bound to the zero kernel.
    pub fn transition_object_at(&self, hash: &BlockHash) -> Option<TransitionObject> {
        self.transition_object_with(hash, KernelHash::zero())
    }

    pub fn transition_hash_at(&self, hash: &BlockHash) -> Option<Buf32> {
        self.transition_object_at(hash)
            .map(|t| t.compute_hash())
    }

    /// State root of the justified checkpoint at `height`, which must not be
    /// above the latest finalized checkpoint.
    pub fn state_root(&self, height: u64) -> StoreResult<Buf32> {
        let genesis_height = self.genesis_height();
        if height < genesis_height {
            return Err(StoreError::BelowStartingHeight {
                height,
                genesis_height,
            });
        }

        let finalized_height = self.latest_finalized_height();
        if height > finalized_height {
            return Err(StoreError::AboveFinalizedHeight {
                height,
                finalized_height,
            });
        }

        self.justified_heights
            .get(&height)
            .and_then(|hash| self.blocks.get(hash))
            .map(|block| *block.state_root())
            .ok_or(StoreError::NotAJustifiedCheckpoint(height))
    }

    pub fn is_block_reported(&self, hash: &BlockHash) -> bool {
        self.blocks.contains_key(hash)
    }

    pub fn reported_block(&self, hash: &BlockHash) -> Option<&ReportedBlock> {
        self.blocks.get(hash)
    }

    /// Justified checkpoint record of a block, if it was justified.
    pub fn checkpoint(&self, hash: &BlockHash) -> Option<&Checkpoint> {
        self.checkpoints.get(hash)
    }

    pub fn is_justified(&self, hash: &BlockHash) -> bool {
        self.checkpoints.contains_key(hash)
    }

    pub fn is_finalized(&self, hash: &BlockHash) -> bool {
        self.checkpoints
            .get(hash)
            .is_some_and(Checkpoint::is_finalized)
    }

    /// Dynasty of a justified checkpoint.
    pub fn dynasty_of(&self, hash: &BlockHash) -> Option<u64> {
        self.checkpoints.get(hash).map(Checkpoint::dynasty)
    }

    pub fn accumulated_gas(&self, hash: &BlockHash) -> Option<u64> {
        self.blocks.get(hash).map(ReportedBlock::accumulated_gas)
    }

    pub fn accumulated_tx_root(&self, hash: &BlockHash) -> Option<Buf32> {
        self.blocks
            .get(hash)
            .map(|b| *b.accumulated_tx_root())
    }

    /// Highest justified checkpoint.
    pub fn head(&self) -> &BlockHash {
        &self.head
    }

    pub fn head_height(&self) -> u64 {
        self.height_of(&self.head)
    }

    /// Dynasty of the head.
    pub fn current_dynasty(&self) -> u64 {
        self.dynasty_of(&self.head).unwrap_or_default()
    }

    pub fn latest_finalized(&self) -> &BlockHash {
        &self.latest_finalized
    }

    pub fn latest_finalized_height(&self) -> u64 {
        self.height_of(&self.latest_finalized)
    }

    pub fn genesis_height(&self) -> u64 {
        self.height_of(&self.genesis)
    }

    /// Snapshot of this store as an observer on the other chain sees it.
    pub fn origin_snapshot(&self) -> OriginSnapshot {
        OriginSnapshot::new(self.current_dynasty(), self.head, self.head_height())
    }

    /// Takes the events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        mem::take(&mut self.events)
    }

    fn height_of(&self, hash: &BlockHash) -> u64 {
        // Head, genesis and the latest finalized block are always reported.
        self.blocks
            .get(hash)
            .map(ReportedBlock::height)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use mosaic_primitives::{
        hash::accumulate_tx_root, DecodedHeader, ErrorKind, EthHeaderCodec, HeaderDecodeError,
    };
    use mosaic_test_utils::{addr, core_id, ChainBuilder};
    use proptest::prelude::*;

    use super::*;
    use crate::{
        params::GenesisBlock,
        test_support::{authority, genesis_of, store_with_chain},
    };

    /// Codec over a fixed layout: parent hash, height and gas used, with
    /// zero roots.
    #[derive(Debug)]
    struct FixedLayoutCodec;

    impl HeaderCodec for FixedLayoutCodec {
        fn decode(&self, raw: &[u8]) -> Result<DecodedHeader, HeaderDecodeError> {
            if raw.len() != 48 {
                return Err(HeaderDecodeError::MalformedHeader(format!(
                    "expected 48 bytes, got {}",
                    raw.len()
                )));
            }
            let mut parent = [0u8; 32];
            parent.copy_from_slice(&raw[..32]);
            let mut height = [0u8; 8];
            height.copy_from_slice(&raw[32..40]);
            let mut gas = [0u8; 8];
            gas.copy_from_slice(&raw[40..]);

            Ok(DecodedHeader {
                parent_hash: BlockHash::from(parent),
                state_root: Buf32::zero(),
                transactions_root: Buf32::zero(),
                gas_used: u64::from_be_bytes(gas),
                height: u64::from_be_bytes(height),
            })
        }
    }

    fn fixed_header(parent: &BlockHash, height: u64, gas: u64) -> Vec<u8> {
        let mut raw = parent.inner().as_bytes().to_vec();
        raw.extend_from_slice(&height.to_be_bytes());
        raw.extend_from_slice(&gas.to_be_bytes());
        raw
    }

    fn fixed_store(genesis_gas: u64) -> BlockStore<FixedLayoutCodec> {
        let params = StoreParams {
            epoch_length: 2,
            genesis: GenesisBlock {
                block_hash: BlockHash::from([1; 32]),
                height: 0,
                state_root: Buf32::zero(),
                accumulated_gas: genesis_gas,
                accumulated_tx_root: Buf32::zero(),
                origin: None,
            },
        };
        BlockStore::new(
            FixedLayoutCodec,
            ChainDescriptor::new(core_id()),
            authority(),
            params,
        )
        .unwrap()
    }

    fn new_store(epoch_length: u64, genesis: GenesisBlock) -> StoreResult<BlockStore<EthHeaderCodec>> {
        BlockStore::new(
            EthHeaderCodec,
            ChainDescriptor::new(core_id()),
            authority(),
            StoreParams {
                epoch_length,
                genesis,
            },
        )
    }

    #[test]
    fn test_new_rejects_bad_params() {
        let chain = ChainBuilder::new(4);
        let genesis = genesis_of(chain.genesis());

        assert_eq!(
            new_store(0, genesis.clone()).unwrap_err(),
            StoreError::ZeroEpochLength
        );

        let err = new_store(3, genesis.clone()).unwrap_err();
        assert_eq!(
            err,
            StoreError::MisalignedGenesis {
                height: 4,
                epoch_length: 3
            }
        );
        assert_eq!(err.kind(), ErrorKind::Config);

        let zero_hash = GenesisBlock {
            block_hash: BlockHash::zero(),
            ..genesis.clone()
        };
        assert_eq!(
            new_store(2, zero_hash).unwrap_err(),
            StoreError::ZeroGenesisHash
        );

        let err = BlockStore::new(
            EthHeaderCodec,
            ChainDescriptor::new(core_id()),
            Address::zero(),
            StoreParams {
                epoch_length: 2,
                genesis,
            },
        )
        .unwrap_err();
        assert_eq!(err, StoreError::ZeroIdentity);
    }

    #[test]
    fn test_genesis_is_justified_and_finalized() {
        let (store, chain) = store_with_chain(3, 3, 3);
        let genesis = chain.genesis().hash;

        assert_eq!(store.genesis(), &genesis);
        assert_eq!(store.head(), &genesis);
        assert_eq!(store.latest_finalized(), &genesis);
        assert!(store.is_justified(&genesis));
        assert!(store.is_finalized(&genesis));
        assert_eq!(store.current_dynasty(), 0);
        assert_eq!(store.state_root(3).unwrap(), chain.genesis().state_root);
    }

    #[test]
    fn test_report_block_accumulates() {
        let (mut store, mut chain) = store_with_chain(3, 0, 0);
        chain.extend(2);

        for block in chain.descendants() {
            assert_eq!(store.report_block(&block.raw).unwrap(), block.hash);
        }

        let b1 = chain.block_at(1).unwrap();
        let b2 = chain.block_at(2).unwrap();
        assert_eq!(store.accumulated_gas(&b2.hash), Some(b1.gas_used + b2.gas_used));

        let root1 = accumulate_tx_root(&Buf32::zero(), &b1.transactions_root);
        let root2 = accumulate_tx_root(&root1, &b2.transactions_root);
        assert_eq!(store.accumulated_tx_root(&b2.hash), Some(root2));

        let reported = store.reported_block(&b2.hash).unwrap();
        assert_eq!(reported.height(), 2);
        assert_eq!(reported.parent_hash(), &b1.hash);
        assert!(reported.origin().is_none());

        assert_eq!(
            store.drain_events(),
            vec![
                StoreEvent::BlockReported(b1.hash),
                StoreEvent::BlockReported(b2.hash)
            ]
        );
    }

    #[test]
    fn test_report_block_is_idempotent() {
        let (mut store, chain) = store_with_chain(3, 0, 2);
        let block = chain.block_at(2).unwrap();

        assert_eq!(store.report_block(&block.raw).unwrap(), block.hash);
        assert!(store.drain_events().is_empty());
        assert_eq!(
            store.accumulated_gas(&block.hash),
            Some(chain.block_at(1).unwrap().gas_used + block.gas_used)
        );
    }

    #[test]
    fn test_report_block_rejects_unknown_parent() {
        let (mut store, _) = store_with_chain(3, 0, 0);
        let mut other = ChainBuilder::new(0).fork_at(0, 1);
        other.extend(2);
        let orphan = other.block_at(2).unwrap();

        let err = store.report_block(&orphan.raw).unwrap_err();
        assert_eq!(err, StoreError::UnknownParent(orphan.parent_hash));
        assert_eq!(err.kind(), ErrorKind::UnknownReference);
        assert!(!store.is_block_reported(&orphan.hash));
    }

    #[test]
    fn test_report_block_rejects_malformed_header() {
        let (mut store, _) = store_with_chain(3, 0, 0);
        let err = store.report_block(&[0xc0, 0x01]).unwrap_err();
        assert!(matches!(err, StoreError::MalformedHeader(_)));
        assert_eq!(err.kind(), ErrorKind::StructuralViolation);
    }

    #[test]
    fn test_report_block_rejects_height_gap() {
        let mut store = fixed_store(0);
        let genesis = *store.genesis();

        let err = store
            .report_block(&fixed_header(&genesis, 2, 10))
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::HeightNotParentSuccessor {
                parent_height: 0,
                height: 2
            }
        );
        assert_eq!(err.kind(), ErrorKind::StructuralViolation);
    }

    #[test]
    fn test_report_block_rejects_gas_overflow() {
        let mut store = fixed_store(u64::MAX - 5);
        let genesis = *store.genesis();

        let raw = fixed_header(&genesis, 1, 6);
        let err = store.report_block(&raw).unwrap_err();
        assert!(matches!(err, StoreError::GasOverflow(_)));
        assert!(store.drain_events().is_empty());

        let raw = fixed_header(&genesis, 1, 5);
        let hash = store.report_block(&raw).unwrap();
        assert_eq!(store.accumulated_gas(&hash), Some(u64::MAX));
    }

    #[test]
    fn test_justify_scenario_epoch_three() {
        let (mut store, chain) = store_with_chain(3, 0, 12);
        let g = chain.hash_at(0);
        let b3 = chain.hash_at(3);
        let b6 = chain.hash_at(6);
        let b9 = chain.hash_at(9);
        let b12 = chain.hash_at(12);

        store.justify(&authority(), &g, &b3).unwrap();
        assert!(store.is_justified(&b3));
        assert!(!store.is_finalized(&b3));
        assert_eq!(store.drain_events(), vec![StoreEvent::BlockJustified(b3)]);

        store.justify(&authority(), &b3, &b6).unwrap();
        assert!(store.is_finalized(&b3));
        assert_eq!(store.latest_finalized(), &b3);
        assert_eq!(
            store.drain_events(),
            vec![
                StoreEvent::BlockJustified(b6),
                StoreEvent::BlockFinalised(b3)
            ]
        );

        store.justify(&authority(), &b6, &b12).unwrap();
        assert!(!store.is_finalized(&b6));
        assert_eq!(store.head(), &b12);
        assert_eq!(store.latest_finalized(), &b3);

        let err = store.justify(&authority(), &b6, &b9).unwrap_err();
        assert_eq!(
            err,
            StoreError::TargetNotAboveHead {
                target_height: 9,
                head_height: 12
            }
        );
        assert!(err.to_string().contains("target must be higher than head"));
        assert!(!store.is_justified(&b9));
    }

    #[test]
    fn test_justify_records_parent_and_dynasty() {
        let (mut store, chain) = store_with_chain(2, 0, 8);
        let g = chain.hash_at(0);
        let b2 = chain.hash_at(2);
        let b6 = chain.hash_at(6);

        store.justify(&authority(), &g, &b2).unwrap();
        store.justify(&authority(), &b2, &b6).unwrap();

        let checkpoint = store.checkpoint(&b6).unwrap();
        assert_eq!(checkpoint.parent(), &b2);
        assert_eq!(checkpoint.dynasty(), 2);
        assert_eq!(store.dynasty_of(&b2), Some(1));
        assert_eq!(store.current_dynasty(), 2);
        assert_eq!(store.dynasty_of(&chain.hash_at(4)), None);
    }

    #[test]
    fn test_justify_check_order() {
        let (mut store, chain) = store_with_chain(3, 0, 7);
        let g = chain.hash_at(0);
        let b3 = chain.hash_at(3);
        let b4 = chain.hash_at(4);
        let b6 = chain.hash_at(6);
        let unknown = BlockHash::from([0xee; 32]);

        let err = store.justify(&addr(1), &g, &b3).unwrap_err();
        assert_eq!(err, StoreError::Unauthorized(addr(1)));
        assert_eq!(err.kind(), ErrorKind::UnauthorizedCaller);

        assert_eq!(
            store.justify(&authority(), &unknown, &b3).unwrap_err(),
            StoreError::UnknownSource(unknown)
        );

        let err = store.justify(&authority(), &b3, &b6).unwrap_err();
        assert_eq!(err, StoreError::SourceNotJustified(b3));
        assert_eq!(err.kind(), ErrorKind::SequenceViolation);

        assert_eq!(
            store.justify(&authority(), &g, &unknown).unwrap_err(),
            StoreError::UnknownTarget(unknown)
        );

        assert_eq!(
            store.justify(&authority(), &g, &b4).unwrap_err(),
            StoreError::EpochMisaligned {
                height: 4,
                epoch_length: 3
            }
        );

        let err = store.justify(&authority(), &g, &g).unwrap_err();
        assert_eq!(
            err,
            StoreError::TargetNotAboveHead {
                target_height: 0,
                head_height: 0
            }
        );

        assert!(store.drain_events().is_empty());
    }

    #[test]
    fn test_justify_rejects_fork_target() {
        let (mut store, chain) = store_with_chain(3, 0, 6);
        let mut fork = chain.fork_at(1, 9);
        fork.extend_to(6);
        for block in fork.blocks().iter().skip(2) {
            store.report_block(&block.raw).unwrap();
        }

        let b3 = chain.hash_at(3);
        let fork6 = fork.hash_at(6);
        store.justify(&authority(), &chain.hash_at(0), &b3).unwrap();

        let err = store.justify(&authority(), &b3, &fork6).unwrap_err();
        assert_eq!(
            err,
            StoreError::NotADescendant {
                ancestor: b3,
                target: fork6
            }
        );
        assert_eq!(err.kind(), ErrorKind::StructuralViolation);
        assert_eq!(store.head(), &b3);

        assert!(!store.is_vote_link_valid(&b3, &fork6));
        assert!(store.is_vote_link_valid(&chain.hash_at(0), &fork6));
    }

    #[test]
    fn test_state_root_window() {
        let (mut store, chain) = store_with_chain(3, 3, 15);
        let b3 = chain.hash_at(3);
        let b6 = chain.hash_at(6);
        let b12 = chain.hash_at(12);
        let b15 = chain.hash_at(15);

        store.justify(&authority(), &b3, &b6).unwrap();
        store.justify(&authority(), &b6, &b12).unwrap();
        store.justify(&authority(), &b12, &b15).unwrap();
        assert_eq!(store.latest_finalized(), &b12);

        let err = store.state_root(0).unwrap_err();
        assert_eq!(
            err,
            StoreError::BelowStartingHeight {
                height: 0,
                genesis_height: 3
            }
        );
        assert_eq!(err.kind(), ErrorKind::LookupUnavailable);

        assert_eq!(
            store.state_root(15).unwrap_err(),
            StoreError::AboveFinalizedHeight {
                height: 15,
                finalized_height: 12
            }
        );
        assert_eq!(
            store.state_root(9).unwrap_err(),
            StoreError::NotAJustifiedCheckpoint(9)
        );
        assert_eq!(
            store.state_root(7).unwrap_err(),
            StoreError::NotAJustifiedCheckpoint(7)
        );

        assert_eq!(store.state_root(3).unwrap(), chain.block_at(3).unwrap().state_root);
        assert_eq!(store.state_root(6).unwrap(), chain.block_at(6).unwrap().state_root);
        assert_eq!(store.state_root(12).unwrap(), chain.block_at(12).unwrap().state_root);
    }

    #[test]
    fn test_is_vote_valid() {
        let (mut store, chain) = store_with_chain(3, 0, 9);
        let g = chain.hash_at(0);
        let b3 = chain.hash_at(3);
        let b6 = chain.hash_at(6);

        let transition = store.transition_object_at(&g).unwrap();
        assert!(transition.kernel_hash().is_zero());
        assert_eq!(transition.dynasty(), 0);
        assert_eq!(transition.origin_dynasty(), 0);
        assert!(transition.origin_block_hash().is_zero());
        assert_eq!(transition.core_identifier(), &core_id());

        let good = transition.compute_hash();
        assert!(store.is_vote_valid(&good, &g, &b3));
        assert!(store.is_vote_valid(&good, &g, &b6));
        assert!(!store.is_vote_valid(&Buf32::from([7; 32]), &g, &b3));
        assert!(!store.is_vote_valid(&good, &g, &chain.hash_at(4)));
        assert!(!store.is_vote_valid(&good, &b3, &b6));
        assert!(!store.is_vote_valid(&good, &g, &BlockHash::from([5; 32])));

        store.drain_events();
        store.justify(&authority(), &g, &b3).unwrap();
        assert!(!store.is_vote_valid(&good, &g, &b3));

        let from_b3 = store.transition_hash_at(&b3).unwrap();
        assert!(store.is_vote_valid(&from_b3, &b3, &b6));
        assert_eq!(store.transition_object_at(&b3).unwrap().dynasty(), 1);
        assert_eq!(
            store.transition_object_at(&b3).unwrap().accumulated_gas(),
            store.accumulated_gas(&b3).unwrap()
        );
    }

    #[test]
    fn test_origin_snapshot_tracks_head() {
        let (mut store, chain) = store_with_chain(2, 0, 4);
        let b2 = chain.hash_at(2);

        let snapshot = store.origin_snapshot();
        assert_eq!(snapshot.dynasty(), 0);
        assert_eq!(snapshot.block_hash(), &chain.hash_at(0));

        store.justify(&authority(), &chain.hash_at(0), &b2).unwrap();
        let snapshot = store.origin_snapshot();
        assert_eq!(snapshot.dynasty(), 1);
        assert_eq!(snapshot.block_hash(), &b2);
        assert_eq!(snapshot.height(), 2);
    }

    proptest! {
        #[test]
        fn proptest_justify_invariants(
            epoch_length in 1u64..4,
            attempts in prop::collection::vec((any::<u8>(), 0u64..=24), 1..40),
        ) {
            let (mut store, chain) = store_with_chain(epoch_length, 0, 24);
            let mut parents: HashMap<BlockHash, BlockHash> = HashMap::new();
            let mut last_finalized_height = 0u64;

            for (source_pick, target_height) in attempts {
                let justified: Vec<BlockHash> = store.justified_heights.values().copied().collect();
                let source = justified[source_pick as usize % justified.len()];
                let target = chain.hash_at(target_height);

                let _ = store.justify(&authority(), &source, &target);

                for event in store.drain_events() {
                    if let StoreEvent::BlockFinalised(hash) = event {
                        let height = store.reported_block(&hash).unwrap().height();
                        prop_assert!(height > last_finalized_height);
                        prop_assert_eq!(height % epoch_length, 0);
                        last_finalized_height = height;
                    }
                }

                for hash in store.justified_heights.values() {
                    let parent = *store.checkpoint(hash).unwrap().parent();
                    let recorded = *parents.entry(*hash).or_insert(parent);
                    prop_assert_eq!(recorded, parent);
                }
            }

            for hash in store.justified_heights.values() {
                let mut count = 0;
                let mut cursor = *hash;
                while cursor != *store.genesis() {
                    count += 1;
                    cursor = *store.checkpoint(&cursor).unwrap().parent();
                }
                prop_assert_eq!(store.dynasty_of(hash), Some(count));
            }
        }
    }
}
