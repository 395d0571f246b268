//! Block store of the auxiliary chain.

use std::{fmt, sync::Arc};

use mosaic_primitives::{
    Address, BlockHash, Buf32, ChainDescriptor, HeaderCodec, Kernel, KernelHash, TransitionObject,
};
use mosaic_validator_registry::ValidatorSetSink;
use tracing::{info, warn};

use crate::{
    block::{Checkpoint, ReportedBlock},
    errors::{KernelError, StoreError, StoreResult},
    events::StoreEvent,
    kernel::KernelTracker,
    observer::OriginObserver,
    store::BlockStore,
};

/// Block store of the auxiliary chain.
///
/// On top of what [`BlockStore`] does it snapshots the origin chain for
/// every reported block, tracks kernels and pushes the validators of a kernel
/// into the registry when the kernel activates.
pub struct AuxiliaryBlockStore<C> {
    inner: BlockStore<C>,

    /// Identity this store uses when calling the registry.
    identity: Address,

    /// Identity allowed to report kernels.
    gateway: Address,

    origin: Arc<dyn OriginObserver>,
    registry: Arc<dyn ValidatorSetSink>,
    kernels: KernelTracker,
}

impl<C: fmt::Debug> fmt::Debug for AuxiliaryBlockStore<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuxiliaryBlockStore")
            .field("inner", &self.inner)
            .field("identity", &self.identity)
            .field("gateway", &self.gateway)
            .field("kernels", &self.kernels)
            .finish_non_exhaustive()
    }
}

impl<C: HeaderCodec> AuxiliaryBlockStore<C> {
    pub fn new(
        inner: BlockStore<C>,
        identity: Address,
        gateway: Address,
        origin: Arc<dyn OriginObserver>,
        registry: Arc<dyn ValidatorSetSink>,
    ) -> StoreResult<Self> {
        if identity.is_zero() || gateway.is_zero() {
            return Err(StoreError::ZeroIdentity);
        }

        let kernels = KernelTracker::new(*inner.genesis());
        Ok(Self {
            inner,
            identity,
            gateway,
            origin,
            registry,
            kernels,
        })
    }

    /// Records a raw header along with the current origin snapshot.
    pub fn report_block(&mut self, raw: &[u8]) -> StoreResult<BlockHash> {
        let snapshot = self.origin.snapshot();
        self.inner.report_block_with(raw, Some(snapshot))
    }
}

impl<C> AuxiliaryBlockStore<C> {
    /// Justifies `target` from `source`, activating the open kernel if the
    /// justification finalizes far enough past its activation block.
    ///
    /// The registry is updated before anything is written here, so if it
    /// rejects the update the whole justification fails.
    pub fn justify(
        &mut self,
        caller: &Address,
        source: &BlockHash,
        target: &BlockHash,
    ) -> StoreResult<()> {
        let plan = self.inner.check_justify(caller, source, target)?;

        let activating = if plan.finalizes {
            self.kernels.due_activation(plan.target_dynasty)
        } else {
            None
        };

        if let Some(kernel) = activating {
            let origin_height = self
                .inner
                .reported_block(&plan.target)
                .and_then(ReportedBlock::origin)
                .map(|o| o.height())
                .unwrap_or_default();

            self.registry.update_meta_block(
                &self.identity,
                kernel.validators(),
                kernel.weights(),
                origin_height,
                plan.target_height,
            )?;
            info!(
                kernel = %kernel.hash(),
                origin_height,
                auxiliary_height = plan.target_height,
                "pushed kernel validators to registry"
            );
        }
        let activates = activating.is_some();

        self.inner.apply_justify(&plan);
        self.kernels.on_justified(plan.target, plan.target_dynasty);
        if activates {
            self.kernels.activate(plan.target);
        }

        Ok(())
    }

    /// Stages the next kernel on behalf of the gateway and returns its hash.
    pub fn report_open_kernel(
        &mut self,
        caller: &Address,
        height: u64,
        parent: KernelHash,
        validators: Vec<Address>,
        weights: Vec<u64>,
        activation_block: BlockHash,
    ) -> StoreResult<KernelHash> {
        if *caller != self.gateway {
            warn!(%caller, "rejected kernel from unregistered caller");
            return Err(StoreError::Unauthorized(*caller));
        }

        if validators.len() != weights.len() {
            return Err(KernelError::LengthMismatch {
                validators: validators.len(),
                weights: weights.len(),
            }
            .into());
        }

        let kernel = Kernel::new(height, parent, validators, weights, activation_block);
        self.kernels.check_open(&kernel)?;

        let (activation_height, activation_dynasty) = if activation_block.is_zero() {
            (0, Some(0))
        } else {
            self.check_activation_block(&activation_block)?
        };

        // The registry must accept these validators once the kernel activates.
        self.registry
            .check_entries(kernel.validators(), kernel.weights())?;

        let hash = *kernel.hash();
        self.kernels
            .open(kernel, activation_height, activation_dynasty);
        Ok(hash)
    }

    /// Returns the height and, if already known, the dynasty of a kernel's
    /// activation block.
    ///
    /// The block must be able to become a justified checkpoint, otherwise the
    /// kernel could never activate.
    fn check_activation_block(&self, block: &BlockHash) -> StoreResult<(u64, Option<u64>)> {
        let height = self
            .inner
            .reported_block(block)
            .ok_or(KernelError::UnknownActivationBlock(*block))?
            .height();

        if let Some(dynasty) = self.inner.dynasty_of(block) {
            return Ok((height, Some(dynasty)));
        }

        let epoch_length = self.inner.epoch_length();
        if height % epoch_length != 0 {
            return Err(KernelError::MisalignedActivationBlock {
                height,
                epoch_length,
            }
            .into());
        }

        let head_height = self.inner.head_height();
        if height <= head_height {
            return Err(KernelError::StaleActivationBlock {
                block: *block,
                height,
                head_height,
            }
            .into());
        }

        if !self.inner.is_ancestor(self.inner.head(), block) {
            return Err(KernelError::ActivationBlockOffHead(*block).into());
        }

        Ok((height, None))
    }

    /// Checks a vote for the link `source -> target` against the transition
    /// object of `source` bound to its recorded kernel.
    pub fn is_vote_valid(
        &self,
        transition_hash: &Buf32,
        source: &BlockHash,
        target: &BlockHash,
    ) -> bool {
        self.inner.is_vote_link_valid(source, target)
            && self
                .transition_hash_at(source)
                .is_some_and(|h| h == *transition_hash)
    }

    pub fn transition_object_at(&self, hash: &BlockHash) -> Option<TransitionObject> {
        self.inner
            .transition_object_with(hash, self.kernels.kernel_hash_at(hash))
    }

    pub fn transition_hash_at(&self, hash: &BlockHash) -> Option<Buf32> {
        self.transition_object_at(hash)
            .map(|t| t.compute_hash())
    }

    /// Kernel recorded for a justified checkpoint, zero for other blocks.
    pub fn kernel_hash(&self, block: &BlockHash) -> KernelHash {
        self.kernels.kernel_hash_at(block)
    }

    pub fn open_kernel_hash(&self, activation_height: u64) -> KernelHash {
        self.kernels.open_kernel_hash_at(activation_height)
    }

    pub fn active_kernel_hash(&self) -> &KernelHash {
        self.kernels.active_kernel_hash()
    }

    pub fn next_kernel_hash(&self) -> &KernelHash {
        self.kernels.next_kernel_hash()
    }

    pub fn open_kernel_height(&self) -> Option<u64> {
        self.kernels.open_kernel_height()
    }

    pub fn kernel(&self, hash: &KernelHash) -> Option<&Kernel> {
        self.kernels.kernel(hash)
    }

    pub fn kernels(&self) -> &KernelTracker {
        &self.kernels
    }

    pub fn state_root(&self, height: u64) -> StoreResult<Buf32> {
        self.inner.state_root(height)
    }

    pub fn is_block_reported(&self, hash: &BlockHash) -> bool {
        self.inner.is_block_reported(hash)
    }

    pub fn reported_block(&self, hash: &BlockHash) -> Option<&ReportedBlock> {
        self.inner.reported_block(hash)
    }

    pub fn checkpoint(&self, hash: &BlockHash) -> Option<&Checkpoint> {
        self.inner.checkpoint(hash)
    }

    pub fn dynasty_of(&self, hash: &BlockHash) -> Option<u64> {
        self.inner.dynasty_of(hash)
    }

    pub fn current_dynasty(&self) -> u64 {
        self.inner.current_dynasty()
    }

    pub fn head(&self) -> &BlockHash {
        self.inner.head()
    }

    pub fn latest_finalized(&self) -> &BlockHash {
        self.inner.latest_finalized()
    }

    pub fn is_finalized(&self, hash: &BlockHash) -> bool {
        self.inner.is_finalized(hash)
    }

    pub fn descriptor(&self) -> &ChainDescriptor {
        self.inner.descriptor()
    }

    pub fn identity(&self) -> &Address {
        &self.identity
    }

    pub fn gateway(&self) -> &Address {
        &self.gateway
    }

    /// The underlying checkpoint store, for the queries not mirrored here.
    pub fn store(&self) -> &BlockStore<C> {
        &self.inner
    }

    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        self.inner.drain_events()
    }
}
