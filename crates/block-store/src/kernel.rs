//! Bookkeeping of kernels on the auxiliary chain.

use std::{collections::HashMap, mem};

use mosaic_primitives::{BlockHash, Kernel, KernelHash};
use tracing::info;

use crate::errors::KernelError;

/// Where the open kernel activates.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct PendingActivation {
    block: BlockHash,

    /// Height of the activation block, 0 for the genesis kernel.
    height: u64,

    /// Dynasty of the activation block, known once it is justified.
    dynasty: Option<u64>,
}

/// Tracks reported kernels, the one waiting for activation and the one
/// currently active.
///
/// At most one kernel is open at a time.  It becomes active once a
/// finalizing justification reaches a dynasty two above the dynasty of its
/// activation block.
#[derive(Clone, Debug, Default)]
pub struct KernelTracker {
    kernels: HashMap<KernelHash, Kernel>,

    /// Hash of the last reported kernel, the parent of the next one.
    open_kernel_hash: KernelHash,

    /// Height of the last reported kernel, `None` before genesis.
    open_kernel_height: Option<u64>,

    /// Kernel waiting for activation, zero if none.
    next_kernel_hash: KernelHash,
    pending: Option<PendingActivation>,

    active_kernel_hash: KernelHash,

    /// Kernel active after each justified checkpoint.
    block_kernels: HashMap<BlockHash, KernelHash>,
}

impl KernelTracker {
    pub(crate) fn new(genesis: BlockHash) -> Self {
        Self {
            block_kernels: HashMap::from([(genesis, KernelHash::zero())]),
            ..Default::default()
        }
    }

    /// Checks that `kernel` may be opened next.
    pub(crate) fn check_open(&self, kernel: &Kernel) -> Result<(), KernelError> {
        if !self.next_kernel_hash.is_zero() {
            return Err(KernelError::KernelAlreadyOpen(self.next_kernel_hash));
        }

        match self.open_kernel_height {
            None => {
                if kernel.height() != 0 {
                    return Err(KernelError::GenesisHeight(kernel.height()));
                }
                if !kernel.activation_block().is_zero() {
                    return Err(KernelError::GenesisActivationBlock);
                }
            }
            Some(h) => {
                let expected = h + 1;
                if kernel.height() != expected {
                    return Err(KernelError::HeightMismatch {
                        expected,
                        got: kernel.height(),
                    });
                }
                if kernel.activation_block().is_zero() {
                    return Err(KernelError::ZeroActivationBlock);
                }
            }
        }

        if *kernel.parent() != self.open_kernel_hash {
            return Err(KernelError::ParentKernelMismatch {
                expected: self.open_kernel_hash,
                got: *kernel.parent(),
            });
        }

        if self.kernels.contains_key(kernel.hash()) {
            return Err(KernelError::DuplicateKernel(*kernel.hash()));
        }

        Ok(())
    }

    /// Stores a kernel checked by [`Self::check_open`] as the next one.
    pub(crate) fn open(
        &mut self,
        kernel: Kernel,
        activation_height: u64,
        activation_dynasty: Option<u64>,
    ) {
        let hash = *kernel.hash();
        self.pending = Some(PendingActivation {
            block: *kernel.activation_block(),
            height: activation_height,
            dynasty: activation_dynasty,
        });
        self.open_kernel_hash = hash;
        self.open_kernel_height = Some(kernel.height());
        self.next_kernel_hash = hash;

        info!(kernel = %hash, height = kernel.height(), activation_height, "opened kernel");
        self.kernels.insert(hash, kernel);
    }

    /// Returns the kernel that activates if a justification finalizing a
    /// checkpoint reaches `dynasty`.
    pub(crate) fn due_activation(&self, dynasty: u64) -> Option<&Kernel> {
        let activation_dynasty = self.pending?.dynasty?;
        if dynasty < activation_dynasty.saturating_add(2) {
            return None;
        }
        self.kernels.get(&self.next_kernel_hash)
    }

    /// Records a new justified checkpoint and resolves the activation
    /// dynasty if it is the open kernel's activation block.
    pub(crate) fn on_justified(&mut self, block: BlockHash, dynasty: u64) {
        if let Some(pending) = self.pending.as_mut() {
            if pending.block == block && pending.dynasty.is_none() {
                pending.dynasty = Some(dynasty);
            }
        }
        self.block_kernels.insert(block, self.active_kernel_hash);
    }

    /// Makes the open kernel the active one.
    pub(crate) fn activate(&mut self, at_block: BlockHash) {
        let hash = mem::take(&mut self.next_kernel_hash);
        self.pending = None;
        self.active_kernel_hash = hash;
        self.block_kernels.insert(at_block, hash);
        info!(kernel = %hash, block = %at_block, "activated kernel");
    }

    pub fn kernel(&self, hash: &KernelHash) -> Option<&Kernel> {
        self.kernels.get(hash)
    }

    pub fn active_kernel_hash(&self) -> &KernelHash {
        &self.active_kernel_hash
    }

    pub fn next_kernel_hash(&self) -> &KernelHash {
        &self.next_kernel_hash
    }

    pub fn open_kernel_hash(&self) -> &KernelHash {
        &self.open_kernel_hash
    }

    pub fn open_kernel_height(&self) -> Option<u64> {
        self.open_kernel_height
    }

    /// Kernel recorded for a justified checkpoint, zero for other blocks.
    pub fn kernel_hash_at(&self, block: &BlockHash) -> KernelHash {
        self.block_kernels
            .get(block)
            .copied()
            .unwrap_or_else(KernelHash::zero)
    }

    /// Hash of the kernel waiting to activate at `activation_height`, zero
    /// if there is none.
    pub fn open_kernel_hash_at(&self, activation_height: u64) -> KernelHash {
        match self.pending {
            Some(p) if p.height == activation_height => self.next_kernel_hash,
            _ => KernelHash::zero(),
        }
    }
}
