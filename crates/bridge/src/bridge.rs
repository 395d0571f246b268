use std::sync::Arc;

use mosaic_block_store::{AuxiliaryBlockStore, BlockStore};
use mosaic_kernel_gateway::{GatewayResult, KernelGateway, KernelProof, MerkleProofVerifier};
use mosaic_primitives::KernelHash;
use mosaic_validator_registry::ValidatorRegistry;
use parking_lot::RwLock;

/// Shared handles to every component of a running bridge.
///
/// Callers holding both store locks must take the auxiliary one first: the
/// auxiliary store reads the origin store while it is locked for writing.
#[derive(Debug)]
pub struct Bridge<C, V> {
    origin: Arc<RwLock<BlockStore<C>>>,
    auxiliary: Arc<RwLock<AuxiliaryBlockStore<C>>>,
    registry: Arc<RwLock<ValidatorRegistry>>,
    gateway: KernelGateway<V>,
}

impl<C, V> Bridge<C, V> {
    pub(crate) fn new(
        origin: Arc<RwLock<BlockStore<C>>>,
        auxiliary: Arc<RwLock<AuxiliaryBlockStore<C>>>,
        registry: Arc<RwLock<ValidatorRegistry>>,
        gateway: KernelGateway<V>,
    ) -> Self {
        Self {
            origin,
            auxiliary,
            registry,
            gateway,
        }
    }

    pub fn origin(&self) -> &Arc<RwLock<BlockStore<C>>> {
        &self.origin
    }

    pub fn auxiliary(&self) -> &Arc<RwLock<AuxiliaryBlockStore<C>>> {
        &self.auxiliary
    }

    pub fn registry(&self) -> &Arc<RwLock<ValidatorRegistry>> {
        &self.registry
    }

    pub fn gateway(&self) -> &KernelGateway<V> {
        &self.gateway
    }
}

impl<C, V: MerkleProofVerifier> Bridge<C, V> {
    /// Proves a kernel against the finalized origin state at
    /// `origin_height` and stages it on the auxiliary store.
    pub fn prove_kernel(&self, proof: &KernelProof, origin_height: u64) -> GatewayResult<KernelHash> {
        let mut auxiliary = self.auxiliary.write();
        let origin = self.origin.read();
        self.gateway
            .prove_kernel(proof, origin_height, &*origin, &mut *auxiliary)
    }

    /// Open kernel staged for `activation_height`, zero if none.
    pub fn open_kernel_hash(&self, activation_height: u64) -> KernelHash {
        self.gateway
            .open_kernel_hash(&*self.auxiliary.read(), activation_height)
    }
}
