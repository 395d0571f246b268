use mosaic_block_store::{AuxiliaryBlockStore, BlockStore, KernelError, StoreError};
use mosaic_primitives::{
    hash::{compute_kernel_hash, keccak},
    Address, BlockHash, KernelHash,
};
use tracing::{info, warn};

use crate::{
    errors::{GatewayError, GatewayResult},
    verifier::MerkleProofVerifier,
};

/// A kernel as committed on the origin chain, with the inclusion proof of
/// its hash.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KernelProof {
    pub height: u64,
    pub parent: KernelHash,
    pub validators: Vec<Address>,
    pub weights: Vec<u64>,
    pub activation_block: BlockHash,

    /// RLP-encoded trie nodes from the state root down to the kernel slot.
    pub proof_nodes: Vec<u8>,
}

/// Storage path under which `counterpart` commits to the kernel at `height`.
pub fn kernel_storage_path(counterpart: &Address, height: u64) -> Vec<u8> {
    let mut preimage = Vec::with_capacity(20 + 32);
    preimage.extend_from_slice(counterpart.inner().as_bytes());
    preimage.extend_from_slice(&[0u8; 24]);
    preimage.extend_from_slice(&height.to_be_bytes());
    keccak(&preimage).as_bytes().to_vec()
}

/// Proves kernels against finalized origin state and reports them to the
/// auxiliary store.
#[derive(Debug)]
pub struct KernelGateway<V> {
    /// Identity registered with the auxiliary store as kernel reporter.
    identity: Address,

    /// Core on the origin chain whose storage holds the kernel hashes.
    counterpart: Address,

    verifier: V,
}

impl<V: MerkleProofVerifier> KernelGateway<V> {
    pub fn new(identity: Address, counterpart: Address, verifier: V) -> GatewayResult<Self> {
        if identity.is_zero() || counterpart.is_zero() {
            return Err(GatewayError::ZeroIdentity);
        }
        Ok(Self {
            identity,
            counterpart,
            verifier,
        })
    }

    pub fn identity(&self) -> &Address {
        &self.identity
    }

    pub fn counterpart(&self) -> &Address {
        &self.counterpart
    }

    /// Verifies that the origin chain committed to the kernel at a finalized
    /// height and opens it on the auxiliary store.
    pub fn prove_kernel<O, A>(
        &self,
        proof: &KernelProof,
        origin_height: u64,
        origin: &BlockStore<O>,
        auxiliary: &mut AuxiliaryBlockStore<A>,
    ) -> GatewayResult<KernelHash> {
        if proof.validators.len() != proof.weights.len() {
            return Err(StoreError::from(KernelError::LengthMismatch {
                validators: proof.validators.len(),
                weights: proof.weights.len(),
            })
            .into());
        }

        let root = origin.state_root(origin_height)?;
        let hash = compute_kernel_hash(
            proof.height,
            &proof.parent,
            &proof.validators,
            &proof.weights,
            &proof.activation_block,
        );

        let path = kernel_storage_path(&self.counterpart, proof.height);
        if !self
            .verifier
            .verify(hash.inner().as_bytes(), &path, &proof.proof_nodes, &root)
        {
            warn!(kernel = %hash, origin_height, "kernel proof rejected");
            return Err(GatewayError::InvalidProof(hash));
        }

        let reported = auxiliary.report_open_kernel(
            &self.identity,
            proof.height,
            proof.parent,
            proof.validators.clone(),
            proof.weights.clone(),
            proof.activation_block,
        )?;

        info!(kernel = %reported, height = proof.height, origin_height, "proved kernel");
        Ok(reported)
    }

    /// Hash of the kernel waiting to activate at `activation_height`, zero
    /// if there is none.
    pub fn open_kernel_hash<A>(
        &self,
        auxiliary: &AuxiliaryBlockStore<A>,
        activation_height: u64,
    ) -> KernelHash {
        auxiliary.open_kernel_hash(activation_height)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mosaic_block_store::{GenesisBlock, StoreParams};
    use mosaic_primitives::{Buf32, ChainDescriptor, ErrorKind, EthHeaderCodec};
    use mosaic_test_utils::{addr, core_id, validator_set, ChainBuilder, TestBlock};
    use mosaic_validator_registry::ValidatorRegistry;
    use parking_lot::RwLock;

    use super::*;
    use crate::verifier::MockMerkleProofVerifier;

    type Origin = Arc<RwLock<BlockStore<EthHeaderCodec>>>;

    fn coordinator() -> Address {
        addr(0xf0)
    }

    fn gateway_id() -> Address {
        addr(0xf1)
    }

    fn counterpart() -> Address {
        addr(0xf4)
    }

    fn genesis_of(block: &TestBlock) -> GenesisBlock {
        GenesisBlock {
            block_hash: block.hash,
            height: block.height,
            state_root: block.state_root,
            accumulated_gas: 0,
            accumulated_tx_root: Buf32::zero(),
            origin: None,
        }
    }

    /// Origin store with height 2 finalized, and an empty auxiliary store.
    fn setup() -> (Origin, AuxiliaryBlockStore<EthHeaderCodec>, ChainBuilder) {
        let descriptor = ChainDescriptor::new(core_id());
        let mut chain = ChainBuilder::new(0);
        chain.extend_to(4);

        let mut origin = BlockStore::new(
            EthHeaderCodec,
            descriptor,
            coordinator(),
            StoreParams {
                epoch_length: 2,
                genesis: genesis_of(chain.genesis()),
            },
        )
        .unwrap();
        for block in chain.descendants() {
            origin.report_block(&block.raw).unwrap();
        }
        origin
            .justify(&coordinator(), &chain.hash_at(0), &chain.hash_at(2))
            .unwrap();
        origin
            .justify(&coordinator(), &chain.hash_at(2), &chain.hash_at(4))
            .unwrap();
        let origin = Arc::new(RwLock::new(origin));

        let (validators, weights) = validator_set(1, 2);
        let registry =
            ValidatorRegistry::new(addr(0xf2), addr(0xf3), &validators, &weights).unwrap();

        let aux_chain = ChainBuilder::new(0).fork_at(0, 1);
        let aux_inner = BlockStore::new(
            EthHeaderCodec,
            descriptor,
            coordinator(),
            StoreParams {
                epoch_length: 2,
                genesis: genesis_of(aux_chain.genesis()),
            },
        )
        .unwrap();
        let auxiliary = AuxiliaryBlockStore::new(
            aux_inner,
            addr(0xf3),
            gateway_id(),
            origin.clone(),
            Arc::new(RwLock::new(registry)),
        )
        .unwrap();

        (origin, auxiliary, chain)
    }

    fn genesis_proof() -> KernelProof {
        let (validators, weights) = validator_set(0x20, 2);
        KernelProof {
            height: 0,
            parent: KernelHash::zero(),
            validators,
            weights,
            activation_block: BlockHash::zero(),
            proof_nodes: vec![0xf8, 0x01],
        }
    }

    #[test]
    fn test_prove_kernel_opens_kernel() {
        let (origin, mut auxiliary, chain) = setup();
        let proof = genesis_proof();
        let expected = compute_kernel_hash(
            proof.height,
            &proof.parent,
            &proof.validators,
            &proof.weights,
            &proof.activation_block,
        );
        let root = chain.block_at(2).unwrap().state_root;
        let path = kernel_storage_path(&counterpart(), 0);

        let mut verifier = MockMerkleProofVerifier::new();
        verifier
            .expect_verify()
            .times(1)
            .withf(move |value, p, nodes, r| {
                value == expected.inner().as_bytes()
                    && p == path.as_slice()
                    && nodes == [0xf8, 0x01]
                    && *r == root
            })
            .returning(|_, _, _, _| true);

        let gateway = KernelGateway::new(gateway_id(), counterpart(), verifier).unwrap();
        let hash = gateway
            .prove_kernel(&proof, 2, &*origin.read(), &mut auxiliary)
            .unwrap();

        assert_eq!(hash, expected);
        assert_eq!(auxiliary.next_kernel_hash(), &expected);
        assert_eq!(gateway.open_kernel_hash(&auxiliary, 0), expected);
        assert!(gateway.open_kernel_hash(&auxiliary, 1).is_zero());
    }

    #[test]
    fn test_prove_kernel_rejects_bad_proof() {
        let (origin, mut auxiliary, _) = setup();
        let mut verifier = MockMerkleProofVerifier::new();
        verifier.expect_verify().returning(|_, _, _, _| false);

        let gateway = KernelGateway::new(gateway_id(), counterpart(), verifier).unwrap();
        let err = gateway
            .prove_kernel(&genesis_proof(), 2, &*origin.read(), &mut auxiliary)
            .unwrap_err();

        assert!(matches!(err, GatewayError::InvalidProof(_)));
        assert_eq!(err.kind(), ErrorKind::StructuralViolation);
        assert!(auxiliary.next_kernel_hash().is_zero());
    }

    #[test]
    fn test_prove_kernel_needs_finalized_root() {
        let (origin, mut auxiliary, _) = setup();
        let mut verifier = MockMerkleProofVerifier::new();
        verifier.expect_verify().times(0);

        let gateway = KernelGateway::new(gateway_id(), counterpart(), verifier).unwrap();
        let err = gateway
            .prove_kernel(&genesis_proof(), 4, &*origin.read(), &mut auxiliary)
            .unwrap_err();

        assert_eq!(
            err,
            GatewayError::Store(StoreError::AboveFinalizedHeight {
                height: 4,
                finalized_height: 2
            })
        );
        assert_eq!(err.kind(), ErrorKind::LookupUnavailable);
    }

    #[test]
    fn test_prove_kernel_from_unregistered_gateway() {
        let (origin, mut auxiliary, _) = setup();
        let mut verifier = MockMerkleProofVerifier::new();
        verifier.expect_verify().returning(|_, _, _, _| true);

        let gateway = KernelGateway::new(addr(0x99), counterpart(), verifier).unwrap();
        let err = gateway
            .prove_kernel(&genesis_proof(), 2, &*origin.read(), &mut auxiliary)
            .unwrap_err();

        assert_eq!(err, GatewayError::Store(StoreError::Unauthorized(addr(0x99))));
        assert_eq!(err.kind(), ErrorKind::UnauthorizedCaller);
    }

    #[test]
    fn test_prove_kernel_rejects_mismatched_lengths() {
        let (origin, mut auxiliary, _) = setup();
        let gateway =
            KernelGateway::new(gateway_id(), counterpart(), MockMerkleProofVerifier::new())
                .unwrap();

        let mut proof = genesis_proof();
        proof.weights.pop();
        let err = gateway
            .prove_kernel(&proof, 2, &*origin.read(), &mut auxiliary)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_new_rejects_zero_identity() {
        let err = KernelGateway::new(Address::zero(), counterpart(), MockMerkleProofVerifier::new())
            .unwrap_err();
        assert_eq!(err, GatewayError::ZeroIdentity);
    }

    #[test]
    fn test_storage_path_depends_on_height() {
        assert_ne!(
            kernel_storage_path(&counterpart(), 0),
            kernel_storage_path(&counterpart(), 1)
        );
        assert_eq!(kernel_storage_path(&counterpart(), 3).len(), 32);
    }
}
