use std::sync::Arc;

use mosaic_block_store::{AuxiliaryBlockStore, BlockStore, GenesisBlock, StoreParams};
use mosaic_config::{Config, GenesisConfig};
use mosaic_kernel_gateway::{KernelGateway, MerkleProofVerifier};
use mosaic_primitives::{ChainDescriptor, HeaderCodec, OriginSnapshot};
use mosaic_validator_registry::ValidatorRegistry;
use parking_lot::RwLock;
use tracing::info;

use crate::{bridge::Bridge, errors::BridgeError};

/// Builder for assembling a [`Bridge`] from its configuration.
///
/// Both stores decode headers with clones of the same codec.
#[derive(Debug)]
pub struct BridgeBuilder<C, V> {
    config: Option<Config>,
    codec: Option<C>,
    verifier: Option<V>,
}

impl<C, V> BridgeBuilder<C, V> {
    /// Create a new builder instance.
    pub fn new() -> Self {
        Self {
            config: None,
            codec: None,
            verifier: None,
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the header codec both stores decode with.
    pub fn with_codec(mut self, codec: C) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Set the proof verifier the kernel gateway checks kernels with.
    pub fn with_verifier(mut self, verifier: V) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Validates the config and wires every component together.
    pub fn build(self) -> anyhow::Result<Bridge<C, V>>
    where
        C: HeaderCodec + Clone + Send + Sync + 'static,
        V: MerkleProofVerifier,
    {
        let config = self
            .config
            .ok_or(BridgeError::MissingDependency("config"))?;
        let codec = self.codec.ok_or(BridgeError::MissingDependency("codec"))?;
        let verifier = self
            .verifier
            .ok_or(BridgeError::MissingDependency("verifier"))?;

        config.validate()?;

        let descriptor = ChainDescriptor::new(config.bridge.core_identifier);
        let ids = &config.identities;
        let epoch_length = config.bridge.epoch_length;

        let origin = BlockStore::new(
            codec.clone(),
            descriptor,
            ids.vote_coordinator,
            StoreParams {
                epoch_length,
                genesis: genesis_block(&config.origin.genesis, None),
            },
        )?;
        let origin = Arc::new(RwLock::new(origin));

        let (validators, weights) = config.validator_set();
        let registry =
            ValidatorRegistry::new(ids.origin_store, ids.auxiliary_store, &validators, &weights)?;
        let registry = Arc::new(RwLock::new(registry));

        let aux = &config.auxiliary;
        let genesis_origin =
            OriginSnapshot::new(aux.origin_dynasty, aux.origin_block_hash, aux.origin_height);
        let aux_inner = BlockStore::new(
            codec,
            descriptor,
            ids.vote_coordinator,
            StoreParams {
                epoch_length,
                genesis: genesis_block(&aux.genesis, Some(genesis_origin)),
            },
        )?;
        let auxiliary = AuxiliaryBlockStore::new(
            aux_inner,
            ids.auxiliary_store,
            ids.kernel_gateway,
            origin.clone(),
            registry.clone(),
        )?;
        let auxiliary = Arc::new(RwLock::new(auxiliary));

        let gateway = KernelGateway::new(ids.kernel_gateway, ids.kernel_counterpart, verifier)?;

        info!(
            core = %descriptor.core_identifier(),
            epoch_length,
            validators = validators.len(),
            "assembled bridge"
        );
        Ok(Bridge::new(origin, auxiliary, registry, gateway))
    }
}

impl<C, V> Default for BridgeBuilder<C, V> {
    fn default() -> Self {
        Self::new()
    }
}

fn genesis_block(config: &GenesisConfig, origin: Option<OriginSnapshot>) -> GenesisBlock {
    GenesisBlock {
        block_hash: config.block_hash,
        height: config.height,
        state_root: config.state_root,
        accumulated_gas: config.accumulated_gas,
        accumulated_tx_root: config.accumulated_tx_root,
        origin,
    }
}
