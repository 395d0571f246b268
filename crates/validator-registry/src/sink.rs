use mosaic_primitives::Address;
use parking_lot::RwLock;

use crate::{errors::RegistryResult, registry::ValidatorRegistry};

/// Receiver of validator-set updates pushed by the auxiliary store when a
/// kernel activates.
pub trait ValidatorSetSink: Send + Sync {
    /// Checks that the given validators could be added, without adding them.
    fn check_entries(&self, validators: &[Address], weights: &[u64]) -> RegistryResult<()>;

    /// Opens a new meta-block with the given validators added.
    fn update_meta_block(
        &self,
        caller: &Address,
        validators: &[Address],
        weights: &[u64],
        origin_height: u64,
        auxiliary_height: u64,
    ) -> RegistryResult<bool>;
}

impl ValidatorSetSink for RwLock<ValidatorRegistry> {
    fn check_entries(&self, validators: &[Address], weights: &[u64]) -> RegistryResult<()> {
        self.read().check_entries(validators, weights).map(|_| ())
    }

    fn update_meta_block(
        &self,
        caller: &Address,
        validators: &[Address],
        weights: &[u64],
        origin_height: u64,
        auxiliary_height: u64,
    ) -> RegistryResult<bool> {
        self.write().update_meta_block(
            caller,
            validators,
            weights,
            origin_height,
            auxiliary_height,
        )
    }
}
