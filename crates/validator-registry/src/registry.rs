//! The weighted validator set, partitioned into meta-blocks.

use std::collections::{BTreeMap, HashSet};

use mosaic_primitives::Address;
use tracing::{debug, info, warn};

use crate::{
    errors::{RegistryError, RegistryResult},
    validator::{MetaBlock, Validator},
};

/// Tracks which validators take part in which meta-block and with what
/// weight.
///
/// The registry only changes through [`Self::update_meta_block`], which the
/// auxiliary store calls when a kernel activates.  Every call opens a new
/// meta-block in which the newly added validators take part.
#[derive(Clone, Debug)]
pub struct ValidatorRegistry {
    /// Identity of the origin store this registry serves.
    origin_store: Address,

    /// Identity of the auxiliary store, the only caller allowed to mutate.
    auxiliary_store: Address,

    validators: BTreeMap<Address, Validator>,

    /// Indexed by meta-block height.
    meta_blocks: Vec<MetaBlock>,
}

impl ValidatorRegistry {
    /// Creates the registry with the initial validator set as meta-block 0.
    pub fn new(
        origin_store: Address,
        auxiliary_store: Address,
        validators: &[Address],
        weights: &[u64],
    ) -> RegistryResult<Self> {
        if origin_store.is_zero() || auxiliary_store.is_zero() {
            return Err(RegistryError::ZeroStoreIdentity);
        }
        if validators.is_empty() {
            return Err(RegistryError::EmptyValidatorSet);
        }

        let initial = BTreeMap::new();
        let total_weight = validate_entries(&initial, validators, weights)?;

        let mut registry = Self {
            origin_store,
            auxiliary_store,
            validators: initial,
            meta_blocks: vec![MetaBlock::genesis(total_weight)],
        };
        registry.insert_validators(validators, weights, 0);

        info!(
            count = validators.len(),
            total_weight, "initialized validator registry"
        );
        Ok(registry)
    }

    pub fn origin_store(&self) -> &Address {
        &self.origin_store
    }

    pub fn auxiliary_store(&self) -> &Address {
        &self.auxiliary_store
    }

    /// Height of the current meta-block.
    pub fn current_meta_block_height(&self) -> u64 {
        (self.meta_blocks.len() - 1) as u64
    }

    pub fn meta_block(&self, height: u64) -> Option<&MetaBlock> {
        self.meta_blocks.get(usize::try_from(height).ok()?)
    }

    /// Total weight of the validators active in the given meta-block.
    pub fn total_weight_at(&self, height: u64) -> Option<u64> {
        self.meta_block(height).map(MetaBlock::total_weight)
    }

    pub fn validator(&self, address: &Address) -> Option<&Validator> {
        self.validators.get(address)
    }

    /// Iterates over every validator ever registered, ordered by address.
    pub fn validators(&self) -> impl Iterator<Item = &Validator> + '_ {
        self.validators.values()
    }

    pub fn is_active_at(&self, address: &Address, height: u64) -> bool {
        self.validators
            .get(address)
            .is_some_and(|v| v.is_active_at(height))
    }

    /// Weight a validator holds in the given meta-block, zero if it does not
    /// take part.
    pub fn weight_at(&self, address: &Address, height: u64) -> u64 {
        match self.validators.get(address) {
            Some(v) if v.is_active_at(height) => v.weight(),
            _ => 0,
        }
    }

    /// Opens the next meta-block, adding the given validators to it.
    ///
    /// Both heights must be strictly higher than the ones passed on the
    /// previous call.  Nothing changes unless every check passes.
    pub fn update_meta_block(
        &mut self,
        caller: &Address,
        validators: &[Address],
        weights: &[u64],
        origin_height: u64,
        auxiliary_height: u64,
    ) -> RegistryResult<bool> {
        if *caller != self.auxiliary_store {
            warn!(%caller, "rejected meta-block update from unregistered caller");
            return Err(RegistryError::Unauthorized(*caller));
        }

        let total_weight = self.check_entries(validators, weights)?;

        let last = self.last_meta_block();
        if let Some(last_origin) = last.origin_height() {
            if origin_height <= last_origin {
                return Err(RegistryError::OriginHeightNotIncreasing {
                    last: last_origin,
                    got: origin_height,
                });
            }
        }
        if let Some(last_auxiliary) = last.auxiliary_height() {
            if auxiliary_height <= last_auxiliary {
                return Err(RegistryError::AuxiliaryHeightNotIncreasing {
                    last: last_auxiliary,
                    got: auxiliary_height,
                });
            }
        }

        let height = self.current_meta_block_height() + 1;
        self.insert_validators(validators, weights, height);
        self.meta_blocks
            .push(MetaBlock::new(origin_height, auxiliary_height, total_weight));

        info!(
            meta_block = height,
            origin_height,
            auxiliary_height,
            added = validators.len(),
            total_weight,
            "opened new meta-block"
        );
        Ok(true)
    }

    /// Checks that the given validators could join the set and returns the
    /// total weight the next meta-block would have. Changes nothing.
    pub fn check_entries(&self, validators: &[Address], weights: &[u64]) -> RegistryResult<u64> {
        let added_weight = validate_entries(&self.validators, validators, weights)?;
        self.last_meta_block()
            .total_weight()
            .checked_add(added_weight)
            .ok_or(RegistryError::WeightOverflow)
    }

    fn last_meta_block(&self) -> MetaBlock {
        // There is always the initial meta-block.
        self.meta_blocks[self.meta_blocks.len() - 1]
    }

    fn insert_validators(&mut self, validators: &[Address], weights: &[u64], start_height: u64) {
        for (address, weight) in validators.iter().zip(weights) {
            debug!(%address, weight, start_height, "registered validator");
            self.validators
                .insert(*address, Validator::new(*address, *weight, start_height));
        }
    }
}

/// Checks a batch of new validator entries and returns their summed weight.
fn validate_entries(
    existing: &BTreeMap<Address, Validator>,
    validators: &[Address],
    weights: &[u64],
) -> RegistryResult<u64> {
    if validators.len() != weights.len() {
        return Err(RegistryError::LengthMismatch {
            validators: validators.len(),
            weights: weights.len(),
        });
    }

    let mut seen = HashSet::with_capacity(validators.len());
    let mut sum: u64 = 0;
    for (address, weight) in validators.iter().zip(weights) {
        if address.is_zero() {
            return Err(RegistryError::ZeroAddress);
        }
        if *weight == 0 {
            return Err(RegistryError::ZeroWeight(*address));
        }
        if existing.contains_key(address) || !seen.insert(*address) {
            return Err(RegistryError::DuplicateValidator(*address));
        }
        sum = sum
            .checked_add(*weight)
            .ok_or(RegistryError::WeightOverflow)?;
    }

    Ok(sum)
}
