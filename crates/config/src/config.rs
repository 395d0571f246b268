use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use mosaic_primitives::{Address, BlockHash, Buf32, CoreIdentifier};
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Default value for `epoch_length` in [`BridgeConfig`].
const DEFAULT_EPOCH_LENGTH: u64 = 100;

fn default_epoch_length() -> u64 {
    DEFAULT_EPOCH_LENGTH
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Core of the auxiliary chain both stores attest for.
    pub core_identifier: CoreIdentifier,

    /// Distance in blocks between two checkpoints, on both chains.
    #[serde(default = "default_epoch_length")]
    pub epoch_length: u64,
}

/// Caller identities registered with each component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentitiesConfig {
    /// Only caller allowed to justify checkpoints.
    pub vote_coordinator: Address,

    /// Only caller allowed to report kernels.
    pub kernel_gateway: Address,

    pub origin_store: Address,

    /// Only caller allowed to update the validator registry.
    pub auxiliary_store: Address,

    /// Core on the origin chain whose storage commits to kernels.
    pub kernel_counterpart: Address,
}

/// Trusted block a store starts from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenesisConfig {
    pub block_hash: BlockHash,
    pub height: u64,
    pub state_root: Buf32,

    #[serde(default)]
    pub accumulated_gas: u64,

    #[serde(default)]
    pub accumulated_tx_root: Buf32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginConfig {
    pub genesis: GenesisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuxiliaryConfig {
    pub genesis: GenesisConfig,

    /// Origin dynasty recorded for the auxiliary genesis.
    #[serde(default)]
    pub origin_dynasty: u64,

    /// Origin head recorded for the auxiliary genesis.
    #[serde(default)]
    pub origin_block_hash: BlockHash,

    #[serde(default)]
    pub origin_height: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorEntry {
    pub address: Address,
    pub weight: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Service label to append to the service name (e.g., "prod", "dev").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_label: Option<String>,

    /// Directory path for file-based logging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// Prefix for log file names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file_prefix: Option<String>,

    /// Use JSON format for logs instead of compact format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_format: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub bridge: BridgeConfig,
    pub identities: IdentitiesConfig,
    pub origin: OriginConfig,
    pub auxiliary: AuxiliaryConfig,

    /// Initial validator set of the registry.
    pub validators: Vec<ValidatorEntry>,

    /// Logging configuration (optional section in TOML).
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Reads, parses and validates a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        raw.parse()
    }

    /// Checks everything the components would reject at construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let epoch_length = self.bridge.epoch_length;
        if epoch_length == 0 {
            return Err(ConfigError::ZeroEpochLength);
        }

        for (chain, genesis) in [
            ("origin", &self.origin.genesis),
            ("auxiliary", &self.auxiliary.genesis),
        ] {
            if genesis.height % epoch_length != 0 {
                return Err(ConfigError::MisalignedGenesis {
                    chain,
                    height: genesis.height,
                    epoch_length,
                });
            }
            if genesis.block_hash.is_zero() {
                return Err(ConfigError::ZeroGenesisHash { chain });
            }
        }

        let ids = &self.identities;
        for (name, id) in [
            ("vote_coordinator", &ids.vote_coordinator),
            ("kernel_gateway", &ids.kernel_gateway),
            ("origin_store", &ids.origin_store),
            ("auxiliary_store", &ids.auxiliary_store),
            ("kernel_counterpart", &ids.kernel_counterpart),
        ] {
            if id.is_zero() {
                return Err(ConfigError::ZeroIdentity(name));
            }
        }

        self.validate_validators()
    }

    fn validate_validators(&self) -> Result<(), ConfigError> {
        if self.validators.is_empty() {
            return Err(ConfigError::NoValidators);
        }

        let mut seen = HashSet::new();
        let mut total: u64 = 0;
        for entry in &self.validators {
            if entry.address.is_zero() {
                return Err(ConfigError::ZeroValidatorAddress);
            }
            if entry.weight == 0 {
                return Err(ConfigError::ZeroValidatorWeight(entry.address));
            }
            if !seen.insert(entry.address) {
                return Err(ConfigError::DuplicateValidator(entry.address));
            }
            total = total
                .checked_add(entry.weight)
                .ok_or(ConfigError::WeightOverflow)?;
        }
        Ok(())
    }

    /// Addresses and weights of the initial validator set, in config order.
    pub fn validator_set(&self) -> (Vec<Address>, Vec<u64>) {
        self.validators
            .iter()
            .map(|v| (v.address, v.weight))
            .unzip()
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    /// Parses and validates a TOML config.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
