use std::{io, path::PathBuf};

use mosaic_primitives::{Address, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("epoch length must be positive")]
    ZeroEpochLength,

    #[error("{chain} genesis height {height} is not a multiple of the epoch length {epoch_length}")]
    MisalignedGenesis {
        chain: &'static str,
        height: u64,
        epoch_length: u64,
    },

    #[error("{chain} genesis block hash must not be zero")]
    ZeroGenesisHash { chain: &'static str },

    #[error("identity {0} must not be zero")]
    ZeroIdentity(&'static str),

    #[error("validator set must not be empty")]
    NoValidators,

    #[error("validator address must not be zero")]
    ZeroValidatorAddress,

    #[error("validator {0} must have a non-zero weight")]
    ZeroValidatorWeight(Address),

    #[error("validator {0} is listed twice")]
    DuplicateValidator(Address),

    #[error("total validator weight overflows")]
    WeightOverflow,
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Config
    }
}
