use mosaic_primitives::{Address, ErrorKind};
use thiserror::Error;

pub type RegistryResult<T> = Result<T, RegistryError>;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum RegistryError {
    #[error("validator set must not be empty")]
    EmptyValidatorSet,

    #[error("got {validators} validators but {weights} weights")]
    LengthMismatch { validators: usize, weights: usize },

    #[error("validator address must not be zero")]
    ZeroAddress,

    #[error("validator {0} must have a non-zero weight")]
    ZeroWeight(Address),

    #[error("validator {0} is already registered")]
    DuplicateValidator(Address),

    #[error("total validator weight overflows")]
    WeightOverflow,

    #[error("store identity must not be zero")]
    ZeroStoreIdentity,

    #[error("caller {0} is not the registered auxiliary store")]
    Unauthorized(Address),

    #[error("origin height {got} must be higher than the last one ({last})")]
    OriginHeightNotIncreasing { last: u64, got: u64 },

    #[error("auxiliary height {got} must be higher than the last one ({last})")]
    AuxiliaryHeightNotIncreasing { last: u64, got: u64 },
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::EmptyValidatorSet
            | RegistryError::LengthMismatch { .. }
            | RegistryError::ZeroAddress
            | RegistryError::ZeroWeight(_)
            | RegistryError::DuplicateValidator(_)
            | RegistryError::WeightOverflow
            | RegistryError::ZeroStoreIdentity => ErrorKind::Config,
            RegistryError::Unauthorized(_) => ErrorKind::UnauthorizedCaller,
            RegistryError::OriginHeightNotIncreasing { .. }
            | RegistryError::AuxiliaryHeightNotIncreasing { .. } => ErrorKind::SequenceViolation,
        }
    }
}
