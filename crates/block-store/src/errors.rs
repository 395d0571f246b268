use mosaic_primitives::{Address, BlockHash, ErrorKind, HeaderDecodeError, KernelHash};
use mosaic_validator_registry::RegistryError;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the block stores.
///
/// Every failing call leaves the store exactly as it was.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum StoreError {
    #[error("epoch length must be positive")]
    ZeroEpochLength,

    #[error("genesis height {height} is not a multiple of the epoch length {epoch_length}")]
    MisalignedGenesis { height: u64, epoch_length: u64 },

    #[error("genesis block hash must not be zero")]
    ZeroGenesisHash,

    #[error("caller identity must not be zero")]
    ZeroIdentity,

    #[error("caller {0} is not authorized")]
    Unauthorized(Address),

    #[error("{0}")]
    MalformedHeader(#[from] HeaderDecodeError),

    #[error("parent {0} of the reported block is unknown")]
    UnknownParent(BlockHash),

    #[error("block at height {height} cannot follow its parent at height {parent_height}")]
    HeightNotParentSuccessor { parent_height: u64, height: u64 },

    #[error("accumulated gas overflows at block {0}")]
    GasOverflow(BlockHash),

    #[error("source {0} is not reported")]
    UnknownSource(BlockHash),

    #[error("source {0} is not justified")]
    SourceNotJustified(BlockHash),

    #[error("target {0} is not reported")]
    UnknownTarget(BlockHash),

    #[error("target height {height} is not a multiple of the epoch length {epoch_length}")]
    EpochMisaligned { height: u64, epoch_length: u64 },

    #[error("target must be higher than head (target {target_height}, head {head_height})")]
    TargetNotAboveHead { target_height: u64, head_height: u64 },

    #[error("target {0} is already justified")]
    TargetAlreadyJustified(BlockHash),

    #[error("target must be higher than source (target {target_height}, source {source_height})")]
    TargetNotAboveSource {
        source_height: u64,
        target_height: u64,
    },

    #[error("target {target} does not descend from source {ancestor}")]
    NotADescendant { ancestor: BlockHash, target: BlockHash },

    #[error("height {height} is below the starting height {genesis_height}")]
    BelowStartingHeight { height: u64, genesis_height: u64 },

    #[error("height {height} is above the latest finalized height {finalized_height}")]
    AboveFinalizedHeight { height: u64, finalized_height: u64 },

    #[error("no justified checkpoint at height {0}")]
    NotAJustifiedCheckpoint(u64),

    #[error("kernel: {0}")]
    Kernel(#[from] KernelError),

    #[error("validator registry: {0}")]
    Registry(#[from] RegistryError),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::ZeroEpochLength
            | StoreError::MisalignedGenesis { .. }
            | StoreError::ZeroGenesisHash
            | StoreError::ZeroIdentity => ErrorKind::Config,
            StoreError::Unauthorized(_) => ErrorKind::UnauthorizedCaller,
            StoreError::MalformedHeader(e) => e.kind(),
            StoreError::UnknownParent(_)
            | StoreError::UnknownSource(_)
            | StoreError::UnknownTarget(_) => ErrorKind::UnknownReference,
            StoreError::SourceNotJustified(_) | StoreError::TargetAlreadyJustified(_) => {
                ErrorKind::SequenceViolation
            }
            StoreError::HeightNotParentSuccessor { .. }
            | StoreError::GasOverflow(_)
            | StoreError::EpochMisaligned { .. }
            | StoreError::TargetNotAboveHead { .. }
            | StoreError::TargetNotAboveSource { .. }
            | StoreError::NotADescendant { .. } => ErrorKind::StructuralViolation,
            StoreError::BelowStartingHeight { .. }
            | StoreError::AboveFinalizedHeight { .. }
            | StoreError::NotAJustifiedCheckpoint(_) => ErrorKind::LookupUnavailable,
            StoreError::Kernel(e) => e.kind(),
            StoreError::Registry(e) => e.kind(),
        }
    }
}

/// Errors raised when reporting an open kernel.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum KernelError {
    #[error("got {validators} validators but {weights} weights")]
    LengthMismatch { validators: usize, weights: usize },

    #[error("genesis kernel must have height 0, got {0}")]
    GenesisHeight(u64),

    #[error("genesis kernel must have a zero activation block")]
    GenesisActivationBlock,

    #[error("expected kernel height {expected}, got {got}")]
    HeightMismatch { expected: u64, got: u64 },

    #[error("kernel activation block must not be zero")]
    ZeroActivationBlock,

    #[error("activation block {0} is not reported")]
    UnknownActivationBlock(BlockHash),

    #[error("activation block height {height} is not a multiple of the epoch length {epoch_length}")]
    MisalignedActivationBlock { height: u64, epoch_length: u64 },

    #[error("activation block {block} is not justified and not above head (height {height}, head {head_height})")]
    StaleActivationBlock {
        block: BlockHash,
        height: u64,
        head_height: u64,
    },

    #[error("activation block {0} does not descend from the head")]
    ActivationBlockOffHead(BlockHash),

    #[error("kernel {0} is still waiting for activation")]
    KernelAlreadyOpen(KernelHash),

    #[error("parent kernel {got} does not match the open kernel {expected}")]
    ParentKernelMismatch { expected: KernelHash, got: KernelHash },

    #[error("kernel {0} was already reported")]
    DuplicateKernel(KernelHash),
}

impl KernelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            KernelError::LengthMismatch { .. }
            | KernelError::GenesisActivationBlock
            | KernelError::ZeroActivationBlock => ErrorKind::Config,
            KernelError::UnknownActivationBlock(_) => ErrorKind::UnknownReference,
            KernelError::MisalignedActivationBlock { .. }
            | KernelError::StaleActivationBlock { .. }
            | KernelError::ActivationBlockOffHead(_) => ErrorKind::StructuralViolation,
            KernelError::GenesisHeight(_)
            | KernelError::HeightMismatch { .. }
            | KernelError::KernelAlreadyOpen(_)
            | KernelError::ParentKernelMismatch { .. }
            | KernelError::DuplicateKernel(_) => ErrorKind::SequenceViolation,
        }
    }
}
