use mosaic_block_store::StoreError;
use mosaic_primitives::{ErrorKind, KernelHash};
use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum GatewayError {
    #[error("gateway identity must not be zero")]
    ZeroIdentity,

    #[error("proof does not commit to kernel {0}")]
    InvalidProof(KernelHash),

    #[error("store: {0}")]
    Store(#[from] StoreError),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::ZeroIdentity => ErrorKind::Config,
            GatewayError::InvalidProof(_) => ErrorKind::StructuralViolation,
            GatewayError::Store(e) => e.kind(),
        }
    }
}
