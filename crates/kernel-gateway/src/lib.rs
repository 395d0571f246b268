//! Gateway that proves kernels committed on the origin chain and stages them
//! in the auxiliary store.

mod errors;
mod gateway;
mod verifier;

pub use errors::{GatewayError, GatewayResult};
pub use gateway::{kernel_storage_path, KernelGateway, KernelProof};
pub use verifier::MerkleProofVerifier;
