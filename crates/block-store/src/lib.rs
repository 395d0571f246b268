//! Checkpoint stores of the two observed chains.
//!
//! [`BlockStore`] records the blocks of one chain and justifies and
//! finalizes its epoch checkpoints.  [`AuxiliaryBlockStore`] wraps it for the
//! auxiliary chain, where it also snapshots the origin chain, stages kernels
//! and feeds activated validator sets into the registry.

mod auxiliary;
mod block;
mod errors;
mod events;
mod kernel;
mod observer;
mod params;
mod store;

pub use auxiliary::AuxiliaryBlockStore;
pub use block::{Checkpoint, ReportedBlock};
pub use errors::{KernelError, StoreError, StoreResult};
pub use events::StoreEvent;
pub use kernel::KernelTracker;
pub use observer::OriginObserver;
pub use params::{GenesisBlock, StoreParams};
pub use store::BlockStore;
