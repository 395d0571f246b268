//! Collection of primitive types shared by the bridge crates: buffers and
//! identifiers, the hash formulas both chains agree on, kernels, transition
//! objects and the header codec.

#[macro_use]
mod macros;

pub mod buf;
pub mod errors;
pub mod hash;
pub mod header;
pub mod ids;
pub mod kernel;
pub mod transition;

pub use buf::{Buf20, Buf32};
pub use errors::ErrorKind;
pub use header::{DecodedHeader, EthHeaderCodec, HeaderCodec, HeaderDecodeError};
pub use ids::{Address, BlockHash, ChainDescriptor, CoreIdentifier, KernelHash};
pub use kernel::Kernel;
pub use transition::{OriginSnapshot, TransitionObject};
