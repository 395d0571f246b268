//! Weighted validator set partitioned into meta-blocks, advanced by the
//! auxiliary store whenever a kernel activates.

mod errors;
mod registry;
mod sink;
mod validator;

pub use errors::{RegistryError, RegistryResult};
pub use registry::ValidatorRegistry;
pub use sink::ValidatorSetSink;
pub use validator::{MetaBlock, Validator};
