//! Assembly of a full bridge deployment: both block stores, the validator
//! registry and the kernel gateway, wired together from a [`Config`].
//!
//! [`Config`]: mosaic_config::Config

mod bridge;
mod builder;
mod errors;
mod logging;

pub use bridge::Bridge;
pub use builder::BridgeBuilder;
pub use errors::BridgeError;
pub use logging::init_logging;
