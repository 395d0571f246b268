//! Configuration of a bridge deployment.

mod config;
mod errors;

pub use config::{
    AuxiliaryConfig, BridgeConfig, Config, GenesisConfig, IdentitiesConfig, LoggingConfig,
    OriginConfig, ValidatorEntry,
};
pub use errors::ConfigError;
