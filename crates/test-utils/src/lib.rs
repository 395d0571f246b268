//! Fixtures shared by the tests of the bridge crates.

mod chain;
mod fixtures;

pub use chain::{ChainBuilder, TestBlock};
pub use fixtures::{addr, core_id, validator_set};
