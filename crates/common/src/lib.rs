//! Ambient facilities shared by the bridge binaries and services.

pub mod logging;
