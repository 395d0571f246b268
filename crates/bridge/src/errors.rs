use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("missing dependency: {0}")]
    MissingDependency(&'static str),
}
