use mosaic_primitives::BlockHash;
use serde::{Deserialize, Serialize};

/// Notifications a store emits, in the order the changes happened.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum StoreEvent {
    BlockReported(BlockHash),
    BlockJustified(BlockHash),
    BlockFinalised(BlockHash),
}

impl StoreEvent {
    pub fn block_hash(&self) -> &BlockHash {
        match self {
            StoreEvent::BlockReported(h)
            | StoreEvent::BlockJustified(h)
            | StoreEvent::BlockFinalised(h) => h,
        }
    }
}
