use mosaic_primitives::{BlockHash, Buf32, OriginSnapshot};
use serde::{Deserialize, Serialize};

/// Block a store starts from.  It is trusted, so it counts as reported,
/// justified and finalized from the start.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GenesisBlock {
    pub block_hash: BlockHash,
    pub height: u64,
    pub state_root: Buf32,
    pub accumulated_gas: u64,
    pub accumulated_tx_root: Buf32,

    /// Origin snapshot recorded for the genesis of an auxiliary store.
    pub origin: Option<OriginSnapshot>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StoreParams {
    /// Distance in blocks between two checkpoints.
    pub epoch_length: u64,
    pub genesis: GenesisBlock,
}
