use mosaic_primitives::{HeaderCodec, OriginSnapshot};
use parking_lot::RwLock;

use crate::store::BlockStore;

/// Read-only view of the origin chain the auxiliary store snapshots whenever
/// a block is reported.
#[cfg_attr(test, mockall::automock)]
pub trait OriginObserver: Send + Sync {
    /// Current dynasty, head hash and head height of the origin store.
    fn snapshot(&self) -> OriginSnapshot;
}

impl<C: HeaderCodec + Send + Sync> OriginObserver for BlockStore<C> {
    fn snapshot(&self) -> OriginSnapshot {
        self.origin_snapshot()
    }
}

impl<T: OriginObserver> OriginObserver for RwLock<T> {
    fn snapshot(&self) -> OriginSnapshot {
        self.read().snapshot()
    }
}
