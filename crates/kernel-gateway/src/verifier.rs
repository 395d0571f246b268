use mosaic_primitives::Buf32;

/// Checks Merkle-Patricia inclusion proofs against a state root.
#[cfg_attr(test, mockall::automock)]
pub trait MerkleProofVerifier: Send + Sync {
    /// Whether `value` is stored at `path` in the trie with root `root`.
    fn verify(&self, value: &[u8], path: &[u8], proof_nodes: &[u8], root: &Buf32) -> bool;
}
