use mosaic_primitives::{Address, CoreIdentifier};

/// Deterministic non-zero address derived from `n`.
pub fn addr(n: u8) -> Address {
    let mut buf = [0u8; 20];
    buf[0] = 0xaa;
    buf[19] = n;
    Address::from(buf)
}

/// Core identifier used by tests that don't care about its value.
pub fn core_id() -> CoreIdentifier {
    CoreIdentifier::from([0xc0; 20])
}

/// `count` distinct validators starting at `addr(first)`, with weights
/// `1, 2, 3, ...`.
pub fn validator_set(first: u8, count: u8) -> (Vec<Address>, Vec<u64>) {
    (0..count)
        .map(|i| (addr(first + i), u64::from(i) + 1))
        .unzip()
}
