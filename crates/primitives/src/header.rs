//! Block header decoding.

use alloy_consensus::Header;
use alloy_rlp::Decodable;
use thiserror::Error;

use crate::{buf::Buf32, hash::keccak, ids::BlockHash};

/// The parts of a block header the stores care about.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DecodedHeader {
    pub parent_hash: BlockHash,
    pub state_root: Buf32,
    pub transactions_root: Buf32,
    pub gas_used: u64,
    pub height: u64,
}

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum HeaderDecodeError {
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("malformed header: {0} trailing bytes")]
    TrailingBytes(usize),
}

/// Decodes raw headers of one chain.
pub trait HeaderCodec {
    fn decode(&self, raw: &[u8]) -> Result<DecodedHeader, HeaderDecodeError>;

    /// Content-derived hash of a raw header.
    fn block_hash(&self, raw: &[u8]) -> BlockHash {
        BlockHash::from(keccak(raw))
    }
}

/// Codec for RLP-encoded Ethereum block headers.
#[derive(Copy, Clone, Debug, Default)]
pub struct EthHeaderCodec;

impl HeaderCodec for EthHeaderCodec {
    fn decode(&self, raw: &[u8]) -> Result<DecodedHeader, HeaderDecodeError> {
        let mut buf = raw;
        let header = Header::decode(&mut buf)
            .map_err(|e| HeaderDecodeError::MalformedHeader(e.to_string()))?;
        if !buf.is_empty() {
            return Err(HeaderDecodeError::TrailingBytes(buf.len()));
        }

        Ok(DecodedHeader {
            parent_hash: BlockHash::from(Buf32::from(header.parent_hash)),
            state_root: header.state_root.into(),
            transactions_root: header.transactions_root.into(),
            gas_used: header.gas_used,
            height: header.number,
        })
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;

    use super::*;

    fn sample_header() -> Header {
        Header {
            parent_hash: B256::repeat_byte(1),
            state_root: B256::repeat_byte(2),
            transactions_root: B256::repeat_byte(3),
            gas_used: 21_000,
            number: 42,
            ..Default::default()
        }
    }

    #[test]
    fn test_decode_eth_header() {
        let header = sample_header();
        let raw = alloy_rlp::encode(&header);

        let decoded = EthHeaderCodec.decode(&raw).unwrap();
        assert_eq!(decoded.parent_hash, BlockHash::from([1; 32]));
        assert_eq!(decoded.state_root, Buf32::from([2; 32]));
        assert_eq!(decoded.transactions_root, Buf32::from([3; 32]));
        assert_eq!(decoded.gas_used, 21_000);
        assert_eq!(decoded.height, 42);
    }

    #[test]
    fn test_block_hash_matches_header_hash() {
        let header = sample_header();
        let raw = alloy_rlp::encode(&header);

        let hash = EthHeaderCodec.block_hash(&raw);
        assert_eq!(hash, BlockHash::from(Buf32::from(header.hash_slow())));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = EthHeaderCodec.decode(&[0xde, 0xad, 0xbe, 0xef]).unwrap_err();
        assert!(matches!(err, HeaderDecodeError::MalformedHeader(_)));
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let mut raw = alloy_rlp::encode(sample_header());
        raw.push(0);
        assert_eq!(
            EthHeaderCodec.decode(&raw).unwrap_err(),
            HeaderDecodeError::TrailingBytes(1)
        );
    }
}
