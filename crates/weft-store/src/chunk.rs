//! Chunk header codec and size constants
//!
//! Every stored entry is `version (2 bytes, little-endian) ++ reserved
//! (1 byte) ++ payload`. The header is an internal encoding that may change
//! between releases; it is not a wire-compatibility commitment.

/// Default maximum size in bytes of one raw store entry.
pub const MAX_ENTRY_SIZE: usize = 170;

/// Bytes of header prepended to every chunk payload.
pub const CHUNK_HEADER_SIZE: usize = 3;

/// Maximum payload bytes one chunk carries under the default entry bound.
pub const MAX_CHUNK_PAYLOAD: usize = MAX_ENTRY_SIZE - CHUNK_HEADER_SIZE;

/// Decoded view over one raw store entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkView<'a> {
    /// Generation number shared by every chunk of one publish call.
    pub version: u16,
    /// Reserved header byte; currently always zero.
    pub reserved: u8,
    /// The value slice carried by this chunk.
    pub payload: &'a [u8],
}

/// Encode one chunk entry.
pub fn encode_chunk(version: u16, payload: &[u8]) -> Vec<u8> {
    let mut entry = Vec::with_capacity(CHUNK_HEADER_SIZE + payload.len());
    entry.extend_from_slice(&version.to_le_bytes());
    entry.push(0);
    entry.extend_from_slice(payload);
    entry
}

/// Decode one raw entry, or `None` when the header is truncated.
pub fn decode_chunk(entry: &[u8]) -> Option<ChunkView<'_>> {
    if entry.len() < CHUNK_HEADER_SIZE {
        return None;
    }
    Some(ChunkView {
        version: u16::from_le_bytes([entry[0], entry[1]]),
        reserved: entry[2],
        payload: &entry[CHUNK_HEADER_SIZE..],
    })
}
