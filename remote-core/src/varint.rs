//! Base-128 varint: the integer primitive under every tag and length.

/// Longest legal encoding: a 64-bit value never needs more than 10 bytes.
pub const MAX_VARINT_BYTES: usize = 10;

/// Error decoding a varint (buffer ends before a terminating byte, or the
/// encoding runs past the 64-bit bound).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VarintError {
    #[error("varint truncated or longer than 10 bytes")]
    Truncated,
}

/// Decode a varint starting at `start`. Returns the value and the number of
/// bytes consumed. Accepts any valid encoding; canonicality (minimum byte
/// count) is not re-checked. The 10-byte cap stops unbounded reads on
/// corrupt input.
pub fn decode_varint(bytes: &[u8], start: usize) -> Result<(u64, usize), VarintError> {
    let mut value: u64 = 0;
    let mut shift: u32 = 0;
    let mut consumed = 0usize;
    loop {
        if consumed >= MAX_VARINT_BYTES {
            return Err(VarintError::Truncated);
        }
        let Some(&byte) = bytes.get(start + consumed) else {
            return Err(VarintError::Truncated);
        };
        consumed += 1;
        value |= u64::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            return Ok((value, consumed));
        }
        shift += 7;
    }
}

/// Encode a value as a varint: 7-bit groups, least-significant first, high
/// bit set on all but the final byte. Zero encodes as a single zero byte.
pub fn encode_varint(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_VARINT_BYTES);
    let mut v = value;
    loop {
        let byte = (v & 0x7F) as u8;
        v >>= 7;
        if v == 0 {
            out.push(byte);
            return out;
        }
        out.push(byte | 0x80);
    }
}
